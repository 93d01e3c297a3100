//! Render-API parameter resolution.
//!
//! Intent can be declared three equivalent ways: an explicit raw parameter
//! map, automap translation of the request's ordinary fields, or the global
//! transparent-mode default. Whichever way it arrives, resolution produces
//! the one parameter set that would actually be sent to the remote API, so
//! downstream stages never see the difference.

use base64::{engine::general_purpose, Engine as _};
use http::Method;
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::request::{Request, META_RENDER, META_RENDER_AUTOMAP};

/// One intent annotation, decoded from its meta value.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentFlag {
    /// Key not present in meta.
    Absent,
    /// Explicit `false`: opt out of this intent.
    Disabled,
    /// Bare `true`: intent with defaults.
    Enabled,
    /// Raw parameter map (for automap, overrides on top of the translation).
    Params(Map<String, Value>),
}

impl IntentFlag {
    /// Decode the meta value under `key`. Any shape other than absent,
    /// boolean, or object is a setup mistake, not something to guess around.
    pub fn from_meta(request: &Request, key: &str) -> Result<Self> {
        match request.meta().get(key) {
            None => Ok(Self::Absent),
            Some(Value::Bool(true)) => Ok(Self::Enabled),
            Some(Value::Bool(false)) => Ok(Self::Disabled),
            Some(Value::Object(map)) => Ok(Self::Params(map.clone())),
            Some(other) => Err(Error::Config(format!(
                "meta key {key:?} must be a boolean or an object, got: {other}"
            ))),
        }
    }
}

/// The parameter set sent when intent is declared without any parameters:
/// fetch the response body and its headers.
pub fn default_params() -> Map<String, Value> {
    let mut params = Map::new();
    params.insert("httpResponseBody".to_string(), Value::Bool(true));
    params.insert("httpResponseHeaders".to_string(), Value::Bool(true));
    params
}

/// Resolve the effective parameter set for `request`.
///
/// Returns `None` when the request declares no render-API intent at all; the
/// caller must then treat it as a direct fetch. The output depends only on
/// the request and `transparent_mode`, never on I/O.
pub fn resolve(request: &Request, transparent_mode: bool) -> Result<Option<Map<String, Value>>> {
    let raw = IntentFlag::from_meta(request, META_RENDER)?;
    let automap = IntentFlag::from_meta(request, META_RENDER_AUTOMAP)?;

    let params = match (raw, automap) {
        // An explicit map *is* the effective set; automap is not applied.
        (IntentFlag::Params(map), _) => Some(map),
        (IntentFlag::Enabled, _) => Some(default_params()),
        (IntentFlag::Absent, IntentFlag::Absent) if transparent_mode => Some(default_params()),
        (_, IntentFlag::Enabled) => Some(automap_params(request, &Map::new())),
        (_, IntentFlag::Params(overrides)) => Some(automap_params(request, &overrides)),
        _ => None,
    };
    Ok(params)
}

/// Translate the request's native fields into render-API parameters, then
/// layer `overrides` on top.
///
/// The remote API treats browser rendering and raw-body capture as
/// alternative outputs, so the body/header defaults are withheld when an
/// override asks for a browser-rendered outcome.
fn automap_params(request: &Request, overrides: &Map<String, Value>) -> Map<String, Value> {
    let mut params = Map::new();

    let browser_outcome = ["browserHtml", "screenshot"]
        .iter()
        .any(|key| matches!(overrides.get(*key), Some(Value::Bool(true))));
    if !browser_outcome {
        params.insert("httpResponseBody".to_string(), Value::Bool(true));
        params.insert("httpResponseHeaders".to_string(), Value::Bool(true));
    }

    if request.method() != Method::GET {
        params.insert(
            "httpRequestMethod".to_string(),
            Value::String(request.method().to_string()),
        );
    }

    if !request.body().is_empty() {
        params.insert(
            "httpRequestBody".to_string(),
            Value::String(general_purpose::STANDARD.encode(request.body())),
        );
    }

    if !request.headers().is_empty() {
        let headers: Vec<Value> = request
            .headers()
            .iter()
            .map(|(name, value)| {
                json!({
                    "name": name.as_str(),
                    "value": String::from_utf8_lossy(value.as_bytes()),
                })
            })
            .collect();
        params.insert(
            "customHttpRequestHeaders".to_string(),
            Value::Array(headers),
        );
    }

    for (key, value) in overrides {
        params.insert(key.clone(), value.clone());
    }
    params
}
