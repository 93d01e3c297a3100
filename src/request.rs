//! Crawler request model.
//!
//! A [`Request`] carries the fields the host crawler schedules on: URL,
//! method, body, headers, and a free-form annotation map ("meta") where
//! render-API intent is declared. Each request is assigned a process-unique
//! identity at construction; the fingerprint cache is keyed on it, mirroring
//! the crawler's rule that a request never changes once scheduled.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::Value;

/// Meta key declaring raw render-API intent: absent, boolean, or an object
/// of raw parameter name → JSON value.
pub const META_RENDER: &str = "render_api";

/// Meta key declaring automap intent: derive render-API parameters from the
/// request's ordinary fields instead of an explicit map. Same shapes as
/// [`META_RENDER`]; an object holds overrides applied on top of the
/// translation.
pub const META_RENDER_AUTOMAP: &str = "render_api_automap";

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// A single crawl request.
#[derive(Debug, Clone)]
pub struct Request {
    id: u64,
    url: String,
    method: Method,
    body: Bytes,
    headers: HeaderMap,
    meta: HashMap<String, Value>,
}

impl Request {
    /// Create a GET request with no body, headers, or annotations.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            url: url.into(),
            method: Method::GET,
            body: Bytes::new(),
            headers: HeaderMap::new(),
            meta: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a request header. Invalid header names or values are ignored,
    /// matching how the crawler drops unschedulable header lines.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.append(name, value);
        }
        self
    }

    /// Attach an annotation. `meta("render_api", true)` routes the request
    /// through the remote API with default parameters.
    #[must_use]
    pub fn with_meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Process-unique identity, stable for the lifetime of the request.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn meta(&self) -> &HashMap<String, Value> {
        &self.meta
    }
}
