//! Parameter relevance classification.
//!
//! Only parameters that change what the remote API returns may feed the
//! fingerprint. The classification is a fixed table, not per-request state;
//! unknown names are conservatively treated as metadata so a parameter added
//! by a future API version can never silently split or merge existing
//! fingerprints.

use serde_json::{Map, Value};
use tracing::debug;

/// Parameters that influence the returned content.
const CONTENT_PARAMS: &[&str] = &[
    "actions",
    "browserHtml",
    "geolocation",
    "httpRequestBody",
    "httpRequestMethod",
    "httpResponseBody",
    "httpResponseHeaders",
    "javascript",
    "screenshot",
    "screenshotOptions",
];

/// Parameters that only affect bookkeeping: echoed data, job tags, custom
/// request headers in either spelling.
const METADATA_PARAMS: &[&str] = &[
    "customHttpRequestHeaders",
    "echoData",
    "jobId",
    "requestHeaders",
];

/// Extract the content-affecting subset of an effective parameter set.
///
/// Values pass through unchanged, except that a boolean `false` is dropped:
/// a disabled flag produces the same remote-API behavior as an absent one.
/// Output ordering is stable regardless of input ordering (the map is
/// key-sorted).
pub fn relevant_subset(params: &Map<String, Value>) -> Map<String, Value> {
    let mut subset = Map::new();
    for (name, value) in params {
        if !CONTENT_PARAMS.contains(&name.as_str()) {
            if !METADATA_PARAMS.contains(&name.as_str()) {
                debug!(parameter = %name, "unclassified render API parameter ignored for fingerprinting");
            }
            continue;
        }
        if matches!(value, Value::Bool(false)) {
            continue;
        }
        subset.insert(name.clone(), value.clone());
    }
    subset
}

/// Whether the URL fragment can alter the returned content.
///
/// Only browser-rendered and screenshot outcomes execute client-side code,
/// so only they can observe the fragment. Relies on [`relevant_subset`]
/// having already dropped disabled flags.
pub fn fragment_significant(subset: &Map<String, Value>) -> bool {
    subset.contains_key("browserHtml") || subset.contains_key("screenshot")
}
