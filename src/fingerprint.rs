//! Request fingerprinting façade.
//!
//! Orchestrates parameter resolution, relevance filtering, URL
//! canonicalization, and digest construction, with a per-request
//! memoization cache. Requests that never declare render-API intent are
//! handed verbatim to a pluggable fallback fingerprinter, so the host
//! crawler's existing identities stay untouched.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use crate::canonical::canonicalize;
use crate::config::Config;
use crate::digest::{digest, digest_url, Digest};
use crate::error::Result;
use crate::params::resolve;
use crate::relevance::{fragment_significant, relevant_subset};
use crate::request::Request;

/// Capability for fingerprinting requests outside this engine's scope.
///
/// Any single-method implementation will do; the crawler's stock
/// fingerprinter is the usual choice.
pub trait FallbackFingerprinter: Send + Sync {
    fn fingerprint(&self, request: &Request) -> Digest;
}

/// Default fallback: URL-only, fragment-insensitive.
///
/// Hashes the canonical URL and nothing else. A URL the parser rejects is
/// hashed as-is; the result is still deterministic, and scheduling such a
/// request will fail long before fingerprint equality matters.
#[derive(Debug, Default, Clone, Copy)]
pub struct UrlFingerprinter;

impl FallbackFingerprinter for UrlFingerprinter {
    fn fingerprint(&self, request: &Request) -> Digest {
        match canonicalize(request.url(), false) {
            Ok(canonical) => digest_url(&canonical),
            Err(_) => digest_url(request.url()),
        }
    }
}

/// Fingerprints requests under the render-API identity model.
///
/// A request's token is computed at most once; the cache is keyed by
/// request identity and lives as long as the fingerprinter. Two concurrent
/// first computations of the same request are benign: the token is a pure
/// function of the request, so last-write-wins inserts identical bytes.
pub struct Fingerprinter {
    transparent_mode: bool,
    fallback: Box<dyn FallbackFingerprinter>,
    cache: Mutex<HashMap<u64, Digest>>,
}

impl Fingerprinter {
    /// Fingerprinter with the default URL-only fallback.
    pub fn new(config: &Config) -> Self {
        Self::with_fallback(config, Box::new(UrlFingerprinter))
    }

    /// Fingerprinter delegating non-render requests to `fallback`.
    pub fn with_fallback(config: &Config, fallback: Box<dyn FallbackFingerprinter>) -> Self {
        Self {
            transparent_mode: config.transparent_mode,
            fallback,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Identity token for `request`.
    ///
    /// Errors only on a malformed intent annotation; there is nothing
    /// transient to retry.
    pub fn fingerprint(&self, request: &Request) -> Result<Digest> {
        if let Some(cached) = self.cache.lock().unwrap().get(&request.id()) {
            return Ok(*cached);
        }
        let token = self.compute(request)?;
        self.cache.lock().unwrap().insert(request.id(), token);
        Ok(token)
    }

    fn compute(&self, request: &Request) -> Result<Digest> {
        let Some(params) = resolve(request, self.transparent_mode)? else {
            return Ok(self.fallback.fingerprint(request));
        };
        let relevant = relevant_subset(&params);
        if relevant.is_empty() {
            // Intent that resolves to no content-affecting parameters is
            // the same request the fallback would have seen.
            debug!(url = %request.url(), "render API intent with empty relevant subset, using fallback");
            return Ok(self.fallback.fingerprint(request));
        }
        let keep_fragment = fragment_significant(&relevant);
        let canonical = canonicalize(request.url(), keep_fragment)?;
        Ok(digest(&canonical, &relevant))
    }
}
