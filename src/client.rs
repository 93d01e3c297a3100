//! Remote API transport adapter.
//!
//! A thin I/O layer: it takes a resolved parameter set, POSTs it to the
//! extraction endpoint, and hands back the raw JSON reply (or a
//! [`PageResponse`] built from it). No retry or backoff lives here; the
//! host crawler owns scheduling policy.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::params::resolve;
use crate::request::Request;
use crate::response::PageResponse;

/// HTTP client for the remote rendering/extraction API.
pub struct RenderClient {
    http: Client,
    endpoint: String,
    api_key: String,
    transparent_mode: bool,
}

impl RenderClient {
    /// Build a client from configuration.
    ///
    /// Fails fast on unusable configuration; a missing key would otherwise
    /// surface as an auth error on every single call.
    pub fn new(config: &Config) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(Error::Config("render API endpoint is not set".to_string()));
        }
        if config.api_key.is_empty() {
            return Err(Error::Config("render API key is not set".to_string()));
        }

        let http = Client::builder()
            // Keep connections alive for reuse across API calls
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .tcp_nodelay(true)
            // TLS 1.3 via rustls
            .use_rustls_tls()
            // Compression, auto-negotiated via Accept-Encoding
            .brotli(true)
            .zstd(true)
            .gzip(true)
            .deflate(true)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            transparent_mode: config.transparent_mode,
        })
    }

    /// Perform one API call: `params` plus the target URL, as JSON.
    ///
    /// Returns the raw reply object. Non-success statuses become
    /// [`Error::Api`] with whatever body the API sent.
    pub async fn call(&self, url: &str, params: &Map<String, Value>) -> Result<Map<String, Value>> {
        let mut payload = params.clone();
        payload.insert("url".to_string(), Value::String(url.to_string()));
        debug!(url, parameters = payload.len(), "calling render API");

        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.api_key, None::<&str>)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: Map<String, Value> = response.json().await?;
        info!(url, status = status.as_u16(), "render API reply received");
        Ok(reply)
    }

    /// Fetch a request through the API, if it asks for that.
    ///
    /// Resolves the request's intent exactly like the fingerprinting engine
    /// does, so a request fetches through the API precisely when it
    /// fingerprints through it. Returns `Ok(None)` for requests the caller
    /// should fetch directly.
    pub async fn fetch(&self, request: &Request) -> Result<Option<PageResponse>> {
        let Some(params) = resolve(request, self.transparent_mode)? else {
            return Ok(None);
        };
        let reply = self.call(request.url(), &params).await?;
        Ok(Some(PageResponse::from_api_reply(reply)?))
    }
}
