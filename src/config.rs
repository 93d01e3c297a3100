//! Client configuration.
//!
//! Loaded from a TOML file, with `REMORA_*` environment variables taking
//! precedence so deployments can inject the API key without touching files.
//! Fingerprinting only reads `transparent_mode`; the rest belongs to the
//! transport adapter.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Render-API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Extraction endpoint URL.
    pub endpoint: String,
    /// API key, sent as HTTP basic auth username.
    pub api_key: String,
    /// When set, every request without explicit intent defaults to a
    /// minimal render-API call (response body + headers).
    pub transparent_mode: bool,
    /// Connection timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds. Rendering is slow; the default is
    /// far above an ordinary fetch timeout.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: String::new(),
            transparent_mode: false,
            connect_timeout_secs: 10,
            request_timeout_secs: 180,
        }
    }
}

impl Config {
    /// Parse a TOML config file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Self =
            toml::from_str(&text).map_err(|e| Error::Config(format!("config file: {e}")))?;
        config.apply_env();
        Ok(config)
    }

    /// Defaults plus environment overrides; no file involved.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Ok(endpoint) = std::env::var("REMORA_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Ok(api_key) = std::env::var("REMORA_API_KEY") {
            self.api_key = api_key;
        }
        if let Ok(transparent) = std::env::var("REMORA_TRANSPARENT_MODE") {
            self.transparent_mode = transparent != "0" && transparent.to_lowercase() != "false";
        }
    }
}
