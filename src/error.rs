//! Crate-wide error type.
//!
//! Fingerprinting itself has no retryable failures: every input is already
//! in memory and every stage is pure. The only fingerprint-time error is a
//! malformed intent annotation, which is a setup mistake and is surfaced
//! synchronously. Transport and response construction add the usual HTTP
//! and decoding failure modes.

use thiserror::Error;

/// Errors produced by the render-API client layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Programmer/setup mistake: a malformed intent annotation, a missing
    /// API key, an unconfigured endpoint. Never retried.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote API answered with a non-success status.
    #[error("render API error: HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The remote API reply is missing a field the reply contract requires.
    #[error("malformed API reply: {0}")]
    Reply(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("base64 decode error: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
