//! `remora` - Remote rendering API client layer for web crawlers
//!
//! # Features
//!
//! - **Request Fingerprinting**: one canonical identity token per remote-API
//!   call, however the intent was declared
//! - **Intent Resolution**: explicit parameter maps, automap translation of
//!   ordinary request fields, or a transparent-mode default
//! - **Transport**: HTTP/2 + TLS 1.3 adapter for the extraction endpoint
//! - **Response Construction**: text vs. binary page responses from raw
//!   API replies
//!
//! # Example
//!
//! ```rust
//! use remora::{Config, Fingerprinter, Request, META_RENDER};
//!
//! fn main() -> remora::Result<()> {
//!     let fingerprinter = Fingerprinter::new(&Config::default());
//!     let request = Request::new("https://example.com").with_meta(META_RENDER, true);
//!     let token = fingerprinter.fingerprint(&request)?;
//!     println!("{token}");
//!     Ok(())
//! }
//! ```

pub mod canonical;
pub mod client;
pub mod config;
pub mod digest;
pub mod error;
pub mod fingerprint;
pub mod params;
pub mod relevance;
pub mod request;
pub mod response;

pub use canonical::canonicalize;
pub use client::RenderClient;
pub use config::Config;
pub use digest::{Digest, DIGEST_LEN};
pub use error::{Error, Result};
pub use fingerprint::{FallbackFingerprinter, Fingerprinter, UrlFingerprinter};
pub use params::{default_params, resolve, IntentFlag};
pub use relevance::{fragment_significant, relevant_subset};
pub use request::{Request, META_RENDER, META_RENDER_AUTOMAP};
pub use response::PageResponse;

/// Version of remora
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
