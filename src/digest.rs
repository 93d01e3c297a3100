//! Stable digest construction.
//!
//! The canonical URL and the relevant parameter subset are reduced to a
//! fixed-width opaque token. Consumers may compare tokens for equality and
//! nothing else.

use std::fmt;

use serde_json::{Map, Value};
use sha1::{Digest as _, Sha1};

/// Token width in bytes (SHA-1 output).
pub const DIGEST_LEN: usize = 20;

/// Opaque request identity token.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<[u8; DIGEST_LEN]> for Digest {
    fn from(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Digest of a canonical URL alone. This is the whole of the default
/// fallback fingerprint, and also what [`digest`] degenerates to for an
/// empty parameter subset, which keeps "intent that resolves to nothing"
/// indistinguishable from "no intent".
pub fn digest_url(canonical_url: &str) -> Digest {
    let mut hasher = Sha1::new();
    hasher.update(canonical_url.as_bytes());
    Digest(hasher.finalize().into())
}

/// Digest of a canonical URL plus a relevant parameter subset.
///
/// The subset is serialized as canonical JSON: `serde_json`'s default map is
/// ordered by key at every nesting level, array order is preserved (the
/// `actions` list is order-sensitive), and numeric/boolean formatting is
/// stable. URL and parameter bytes are joined with `\n`, which cannot occur
/// in a canonical URL, so distinct (URL, parameters) pairs cannot collide
/// through concatenation.
pub fn digest(canonical_url: &str, relevant: &Map<String, Value>) -> Digest {
    if relevant.is_empty() {
        return digest_url(canonical_url);
    }
    // Serializing an in-memory JSON map cannot fail.
    let params = serde_json::to_string(relevant).expect("JSON serialization");
    let mut hasher = Sha1::new();
    hasher.update(canonical_url.as_bytes());
    hasher.update(b"\n");
    hasher.update(params.as_bytes());
    Digest(hasher.finalize().into())
}
