//! # State Digests
//!
//! A [`ContentDigest`] is a SHA-256 over [`CanonicalBytes`]. There is no
//! constructor from arbitrary bytes: two replicas compare digests only if
//! both went through the same canonicalization. Proof backends that hash
//! raw bytes do so in `zkr-zkp`.
//!
//! Digests render and serialize as `sha256:<64 lowercase hex>`.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;
use crate::error::CoreError;

const PREFIX: &str = "sha256:";

/// SHA-256 digest of a canonical document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentDigest([u8; 32]);

impl ContentDigest {
    /// The raw digest.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse the `sha256:<hex>` rendering.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let reject = |reason| CoreError::InvalidIdentifier {
            kind: "digest",
            value: s.to_string(),
            reason,
        };
        let hex = s.strip_prefix(PREFIX).ok_or_else(|| reject("missing sha256: prefix"))?;
        let bytes = crate::hex::decode(hex)?;
        let bytes: [u8; 32] = bytes.try_into().map_err(|_| reject("expected 32 bytes"))?;
        Ok(Self(bytes))
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{PREFIX}{}", crate::hex::encode(&self.0))
    }
}

impl TryFrom<String> for ContentDigest {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ContentDigest> for String {
    fn from(d: ContentDigest) -> String {
        d.to_string()
    }
}

/// Digest a canonical document.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let mut out = [0u8; 32];
    out.copy_from_slice(&Sha256::digest(data.as_bytes()));
    ContentDigest(out)
}
