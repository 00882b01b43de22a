//! # Canonical Serialization
//!
//! `CanonicalBytes` is the only construction path for bytes that feed a
//! content digest. Registry state is hashed through it when comparing a
//! genesis export against a re-import, so two replicas holding the same
//! logical state always agree on the digest.
//!
//! ## Rules
//!
//! 1. **Reject floats.** Amounts and counters are integers; float number
//!    formatting has edge cases across serializers.
//! 2. **Sorted keys, compact separators.** Serialization uses `serde_jcs`
//!    (RFC 8785).

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced by JCS canonicalization of a float-free value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Canonicalize any serializable value. Fails on the first float found
    /// anywhere in the tree.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        if let Some(f) = first_float(&value) {
            return Err(CanonicalizationError::FloatRejected(f));
        }
        Ok(Self(serde_jcs::to_vec(&value)?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

fn first_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if n.is_f64() => n.as_f64(),
        Value::Array(items) => items.iter().find_map(first_float),
        Value::Object(map) => map.values().find_map(first_float),
        _ => None,
    }
}
