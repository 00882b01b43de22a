//! # Error Types
//!
//! Errors raised by the foundational types. Higher crates wrap these in
//! their own `thiserror` enums.

use thiserror::Error;

/// Error constructing or parsing a core value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An identifier failed validation.
    #[error("invalid {kind} identifier {value:?}: {reason}")]
    InvalidIdentifier {
        /// Which identifier namespace rejected the value.
        kind: &'static str,
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// A coin denomination or amount failed validation.
    #[error("invalid coin: {0}")]
    InvalidCoin(String),

    /// A timestamp could not be parsed or overflowed.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
