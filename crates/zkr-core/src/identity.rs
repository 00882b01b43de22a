//! # Identifier Newtypes
//!
//! Newtype wrappers for every identifier in the registry. These prevent
//! accidental identifier confusion: a `ProofId` cannot be passed where a
//! `CircuitId` is expected, and an `Address` is never a bare string.
//!
//! All identifiers are validated at construction and on deserialization
//! (`#[serde(try_from = "String")]`), so an invalid identifier cannot enter
//! registry state through genesis import either.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

const MAX_ADDRESS_LEN: usize = 128;
const MAX_ENTITY_ID_LEN: usize = 128;
const MAX_TYPE_TAG_LEN: usize = 64;

fn check_token(kind: &'static str, s: &str, max: usize) -> Result<(), CoreError> {
    let reject = |reason| {
        Err(CoreError::InvalidIdentifier {
            kind,
            value: s.to_string(),
            reason,
        })
    };
    if s.is_empty() {
        return reject("must not be empty");
    }
    if s.len() > max {
        return reject("too long");
    }
    if !s.chars().all(|c| c.is_ascii_graphic()) {
        return reject("must be printable ASCII without whitespace");
    }
    Ok(())
}

fn check_type_tag(kind: &'static str, s: &str) -> Result<(), CoreError> {
    check_token(kind, s, MAX_TYPE_TAG_LEN)?;
    let ok = s
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if !ok {
        return Err(CoreError::InvalidIdentifier {
            kind,
            value: s.to_string(),
            reason: "must be lowercase alphanumeric, '-' or '_'",
        });
    }
    Ok(())
}

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident, $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and wrap an identifier.
            pub fn new(s: impl Into<String>) -> Result<Self, CoreError> {
                let s = s.into();
                let check: fn(&str) -> Result<(), CoreError> = $check;
                check(&s)?;
                Ok(Self(s))
            }

            /// The identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(v: $name) -> String {
                v.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_newtype!(
    /// A participant identity on the ledger (creator, prover, verifier,
    /// requester, or a module account).
    ///
    /// Format validity is checked here; whether the identity is *registered*
    /// is the identity registry's concern.
    Address,
    |s| check_token("address", s, MAX_ADDRESS_LEN)
);

string_newtype!(
    /// Identifier of a registered circuit, e.g. `circuit-7`.
    CircuitId,
    |s| check_token("circuit", s, MAX_ENTITY_ID_LEN)
);

string_newtype!(
    /// Identifier of a submitted proof, e.g. `proof-1`.
    ProofId,
    |s| check_token("proof", s, MAX_ENTITY_ID_LEN)
);

string_newtype!(
    /// Identifier of a proof request, e.g. `request-3`.
    RequestId,
    |s| check_token("request", s, MAX_ENTITY_ID_LEN)
);

string_newtype!(
    /// Circuit type tag, e.g. `age-proof`. Governance decides which tags are
    /// allowed.
    CircuitType,
    |s| check_type_tag("circuit type", s)
);

string_newtype!(
    /// Proving system tag, e.g. `groth16`. Verification backends are keyed
    /// by this tag.
    ProofType,
    |s| check_type_tag("proof type", s)
);

impl CircuitId {
    /// The id assigned to the `n`-th circuit (`circuit-n`).
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("circuit-{n}"))
    }
}

impl ProofId {
    /// The id assigned to the `n`-th proof (`proof-n`).
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("proof-{n}"))
    }
}

impl RequestId {
    /// The id assigned to the `n`-th proof request (`request-n`).
    pub fn from_sequence(n: u64) -> Self {
        Self(format!("request-{n}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_accepts_bech32_like() {
        let a = Address::new("zkr1qyqszqgpqyqszqgpqyqszqgp").unwrap();
        assert_eq!(a.as_str(), "zkr1qyqszqgpqyqszqgpqyqszqgp");
    }

    #[test]
    fn test_address_rejects_empty_and_whitespace() {
        assert!(Address::new("").is_err());
        assert!(Address::new("zkr1 abc").is_err());
        assert!(Address::new("a".repeat(MAX_ADDRESS_LEN + 1)).is_err());
    }

    #[test]
    fn test_type_tags_lowercase_only() {
        assert!(ProofType::new("groth16").is_ok());
        assert!(CircuitType::new("age-proof").is_ok());
        assert!(ProofType::new("Groth16").is_err());
        assert!(CircuitType::new("age proof").is_err());
    }

    #[test]
    fn test_sequence_ids() {
        assert_eq!(CircuitId::from_sequence(1).as_str(), "circuit-1");
        assert_eq!(ProofId::from_sequence(12).as_str(), "proof-12");
        assert_eq!(RequestId::from_sequence(3).as_str(), "request-3");
    }

    #[test]
    fn test_serde_rejects_invalid() {
        let ok: Result<ProofType, _> = serde_json::from_str("\"plonk\"");
        assert!(ok.is_ok());
        let bad: Result<ProofType, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_serde_is_transparent_string() {
        let id = ProofId::from_sequence(4);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"proof-4\"");
    }

    #[test]
    fn test_borrow_str_lookup() {
        let mut set = std::collections::BTreeSet::new();
        set.insert(ProofType::new("groth16").unwrap());
        assert!(set.contains("groth16"));
    }
}
