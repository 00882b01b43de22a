//! Lowercase hex encoding and a serde adapter for opaque byte fields.
//!
//! Circuit payloads, proof bytes and verification contexts are opaque
//! `Vec<u8>` values. In genesis JSON they are written as hex strings rather
//! than arrays of numbers.

use crate::error::CoreError;

/// Encode bytes as a lowercase hex string.
pub fn encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Decode a hex string (either case). Rejects odd lengths and non-hex input.
pub fn decode(s: &str) -> Result<Vec<u8>, CoreError> {
    if s.len() % 2 != 0 {
        return Err(CoreError::InvalidIdentifier {
            kind: "hex",
            value: s.to_string(),
            reason: "odd length",
        });
    }
    s.as_bytes()
        .chunks(2)
        .map(|pair| {
            let hi = nibble(pair[0]);
            let lo = nibble(pair[1]);
            match (hi, lo) {
                (Some(h), Some(l)) => Ok((h << 4) | l),
                _ => Err(CoreError::InvalidIdentifier {
                    kind: "hex",
                    value: s.to_string(),
                    reason: "non-hex character",
                }),
            }
        })
        .collect()
}

fn nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

/// `#[serde(with = "zkr_core::hex::serde_bytes")]` for `Vec<u8>` fields.
pub mod serde_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(&[0x00, 0xab, 0xff]), "00abff");
        assert_eq!(encode(&[]), "");
    }

    #[test]
    fn test_decode_mixed_case() {
        assert_eq!(decode("00AbFf").unwrap(), vec![0x00, 0xab, 0xff]);
    }

    #[test]
    fn test_decode_rejects_odd_length() {
        assert!(decode("abc").is_err());
    }

    #[test]
    fn test_decode_rejects_non_hex() {
        assert!(decode("zz").is_err());
        assert!(decode("é1").is_err());
    }

    #[test]
    fn test_serde_adapter() {
        #[derive(serde::Serialize, serde::Deserialize, PartialEq, Debug)]
        struct Blob {
            #[serde(with = "super::serde_bytes")]
            data: Vec<u8>,
        }
        let blob = Blob { data: vec![1, 2, 254] };
        let json = serde_json::to_string(&blob).unwrap();
        assert_eq!(json, r#"{"data":"0102fe"}"#);
        let back: Blob = serde_json::from_str(&json).unwrap();
        assert_eq!(back, blob);
    }
}
