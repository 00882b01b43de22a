//! # Block Time
//!
//! `Timestamp` is a UTC instant with whole-second precision. There is no
//! `now()`: handlers receive block time from the replication layer and
//! nothing else. Every expiry decision compares two `Timestamp`s.
//!
//! The only accepted text form is RFC 3339 with a `Z` suffix, e.g.
//! `2026-03-01T12:00:00Z`. Fractional seconds are dropped on parse.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A block timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Parse `YYYY-MM-DDTHH:MM:SS[.frac]Z`. Numeric offsets are rejected,
    /// `+00:00` included, so one instant has one spelling.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        if !s.ends_with('Z') {
            return Err(CoreError::InvalidTimestamp(format!(
                "{s:?} must be UTC with a Z suffix"
            )));
        }
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc).trunc_subsecs(0)))
            .map_err(|e| CoreError::InvalidTimestamp(format!("{s:?}: {e}")))
    }

    /// Seconds since the Unix epoch.
    pub fn from_epoch_secs(secs: i64) -> Result<Self, CoreError> {
        DateTime::from_timestamp(secs, 0)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidTimestamp(format!("epoch second {secs} out of range")))
    }

    pub fn epoch_secs(&self) -> i64 {
        self.0.timestamp()
    }

    /// `self + secs`, or an error past the representable range.
    pub fn checked_add_secs(&self, secs: u64) -> Result<Self, CoreError> {
        i64::try_from(secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
            .ok_or_else(|| CoreError::InvalidTimestamp(format!("{self} + {secs}s out of range")))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl TryFrom<String> for Timestamp {
    type Error = CoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Timestamp> for String {
    fn from(ts: Timestamp) -> String {
        ts.to_string()
    }
}
