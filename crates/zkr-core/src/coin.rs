//! # Coin: Denominated Amounts
//!
//! Fees and rewards are integer amounts of a named denomination. Amounts
//! are `u64` so they survive canonicalization as JSON integers.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// An amount of a single denomination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// Denomination, e.g. `uzkr`.
    pub denom: String,
    /// Amount in the smallest unit.
    pub amount: u64,
}

impl Coin {
    /// Create a coin after validating the denomination.
    ///
    /// Denominations are 3-64 characters, start with a lowercase letter, and
    /// contain only lowercase letters, digits, `/`, `-` or `.`.
    pub fn new(denom: impl Into<String>, amount: u64) -> Result<Self, CoreError> {
        let denom = denom.into();
        validate_denom(&denom)?;
        Ok(Self { denom, amount })
    }

    /// A zero amount of `denom`. Zero fees skip the transfer entirely.
    pub fn zero(denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: 0,
        }
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Re-run denomination validation (used for deserialized values).
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_denom(&self.denom)
    }

    /// `true` when both coins share a denomination and `self >= other`.
    pub fn covers(&self, other: &Coin) -> bool {
        other.is_zero() || (self.denom == other.denom && self.amount >= other.amount)
    }
}

impl std::fmt::Display for Coin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

fn validate_denom(denom: &str) -> Result<(), CoreError> {
    let len_ok = (3..=64).contains(&denom.len());
    let first_ok = denom.chars().next().is_some_and(|c| c.is_ascii_lowercase());
    let rest_ok = denom
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '/' | '-' | '.'));
    if len_ok && first_ok && rest_ok {
        Ok(())
    } else {
        Err(CoreError::InvalidCoin(format!("invalid denomination {denom:?}")))
    }
}
