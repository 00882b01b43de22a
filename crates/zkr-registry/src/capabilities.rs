//! # External Capabilities
//!
//! The registry consumes two collaborators it does not own: an identity
//! registry that says whether an address may act, and an account ledger
//! that moves fees. Both are traits so the host chain can plug in its own
//! modules. In-memory implementations are provided for tests and the CLI.
//!
//! Proof verification is the third capability; it lives in `zkr-zkp`.

use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use zkr_core::{Address, Coin};

// ─── Identity ──────────────────────────────────────────────────────────

/// Why an identity check failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The address has no registered identity.
    #[error("no identity registered for {0}")]
    Unknown(Address),

    /// The identity exists but has been revoked.
    #[error("identity for {0} is revoked")]
    Revoked(Address),
}

/// Identity registry capability.
pub trait IdentityValidator {
    /// Succeed when `address` holds a usable identity.
    fn validate_identity(&self, address: &Address) -> Result<(), IdentityError>;
}

/// Accepts every well-formed address. Address syntax is already enforced
/// by the [`Address`] newtype.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenIdentities;

impl IdentityValidator for OpenIdentities {
    fn validate_identity(&self, _address: &Address) -> Result<(), IdentityError> {
        Ok(())
    }
}

/// Allow-list identity registry with revocation.
#[derive(Debug, Default, Clone)]
pub struct IdentityRegistry {
    registered: BTreeSet<Address>,
    revoked: BTreeSet<Address>,
}

impl IdentityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `address`, clearing any revocation.
    pub fn register(&mut self, address: Address) {
        self.revoked.remove(&address);
        self.registered.insert(address);
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, address: Address) -> Self {
        self.register(address);
        self
    }

    /// Revoke a registered identity.
    pub fn revoke(&mut self, address: &Address) {
        if self.registered.contains(address) {
            self.revoked.insert(address.clone());
        }
    }
}

impl IdentityValidator for IdentityRegistry {
    fn validate_identity(&self, address: &Address) -> Result<(), IdentityError> {
        if !self.registered.contains(address) {
            return Err(IdentityError::Unknown(address.clone()));
        }
        if self.revoked.contains(address) {
            return Err(IdentityError::Revoked(address.clone()));
        }
        Ok(())
    }
}

// ─── Ledger ────────────────────────────────────────────────────────────

/// Why a transfer failed. A failed transfer moves nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Sender balance is below the amount.
    #[error("{account} holds {available}, needs {required}")]
    InsufficientFunds {
        account: Address,
        available: Coin,
        required: Coin,
    },

    /// Recipient balance would overflow.
    #[error("balance overflow crediting {account}")]
    Overflow { account: Address },
}

/// Account/balance ledger capability. `transfer` must be atomic.
pub trait Ledger {
    /// Move `amount` from `from` to `to`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coin) -> Result<(), LedgerError>;
}

/// In-memory multi-denomination ledger.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BankLedger {
    balances: BTreeMap<(Address, String), u64>,
}

impl BankLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `coin` to `account` (test and genesis funding).
    pub fn mint(&mut self, account: &Address, coin: &Coin) -> Result<(), LedgerError> {
        let key = (account.clone(), coin.denom.clone());
        let current = self.balances.get(&key).copied().unwrap_or(0);
        let next = current.checked_add(coin.amount).ok_or_else(|| LedgerError::Overflow {
            account: account.clone(),
        })?;
        self.balances.insert(key, next);
        Ok(())
    }

    /// Balance of `denom` held by `account`.
    pub fn balance(&self, account: &Address, denom: &str) -> Coin {
        let amount = self
            .balances
            .get(&(account.clone(), denom.to_string()))
            .copied()
            .unwrap_or(0);
        Coin {
            denom: denom.to_string(),
            amount,
        }
    }
}

impl Ledger for BankLedger {
    fn transfer(&mut self, from: &Address, to: &Address, amount: &Coin) -> Result<(), LedgerError> {
        if amount.is_zero() || from == to {
            return Ok(());
        }
        let available = self.balance(from, &amount.denom);
        let remaining = available
            .amount
            .checked_sub(amount.amount)
            .ok_or_else(|| LedgerError::InsufficientFunds {
                account: from.clone(),
                available: available.clone(),
                required: amount.clone(),
            })?;
        let credited = self
            .balance(to, &amount.denom)
            .amount
            .checked_add(amount.amount)
            .ok_or_else(|| LedgerError::Overflow { account: to.clone() })?;

        self.balances.insert((from.clone(), amount.denom.clone()), remaining);
        self.balances.insert((to.clone(), amount.denom.clone()), credited);
        Ok(())
    }
}
