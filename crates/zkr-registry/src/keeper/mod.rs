//! # Keeper
//!
//! The message-handling core. A [`Keeper`] owns the [`RegistryState`] and
//! the three capabilities it calls out to (identity registry, account
//! ledger, verification backends). Each handler takes `&mut self` and a
//! [`BlockContext`], runs to completion, and either commits everything or
//! changes nothing.
//!
//! ## Handler order
//!
//! Every mutating handler runs the same four phases:
//!
//! 1. **Validate.** Identity checks, existence and authorization, size and
//!    type limits, duplicate-id checks, request matching and (for
//!    `VerifyProof`) the verification call itself. Pure.
//! 2. **Charge.** The fee gate moves the parameterised fee from the
//!    initiator to the module account. Zero fees skip the transfer.
//! 3. **Write.** Primary records are inserted or replaced.
//! 4. **Index.** The store re-derives secondary entries in the same call.
//!
//! Phases 3 and 4 only run operations phase 1 has already shown to succeed.

mod circuits;
mod fees;
mod proofs;
mod requests;

use zkr_core::Address;
use zkr_zkp::VerifierRegistry;

use crate::capabilities::{IdentityValidator, Ledger};
use crate::error::RegistryError;
use crate::genesis::GenesisState;
use crate::params::Params;
use crate::state::RegistryState;

/// Registry state plus the capabilities its handlers consume.
pub struct Keeper<I, L> {
    state: RegistryState,
    identities: I,
    ledger: L,
    verifiers: VerifierRegistry,
    module_account: Address,
}

impl<I: IdentityValidator, L: Ledger> Keeper<I, L> {
    /// A keeper over empty state. Fails if `params` are invalid.
    pub fn new(
        module_account: Address,
        params: Params,
        identities: I,
        ledger: L,
        verifiers: VerifierRegistry,
    ) -> Result<Self, RegistryError> {
        params.validate()?;
        Ok(Self {
            state: RegistryState::new(params),
            identities,
            ledger,
            verifiers,
            module_account,
        })
    }

    /// Replace all state with a validated genesis document.
    pub fn init_genesis(&mut self, genesis: &GenesisState) -> Result<(), RegistryError> {
        self.state = RegistryState::from_genesis(genesis)?;
        tracing::info!(
            circuits = self.state.circuits.len(),
            proofs = self.state.proofs.len(),
            proof_requests = self.state.requests.len(),
            "genesis imported"
        );
        Ok(())
    }

    /// Export the current state as a genesis document.
    pub fn export_genesis(&self) -> GenesisState {
        self.state.export_genesis()
    }

    /// Replace the parameter record. Governance entry point.
    pub fn set_params(&mut self, params: Params) -> Result<(), RegistryError> {
        params.validate()?;
        self.state.params = params;
        Ok(())
    }

    pub fn state(&self) -> &RegistryState {
        &self.state
    }

    pub fn params(&self) -> &Params {
        &self.state.params
    }

    pub fn module_account(&self) -> &Address {
        &self.module_account
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn identities_mut(&mut self) -> &mut I {
        &mut self.identities
    }

    pub fn verifiers_mut(&mut self) -> &mut VerifierRegistry {
        &mut self.verifiers
    }

    // ── Identity checks ──────────────────────────────────────────────

    fn require_prover(&self, address: &Address) -> Result<(), RegistryError> {
        self.identities
            .validate_identity(address)
            .map_err(|e| RegistryError::InvalidProver(e.to_string()))
    }

    fn require_verifier(&self, address: &Address) -> Result<(), RegistryError> {
        self.identities
            .validate_identity(address)
            .map_err(|e| RegistryError::InvalidVerifier(e.to_string()))
    }
}

impl<I, L> std::fmt::Debug for Keeper<I, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keeper")
            .field("module_account", &self.module_account)
            .field("circuits", &self.state.circuits.len())
            .field("proofs", &self.state.proofs.len())
            .field("proof_requests", &self.state.requests.len())
            .field("verifiers", &self.verifiers)
            .finish()
    }
}
