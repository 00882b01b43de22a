//! # Registry State
//!
//! The persisted part of the registry: the parameter record and the three
//! entity tables. Everything here is plain data. Capabilities (identity,
//! ledger, verifiers) live on the [`Keeper`](crate::Keeper), so the state
//! can be loaded, queried and audited without them (the CLI does exactly
//! that).

use zkr_store::{StoreError, Table};

use crate::circuit::Circuit;
use crate::params::Params;
use crate::proof::ZkProof;
use crate::request::ProofRequest;

/// Params plus the circuit, proof and proof-request tables.
#[derive(Debug, Clone, Default)]
pub struct RegistryState {
    pub(crate) params: Params,
    pub(crate) circuits: Table<Circuit>,
    pub(crate) proofs: Table<ZkProof>,
    pub(crate) requests: Table<ProofRequest>,
}

impl RegistryState {
    /// Empty state governed by `params`.
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn circuits(&self) -> &Table<Circuit> {
        &self.circuits
    }

    pub fn proofs(&self) -> &Table<ZkProof> {
        &self.proofs
    }

    pub fn requests(&self) -> &Table<ProofRequest> {
        &self.requests
    }

    // ─── Multi-table writes ──────────────────────────────────────────

    /// Store a new proof along with the circuit counters and the request it
    /// completes.
    ///
    /// Updates run before the insert. If a later write fails the earlier
    /// ones are reverted, so an error leaves every table as it was.
    pub(crate) fn record_submission(
        &mut self,
        n: u64,
        proof: ZkProof,
        circuit: Circuit,
        request: Option<ProofRequest>,
    ) -> Result<(), StoreError> {
        let replaced_circuit = self.circuits.update(circuit)?;
        let replaced_request = match request {
            Some(request) => match self.requests.update(request) {
                Ok(previous) => Some(previous),
                Err(err) => {
                    self.circuits.update(replaced_circuit)?;
                    return Err(err);
                }
            },
            None => None,
        };
        if let Err(err) = self.proofs.insert_sequenced(n, proof) {
            self.circuits.update(replaced_circuit)?;
            if let Some(previous) = replaced_request {
                self.requests.update(previous)?;
            }
            return Err(err);
        }
        Ok(())
    }

    /// Store an adjudicated proof and its circuit's bumped counter.
    pub(crate) fn record_verification(
        &mut self,
        proof: ZkProof,
        circuit: Circuit,
    ) -> Result<(), StoreError> {
        let replaced_proof = self.proofs.update(proof)?;
        if let Err(err) = self.circuits.update(circuit) {
            self.proofs.update(replaced_proof)?;
            return Err(err);
        }
        Ok(())
    }
}
