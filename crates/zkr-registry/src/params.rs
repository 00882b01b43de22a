//! # Registry Parameters
//!
//! One `Params` record governs every mutating handler: size limits, the
//! allowed circuit and proof type sets, the four fees, and the proof
//! validity period. Handlers read it before any side effect.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use zkr_core::{CircuitType, Coin, ProofType};

use crate::error::RegistryError;

/// Denomination used by the default fee schedule.
pub const DEFAULT_FEE_DENOM: &str = "uzkr";

/// Default circuit payload limit: 1 MiB.
pub const DEFAULT_MAX_CIRCUIT_SIZE: u64 = 1024 * 1024;

/// Default proof payload limit: 64 KiB.
pub const DEFAULT_MAX_PROOF_SIZE: u64 = 64 * 1024;

/// Default proof validity: 30 days.
pub const DEFAULT_PROOF_VALIDITY_PERIOD_SECS: u64 = 30 * 24 * 60 * 60;

const DEFAULT_CIRCUIT_TYPES: &[&str] =
    &["age-proof", "identity", "membership", "range", "credential"];
const DEFAULT_PROOF_TYPES: &[&str] = &["groth16", "plonk", "stark", "bulletproofs"];

/// Module parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Maximum circuit payload size in bytes.
    pub max_circuit_size: u64,
    /// Maximum proof payload size in bytes.
    pub max_proof_size: u64,
    /// Circuit types accepted by `CreateCircuit`.
    pub allowed_circuit_types: BTreeSet<CircuitType>,
    /// Proof types accepted anywhere a proof type is named.
    pub allowed_proof_types: BTreeSet<ProofType>,
    /// Charged to the creator on `CreateCircuit`.
    pub circuit_creation_fee: Coin,
    /// Charged to the prover on `SubmitProof`.
    pub proof_submission_fee: Coin,
    /// Charged to the verifier on `VerifyProof`.
    pub proof_verification_fee: Coin,
    /// Charged to the requester on `CreateProofRequest`.
    pub proof_request_fee: Coin,
    /// Lifetime of a submitted proof. Zero means proofs never expire.
    pub proof_validity_period_secs: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            max_circuit_size: DEFAULT_MAX_CIRCUIT_SIZE,
            max_proof_size: DEFAULT_MAX_PROOF_SIZE,
            allowed_circuit_types: DEFAULT_CIRCUIT_TYPES
                .iter()
                .filter_map(|t| CircuitType::new(*t).ok())
                .collect(),
            allowed_proof_types: DEFAULT_PROOF_TYPES
                .iter()
                .filter_map(|t| ProofType::new(*t).ok())
                .collect(),
            circuit_creation_fee: Coin::zero(DEFAULT_FEE_DENOM),
            proof_submission_fee: Coin::zero(DEFAULT_FEE_DENOM),
            proof_verification_fee: Coin::zero(DEFAULT_FEE_DENOM),
            proof_request_fee: Coin::zero(DEFAULT_FEE_DENOM),
            proof_validity_period_secs: DEFAULT_PROOF_VALIDITY_PERIOD_SECS,
        }
    }
}

impl Params {
    /// Check limits, type sets and the fee schedule.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.max_circuit_size == 0 {
            return Err(RegistryError::InvalidParams(
                "max_circuit_size must be positive".into(),
            ));
        }
        if self.max_proof_size == 0 {
            return Err(RegistryError::InvalidParams(
                "max_proof_size must be positive".into(),
            ));
        }
        if self.allowed_circuit_types.is_empty() {
            return Err(RegistryError::InvalidParams(
                "allowed_circuit_types must not be empty".into(),
            ));
        }
        if self.allowed_proof_types.is_empty() {
            return Err(RegistryError::InvalidParams(
                "allowed_proof_types must not be empty".into(),
            ));
        }

        let fees = self.fees();
        for (name, fee) in &fees {
            fee.validate()
                .map_err(|e| RegistryError::InvalidParams(format!("{name}: {e}")))?;
        }
        let denom = &self.circuit_creation_fee.denom;
        if let Some((name, fee)) = fees.iter().find(|(_, fee)| &fee.denom != denom) {
            return Err(RegistryError::InvalidParams(format!(
                "{name} is denominated in {}, expected {denom}",
                fee.denom
            )));
        }
        Ok(())
    }

    /// Whether `circuit_type` may be registered.
    pub fn allows_circuit_type(&self, circuit_type: &CircuitType) -> bool {
        self.allowed_circuit_types.contains(circuit_type)
    }

    /// Whether `proof_type` may be named by a circuit, proof or request.
    pub fn allows_proof_type(&self, proof_type: &ProofType) -> bool {
        self.allowed_proof_types.contains(proof_type)
    }

    fn fees(&self) -> [(&'static str, &Coin); 4] {
        [
            ("circuit_creation_fee", &self.circuit_creation_fee),
            ("proof_submission_fee", &self.proof_submission_fee),
            ("proof_verification_fee", &self.proof_verification_fee),
            ("proof_request_fee", &self.proof_request_fee),
        ]
    }
}
