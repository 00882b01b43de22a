//! # Circuit
//!
//! A registered proving circuit. Circuits are never deleted; deactivation
//! (`active = false`) blocks new proof submissions but leaves the circuit
//! queryable and its existing proofs verifiable.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use zkr_core::{Address, CircuitId, CircuitType, ProofType, Timestamp};
use zkr_store::{IndexEntry, Record};
use zkr_zkp::CircuitDescriptor;

/// Index: circuits by creator address.
pub const IDX_CIRCUIT_CREATOR: &str = "creator";

/// Declaration of one circuit input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSpec {
    /// Input name.
    pub name: String,
    /// Free-form type tag, e.g. `u64` or `field`.
    pub data_type: String,
    /// Whether the input must be supplied.
    #[serde(default)]
    pub required: bool,
}

/// A registered circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Circuit {
    pub id: CircuitId,
    pub creator: Address,
    pub name: String,
    pub description: String,
    pub circuit_type: CircuitType,
    pub supported_proof_types: BTreeSet<ProofType>,
    #[serde(with = "zkr_core::hex::serde_bytes")]
    pub circuit_data: Vec<u8>,
    #[serde(with = "zkr_core::hex::serde_bytes")]
    pub parameters: Vec<u8>,
    pub public_input_spec: Vec<InputSpec>,
    pub private_input_spec: Vec<InputSpec>,
    pub constraint_count: u64,
    pub public_input_count: u32,
    pub private_input_count: u32,
    pub verification_method: String,
    pub trusted_setup: bool,
    /// Starts at 1; incremented by every `UpdateCircuit`.
    pub version: u64,
    pub active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub block_height: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Proofs submitted against this circuit.
    #[serde(default)]
    pub proof_count: u64,
    /// Proofs against this circuit that have been adjudicated.
    #[serde(default)]
    pub verified_count: u64,
}

impl Circuit {
    /// Whether the circuit accepts proofs of `proof_type`.
    pub fn supports(&self, proof_type: &ProofType) -> bool {
        self.supported_proof_types.contains(proof_type)
    }

    /// Number of public inputs marked `required`.
    pub fn required_public_inputs(&self) -> usize {
        self.public_input_spec.iter().filter(|s| s.required).count()
    }

    /// Borrowed view handed to verification backends.
    pub fn descriptor(&self) -> CircuitDescriptor<'_> {
        CircuitDescriptor {
            id: &self.id,
            circuit_type: &self.circuit_type,
            verification_method: &self.verification_method,
            circuit_data: &self.circuit_data,
            parameters: &self.parameters,
            required_public_inputs: self.required_public_inputs(),
            trusted_setup: self.trusted_setup,
        }
    }
}

impl Record for Circuit {
    type Id = CircuitId;
    const TABLE: &'static str = "circuits";
    const INDICES: &'static [&'static str] = &[IDX_CIRCUIT_CREATOR];

    fn id(&self) -> &CircuitId {
        &self.id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![IndexEntry::new(IDX_CIRCUIT_CREATOR, &self.creator)]
    }
}
