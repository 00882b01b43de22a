//! Transaction messages and their responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use zkr_core::{Address, CircuitId, CircuitType, Coin, ProofId, ProofType, RequestId, Timestamp};

use crate::circuit::InputSpec;
use crate::proof::ProofStatus;

/// Register a new circuit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateCircuit {
    pub creator: Address,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub circuit_type: CircuitType,
    pub supported_proof_types: Vec<ProofType>,
    #[serde(with = "zkr_core::hex::serde_bytes")]
    pub circuit_data: Vec<u8>,
    #[serde(default, with = "zkr_core::hex::serde_bytes")]
    pub parameters: Vec<u8>,
    #[serde(default)]
    pub public_input_spec: Vec<InputSpec>,
    #[serde(default)]
    pub private_input_spec: Vec<InputSpec>,
    #[serde(default)]
    pub constraint_count: u64,
    pub verification_method: String,
    #[serde(default)]
    pub trusted_setup: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateCircuitResponse {
    pub circuit_id: CircuitId,
}

/// Edit a circuit's metadata or toggle it. Only the creator may do this.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateCircuit {
    pub creator: Address,
    pub circuit_id: CircuitId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateCircuitResponse {
    pub version: u64,
}

/// Submit a proof against a circuit, optionally fulfilling a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitProof {
    pub prover: Address,
    #[serde(default)]
    pub verifier: Option<Address>,
    pub circuit_id: CircuitId,
    pub proof_type: ProofType,
    #[serde(with = "zkr_core::hex::serde_bytes")]
    pub proof_data: Vec<u8>,
    #[serde(default)]
    pub public_inputs: Vec<String>,
    #[serde(default, with = "zkr_core::hex::serde_bytes")]
    pub verification_context: Vec<u8>,
    /// Maximum fee the prover agrees to pay. `None` accepts the current
    /// `proof_submission_fee`.
    #[serde(default)]
    pub fee: Option<Coin>,
    #[serde(default)]
    pub request_id: Option<RequestId>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSubmitProofResponse {
    pub proof_id: ProofId,
}

/// Adjudicate a pending proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVerifyProof {
    pub verifier: Address,
    pub proof_id: ProofId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgVerifyProofResponse {
    pub status: ProofStatus,
    pub valid: bool,
}

/// Ask a specific prover for a proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateProofRequest {
    pub requester: Address,
    pub target_prover: Address,
    pub circuit_id: CircuitId,
    pub required_proof_type: ProofType,
    pub challenge: String,
    #[serde(default)]
    pub required_public_inputs: Vec<String>,
    pub deadline: Timestamp,
    pub reward: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgCreateProofRequestResponse {
    pub request_id: RequestId,
}
