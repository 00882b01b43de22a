//! # Proof Request
//!
//! A solicitation from a requester to a specific target prover for a proof
//! against a given circuit. A request is fulfilled when the target prover
//! submits a proof naming it (`MsgSubmitProof::request_id`); the submission
//! and the completion commit together.
//!
//! ```text
//! PENDING ──▶ COMPLETED
//!    └──────▶ EXPIRED   (read-time, once now > deadline)
//! ```

use serde::{Deserialize, Serialize};

use zkr_core::{Address, CircuitId, Coin, ProofId, ProofType, RequestId, Timestamp};
use zkr_store::{IndexEntry, Record};

use crate::error::RegistryError;
use crate::proof::ZkProof;

/// Index: requests by requester.
pub const IDX_REQUEST_REQUESTER: &str = "requester";
/// Index: requests by target prover.
pub const IDX_REQUEST_TARGET: &str = "target";
/// Index: requests by stored status.
pub const IDX_REQUEST_STATUS: &str = "status";

/// Lifecycle status of a proof request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Completed,
    Expired,
}

impl RequestStatus {
    /// Lowercase tag used in indices, events and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request for a proof from a specific prover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofRequest {
    pub id: RequestId,
    pub requester: Address,
    pub target_prover: Address,
    pub circuit_id: CircuitId,
    pub required_proof_type: ProofType,
    pub challenge: String,
    #[serde(default)]
    pub required_public_inputs: Vec<String>,
    pub deadline: Timestamp,
    /// Advertised reward. Recorded only; the registry does not escrow it.
    pub reward: Coin,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof_id: Option<ProofId>,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<Timestamp>,
}

impl ProofRequest {
    /// The status as observed at `now`.
    pub fn effective_status(&self, now: Timestamp) -> RequestStatus {
        match self.status {
            RequestStatus::Pending if now > self.deadline => RequestStatus::Expired,
            status => status,
        }
    }

    /// A copy carrying its effective status at `now`, for query results.
    pub fn observed_at(&self, now: Timestamp) -> Self {
        let mut view = self.clone();
        view.status = self.effective_status(now);
        view
    }

    /// Check that `proof`, submitted at `now`, fulfils this request.
    ///
    /// Pure; nothing is written. Called before any fee is charged.
    pub fn check_fulfilment(&self, proof: &ZkProof, now: Timestamp) -> Result<(), RegistryError> {
        match self.effective_status(now) {
            RequestStatus::Pending => {}
            RequestStatus::Expired => {
                return Err(RegistryError::ProofRequestExpired(self.id.to_string()))
            }
            status => {
                return Err(RegistryError::ProofRequestNotPending {
                    id: self.id.to_string(),
                    status: status.to_string(),
                })
            }
        }
        if proof.prover != self.target_prover {
            return Err(RegistryError::Unauthorized(format!(
                "{} is not the target prover of {}",
                proof.prover, self.id
            )));
        }
        if proof.circuit_id != self.circuit_id {
            return Err(RegistryError::ProofRequestMismatch(format!(
                "{} requires circuit {}, got {}",
                self.id, self.circuit_id, proof.circuit_id
            )));
        }
        if proof.proof_type != self.required_proof_type {
            return Err(RegistryError::ProofRequestMismatch(format!(
                "{} requires proof type {}, got {}",
                self.id, self.required_proof_type, proof.proof_type
            )));
        }
        if let Some(missing) = self
            .required_public_inputs
            .iter()
            .find(|input| !proof.public_inputs.contains(input))
        {
            return Err(RegistryError::ProofRequestMismatch(format!(
                "{} requires public input {missing:?}",
                self.id
            )));
        }
        if !proof.public_inputs.contains(&self.challenge) {
            return Err(RegistryError::ProofRequestMismatch(format!(
                "{} requires challenge {:?} among public inputs",
                self.id, self.challenge
            )));
        }
        Ok(())
    }

    /// Mark the request completed by `proof_id`.
    pub fn complete(&mut self, proof_id: &ProofId, now: Timestamp) {
        self.status = RequestStatus::Completed;
        self.proof_id = Some(proof_id.clone());
        self.completed_at = Some(now);
    }
}

impl Record for ProofRequest {
    type Id = RequestId;
    const TABLE: &'static str = "proof_requests";
    const INDICES: &'static [&'static str] =
        &[IDX_REQUEST_REQUESTER, IDX_REQUEST_TARGET, IDX_REQUEST_STATUS];

    fn id(&self) -> &RequestId {
        &self.id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        vec![
            IndexEntry::new(IDX_REQUEST_REQUESTER, &self.requester),
            IndexEntry::new(IDX_REQUEST_TARGET, &self.target_prover),
            IndexEntry::new(IDX_REQUEST_STATUS, self.status),
        ]
    }
}
