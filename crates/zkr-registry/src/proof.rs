//! # ZK Proof
//!
//! A proof submitted against a circuit, and its one-way lifecycle:
//!
//! ```text
//! PENDING ──▶ VALID ──┐
//!    │                ├──▶ EXPIRED   (read-time, once now > valid_to)
//!    ├──▶ INVALID     │
//!    └────────────────┘
//! ```
//!
//! Adjudication (`pending → valid | invalid`) is a stored transition.
//! Expiry is not: the stored status stays `pending`/`valid` and
//! [`ZkProof::effective_status`] reports `expired` once the supplied block
//! time passes `valid_to`. Queries and handlers always consult the
//! effective status.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use zkr_core::{Address, CircuitId, Coin, ProofId, ProofType, RequestId, Timestamp};
use zkr_store::{IndexEntry, Record};
use zkr_zkp::ProofEnvelope;

use crate::error::RegistryError;

/// Index: proofs by prover address.
pub const IDX_PROOF_PROVER: &str = "prover";
/// Index: proofs by designated verifier (only set when named).
pub const IDX_PROOF_VERIFIER: &str = "verifier";
/// Index: proofs by circuit id.
pub const IDX_PROOF_CIRCUIT: &str = "circuit";
/// Index: proofs by stored status.
pub const IDX_PROOF_STATUS: &str = "status";
/// Index: proofs by proof type.
pub const IDX_PROOF_TYPE: &str = "type";

/// Lifecycle status of a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProofStatus {
    Pending,
    Valid,
    Invalid,
    Expired,
}

impl ProofStatus {
    /// Lowercase tag used in indices, events and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Expired => "expired",
        }
    }

    /// Whether no further transition can happen.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Invalid | Self::Expired)
    }
}

impl std::fmt::Display for ProofStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted proof.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZkProof {
    pub id: ProofId,
    pub circuit_id: CircuitId,
    pub prover: Address,
    /// Designated verifier. When set, only this address may verify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verifier: Option<Address>,
    pub proof_type: ProofType,
    #[serde(with = "zkr_core::hex::serde_bytes")]
    pub proof_data: Vec<u8>,
    pub public_inputs: Vec<String>,
    #[serde(with = "zkr_core::hex::serde_bytes")]
    pub verification_context: Vec<u8>,
    /// Stored status. See [`effective_status`](Self::effective_status).
    pub status: ProofStatus,
    pub valid_from: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_result: Option<bool>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub fee_paid: Coin,
    /// The proof request this submission fulfilled, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<RequestId>,
}

impl ZkProof {
    /// Whether `now` is past the validity window.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        self.valid_to.is_some_and(|to| now > to)
    }

    /// The status as observed at `now`.
    ///
    /// `pending` and `valid` proofs past `valid_to` report `expired`;
    /// `invalid` never changes.
    pub fn effective_status(&self, now: Timestamp) -> ProofStatus {
        match self.status {
            ProofStatus::Pending | ProofStatus::Valid if self.is_expired_at(now) => {
                ProofStatus::Expired
            }
            status => status,
        }
    }

    /// A copy carrying its effective status at `now`, for query results.
    pub fn observed_at(&self, now: Timestamp) -> Self {
        let mut view = self.clone();
        view.status = self.effective_status(now);
        view
    }

    /// Record the adjudication verdict.
    ///
    /// Only `pending`, unexpired proofs can be adjudicated; anything else is
    /// a state conflict and the proof is left untouched.
    pub fn adjudicate(
        &mut self,
        valid: bool,
        verifier: &Address,
        now: Timestamp,
    ) -> Result<(), RegistryError> {
        self.require_verifiable(now)?;
        self.status = if valid {
            ProofStatus::Valid
        } else {
            ProofStatus::Invalid
        };
        self.verification_result = Some(valid);
        self.verified_at = Some(now);
        self.verified_by = Some(verifier.clone());
        self.updated_at = now;
        Ok(())
    }

    /// Fail unless the proof can still be adjudicated at `now`.
    pub fn require_verifiable(&self, now: Timestamp) -> Result<(), RegistryError> {
        match self.effective_status(now) {
            ProofStatus::Pending => Ok(()),
            ProofStatus::Expired => Err(RegistryError::ProofExpired(self.id.to_string())),
            status => Err(RegistryError::ProofAlreadyVerified {
                id: self.id.to_string(),
                status: status.to_string(),
            }),
        }
    }

    /// Borrowed view handed to verification backends.
    pub fn envelope(&self) -> ProofEnvelope<'_> {
        ProofEnvelope {
            id: &self.id,
            proof_type: &self.proof_type,
            proof_data: &self.proof_data,
            public_inputs: &self.public_inputs,
            verification_context: &self.verification_context,
        }
    }
}

impl Record for ZkProof {
    type Id = ProofId;
    const TABLE: &'static str = "proofs";
    const INDICES: &'static [&'static str] = &[
        IDX_PROOF_PROVER,
        IDX_PROOF_VERIFIER,
        IDX_PROOF_CIRCUIT,
        IDX_PROOF_STATUS,
        IDX_PROOF_TYPE,
    ];

    fn id(&self) -> &ProofId {
        &self.id
    }

    fn index_entries(&self) -> Vec<IndexEntry> {
        let mut entries = vec![
            IndexEntry::new(IDX_PROOF_PROVER, &self.prover),
            IndexEntry::new(IDX_PROOF_CIRCUIT, &self.circuit_id),
            IndexEntry::new(IDX_PROOF_STATUS, self.status),
            IndexEntry::new(IDX_PROOF_TYPE, &self.proof_type),
        ];
        if let Some(verifier) = &self.verifier {
            entries.push(IndexEntry::new(IDX_PROOF_VERIFIER, verifier));
        }
        entries
    }
}
