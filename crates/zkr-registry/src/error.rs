//! # Registry Errors
//!
//! Every handler returns a typed [`RegistryError`]. Callers branch on
//! [`RegistryError::kind()`] (the error class) or [`RegistryError::code()`]
//! (a stable numeric code for wire responses) instead of matching strings.
//!
//! ## Propagation
//!
//! Handlers run validate → charge → write → index. All validation and
//! capability checks happen before the fee transfer, so any error returned
//! before the charge leaves state byte-for-byte unchanged.

use thiserror::Error;

use zkr_core::CoreError;
use zkr_store::StoreError;
use zkr_zkp::VerifyError;

/// Error class, for callers that branch on the category of failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed identity, empty field, size over limit, disallowed type.
    Validation,
    /// Circuit, proof or request id does not resolve.
    NotFound,
    /// Caller is not allowed to perform the operation.
    Authorization,
    /// Operation conflicts with the entity's current state.
    StateConflict,
    /// A required fee could not be paid.
    Economic,
    /// The verification backend could not reach a verdict.
    Verification,
    /// Storage or encoding failure that validation should have prevented.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Authorization => "authorization",
            Self::StateConflict => "state_conflict",
            Self::Economic => "economic",
            Self::Verification => "verification",
            Self::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Errors returned by registry handlers, queries and genesis import.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    // ── Validation ───────────────────────────────────────────────────
    /// Creator or prover identity rejected by the identity registry.
    #[error("invalid prover: {0}")]
    InvalidProver(String),

    /// Verifier or requester identity rejected by the identity registry.
    #[error("invalid verifier: {0}")]
    InvalidVerifier(String),

    /// Circuit name/description/input specs are malformed.
    #[error("invalid circuit definition: {0}")]
    InvalidCircuitDefinition(String),

    /// Circuit payload exceeds `max_circuit_size`.
    #[error("circuit too large: {size} bytes exceeds limit of {max}")]
    CircuitTooLarge {
        /// Submitted payload size.
        size: u64,
        /// Configured limit.
        max: u64,
    },

    /// Circuit type not in the allowed set.
    #[error("invalid circuit type: {0}")]
    InvalidCircuitType(String),

    /// Proof bytes are empty or otherwise malformed.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// Proof bytes exceed `max_proof_size`.
    #[error("proof too large: {size} bytes exceeds limit of {max}")]
    ProofTooLarge {
        /// Submitted proof size.
        size: u64,
        /// Configured limit.
        max: u64,
    },

    /// Proof type not allowed, or not supported by the circuit.
    #[error("invalid proof type: {0}")]
    InvalidProofType(String),

    /// Proof request fields are malformed.
    #[error("malformed proof request: {0}")]
    MalformedProofRequest(String),

    /// A submitted proof does not satisfy the request it names.
    #[error("proof does not match request: {0}")]
    ProofRequestMismatch(String),

    /// Parameters failed validation.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Genesis state failed validation.
    #[error("invalid genesis: {0}")]
    InvalidGenesis(String),

    // ── Not found ────────────────────────────────────────────────────
    /// Circuit id does not resolve.
    #[error("invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Proof id does not resolve.
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    /// Proof request id does not resolve.
    #[error("invalid proof request: {0}")]
    InvalidProofRequest(String),

    // ── Authorization ────────────────────────────────────────────────
    /// Caller is not the circuit creator, the named verifier, or the
    /// request's target prover.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    // ── State conflict ───────────────────────────────────────────────
    /// A circuit with the generated id already exists.
    #[error("circuit already exists: {0}")]
    CircuitAlreadyExists(String),

    /// Circuit is deactivated; new submissions are refused.
    #[error("circuit inactive: {0}")]
    CircuitInactive(String),

    /// Proof is past its validity window.
    #[error("proof expired: {0}")]
    ProofExpired(String),

    /// Proof has already been adjudicated.
    #[error("proof already verified: {id} is {status}")]
    ProofAlreadyVerified {
        /// Proof id.
        id: String,
        /// Current status.
        status: String,
    },

    /// Request deadline is in the past.
    #[error("proof request expired: {0}")]
    ProofRequestExpired(String),

    /// Request is no longer pending.
    #[error("proof request not pending: {id} is {status}")]
    ProofRequestNotPending {
        /// Request id.
        id: String,
        /// Current status.
        status: String,
    },

    // ── Economic ─────────────────────────────────────────────────────
    /// Fee could not be paid or the offered fee is below the required one.
    #[error("insufficient fees: {0}")]
    InsufficientFees(String),

    // ── Verification ─────────────────────────────────────────────────
    /// The verification backend errored (as opposed to returning invalid).
    #[error("proof verification failed: {0}")]
    ProofVerificationFailed(#[from] VerifyError),

    // ── Internal ─────────────────────────────────────────────────────
    /// Storage failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Core value construction failure.
    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

impl RegistryError {
    /// The error class.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidProver(_)
            | Self::InvalidVerifier(_)
            | Self::InvalidCircuitDefinition(_)
            | Self::CircuitTooLarge { .. }
            | Self::InvalidCircuitType(_)
            | Self::MalformedProof(_)
            | Self::ProofTooLarge { .. }
            | Self::InvalidProofType(_)
            | Self::MalformedProofRequest(_)
            | Self::ProofRequestMismatch(_)
            | Self::InvalidParams(_)
            | Self::InvalidGenesis(_) => ErrorKind::Validation,
            Self::InvalidCircuit(_) | Self::InvalidProof(_) | Self::InvalidProofRequest(_) => {
                ErrorKind::NotFound
            }
            Self::Unauthorized(_) => ErrorKind::Authorization,
            Self::CircuitAlreadyExists(_)
            | Self::CircuitInactive(_)
            | Self::ProofExpired(_)
            | Self::ProofAlreadyVerified { .. }
            | Self::ProofRequestExpired(_)
            | Self::ProofRequestNotPending { .. } => ErrorKind::StateConflict,
            Self::InsufficientFees(_) => ErrorKind::Economic,
            Self::ProofVerificationFailed(_) => ErrorKind::Verification,
            Self::Store(_) | Self::Core(_) => ErrorKind::Internal,
        }
    }

    /// Stable numeric code. Never renumber; only append.
    pub fn code(&self) -> u32 {
        match self {
            Self::InvalidCircuit(_) => 2,
            Self::InvalidProof(_) => 3,
            Self::InvalidProver(_) => 4,
            Self::InvalidVerifier(_) => 5,
            Self::CircuitAlreadyExists(_) => 6,
            Self::ProofExpired(_) => 7,
            Self::InsufficientFees(_) => 8,
            Self::InvalidProofType(_) => 9,
            Self::InvalidCircuitType(_) => 10,
            Self::CircuitTooLarge { .. } => 11,
            Self::ProofTooLarge { .. } => 12,
            Self::ProofVerificationFailed(_) => 13,
            Self::Unauthorized(_) => 14,
            Self::CircuitInactive(_) => 15,
            Self::ProofRequestExpired(_) => 16,
            Self::InvalidProofRequest(_) => 17,
            Self::ProofAlreadyVerified { .. } => 18,
            Self::ProofRequestNotPending { .. } => 19,
            Self::ProofRequestMismatch(_) => 20,
            Self::MalformedProof(_) => 21,
            Self::MalformedProofRequest(_) => 22,
            Self::InvalidCircuitDefinition(_) => 23,
            Self::InvalidParams(_) => 24,
            Self::InvalidGenesis(_) => 25,
            Self::Store(_) => 26,
            Self::Core(_) => 27,
        }
    }
}
