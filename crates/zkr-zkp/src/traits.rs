//! # Proof Verifier Trait
//!
//! Defines the capability the registry consumes to adjudicate proofs.
//!
//! A backend returns `Ok(true)` for a valid proof, `Ok(false)` for a proof
//! that was checked and found invalid, and `Err(_)` when it could not reach
//! a verdict at all (malformed encoding, unsupported proof type). The
//! registry records the first two as `valid`/`invalid` and rejects the
//! operation on the third, leaving the proof `pending`.

use thiserror::Error;

use zkr_core::{CircuitId, CircuitType, ProofId, ProofType};

/// Error from a verification backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// No backend is registered for the proof type.
    #[error("no verifier registered for proof type {0}")]
    UnsupportedProofType(ProofType),

    /// The proof bytes could not be decoded by the backend.
    #[error("malformed proof: {0}")]
    MalformedProof(String),

    /// The circuit's verification material is unusable.
    #[error("key mismatch: {0}")]
    KeyMismatch(String),

    /// Internal backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Borrowed view of the circuit a proof is verified against.
#[derive(Debug, Clone, Copy)]
pub struct CircuitDescriptor<'a> {
    /// Circuit identifier.
    pub id: &'a CircuitId,
    /// Circuit type tag.
    pub circuit_type: &'a CircuitType,
    /// Verification method tag recorded at registration.
    pub verification_method: &'a str,
    /// Opaque circuit payload (constraint system, verifying key, ...).
    pub circuit_data: &'a [u8],
    /// Opaque parameter bytes.
    pub parameters: &'a [u8],
    /// Number of public inputs the circuit marks as required.
    pub required_public_inputs: usize,
    /// Whether the circuit relies on a trusted setup ceremony.
    pub trusted_setup: bool,
}

/// Borrowed view of the proof being verified.
#[derive(Debug, Clone, Copy)]
pub struct ProofEnvelope<'a> {
    /// Proof identifier.
    pub id: &'a ProofId,
    /// Proving system tag.
    pub proof_type: &'a ProofType,
    /// Opaque proof bytes.
    pub proof_data: &'a [u8],
    /// Public inputs as submitted.
    pub public_inputs: &'a [String],
    /// Opaque verification context bytes.
    pub verification_context: &'a [u8],
}

/// A verification backend for one or more proof types.
///
/// Implementations must be deterministic: every replica runs the same
/// backend over the same bytes and must reach the same verdict.
pub trait ProofVerifier: Send + Sync {
    /// Short backend name used in logs.
    fn name(&self) -> &'static str;

    /// Verify `proof` against `circuit`.
    fn verify(
        &self,
        circuit: &CircuitDescriptor<'_>,
        proof: &ProofEnvelope<'_>,
    ) -> Result<bool, VerifyError>;
}
