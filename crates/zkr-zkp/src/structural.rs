//! # Structural Verifier
//!
//! Shape-only checks: the proof carries bytes and at least as many public
//! inputs as the circuit marks required. Anything passing those checks is
//! reported valid. This provides **no cryptographic assurance**; install it
//! only as an explicit fallback on development networks.

use crate::traits::{CircuitDescriptor, ProofEnvelope, ProofVerifier, VerifyError};

/// Accepts any structurally well-formed proof.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuralVerifier;

impl ProofVerifier for StructuralVerifier {
    fn name(&self) -> &'static str {
        "structural"
    }

    fn verify(
        &self,
        circuit: &CircuitDescriptor<'_>,
        proof: &ProofEnvelope<'_>,
    ) -> Result<bool, VerifyError> {
        if proof.proof_data.is_empty() {
            return Ok(false);
        }
        let present = proof
            .public_inputs
            .iter()
            .filter(|input| !input.is_empty())
            .count();
        Ok(present >= circuit.required_public_inputs)
    }
}
