//! # Digest Verifier (mock backend)
//!
//! A deterministic, transparent verification backend for development and
//! testing. A "proof" is the SHA-256 digest binding the circuit to the
//! public inputs:
//!
//! ```text
//! proof = SHA256( "zkr-mock-v1" || len(circuit_id) || circuit_id
//!               || len(circuit_data) || circuit_data
//!               || for each input: len(input) || input )
//! ```
//!
//! Lengths are big-endian `u64`, so no two distinct input lists hash the
//! same framed byte string.
//!
//! ## Security Warning
//!
//! **NOT ZERO-KNOWLEDGE.** Anyone can recompute the proof from public data.
//! It exists so the full submit/verify lifecycle can be exercised with both
//! valid and invalid outcomes without a real proving system.

use sha2::{Digest, Sha256};

use zkr_core::CircuitId;

use crate::traits::{CircuitDescriptor, ProofEnvelope, ProofVerifier, VerifyError};

const DOMAIN: &[u8] = b"zkr-mock-v1";
const PROOF_LEN: usize = 32;

/// Deterministic SHA-256 binding verifier.
#[derive(Debug, Default, Clone, Copy)]
pub struct DigestVerifier;

impl DigestVerifier {
    /// Produce the proof bytes the verifier will accept for these inputs.
    pub fn prove(circuit_id: &CircuitId, circuit_data: &[u8], public_inputs: &[String]) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN);
        frame(&mut hasher, circuit_id.as_str().as_bytes());
        frame(&mut hasher, circuit_data);
        for input in public_inputs {
            frame(&mut hasher, input.as_bytes());
        }
        hasher.finalize().to_vec()
    }
}

fn frame(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_be_bytes());
    hasher.update(bytes);
}

impl ProofVerifier for DigestVerifier {
    fn name(&self) -> &'static str {
        "digest-mock"
    }

    fn verify(
        &self,
        circuit: &CircuitDescriptor<'_>,
        proof: &ProofEnvelope<'_>,
    ) -> Result<bool, VerifyError> {
        if proof.proof_data.len() != PROOF_LEN {
            return Err(VerifyError::MalformedProof(format!(
                "expected {PROOF_LEN} proof bytes, got {}",
                proof.proof_data.len()
            )));
        }
        if proof.public_inputs.len() < circuit.required_public_inputs {
            return Ok(false);
        }
        let expected = Self::prove(circuit.id, circuit.circuit_data, proof.public_inputs);
        Ok(expected.as_slice() == proof.proof_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use zkr_core::{CircuitType, ProofId, ProofType};

    fn check(
        circuit_data: &[u8],
        inputs: &[String],
        proof_data: &[u8],
    ) -> Result<bool, VerifyError> {
        let circuit_id = CircuitId::from_sequence(1);
        let circuit_type = CircuitType::new("age-proof").unwrap();
        let proof_id = ProofId::from_sequence(1);
        let proof_type = ProofType::new("groth16").unwrap();
        let circuit = CircuitDescriptor {
            id: &circuit_id,
            circuit_type: &circuit_type,
            verification_method: "mock",
            circuit_data,
            parameters: &[],
            required_public_inputs: 0,
            trusted_setup: false,
        };
        let proof = ProofEnvelope {
            id: &proof_id,
            proof_type: &proof_type,
            proof_data,
            public_inputs: inputs,
            verification_context: &[],
        };
        DigestVerifier.verify(&circuit, &proof)
    }

    #[test]
    fn test_valid_proof_accepted() {
        let inputs = vec!["over18".to_string()];
        let proof = DigestVerifier::prove(&CircuitId::from_sequence(1), b"vk", &inputs);
        assert_eq!(check(b"vk", &inputs, &proof), Ok(true));
    }

    #[test]
    fn test_wrong_inputs_rejected() {
        let inputs = vec!["over18".to_string()];
        let proof = DigestVerifier::prove(&CircuitId::from_sequence(1), b"vk", &inputs);
        let other = vec!["over21".to_string()];
        assert_eq!(check(b"vk", &other, &proof), Ok(false));
    }

    #[test]
    fn test_other_circuit_rejected() {
        let inputs = vec!["x".to_string()];
        let proof = DigestVerifier::prove(&CircuitId::from_sequence(2), b"vk", &inputs);
        assert_eq!(check(b"vk", &inputs, &proof), Ok(false));
    }

    #[test]
    fn test_malformed_length_is_error() {
        assert!(matches!(
            check(b"vk", &[], b"short"),
            Err(VerifyError::MalformedProof(_))
        ));
    }

    #[test]
    fn test_framing_distinguishes_splits() {
        let id = CircuitId::from_sequence(1);
        let a = DigestVerifier::prove(&id, b"vk", &["ab".to_string(), "c".to_string()]);
        let b = DigestVerifier::prove(&id, b"vk", &["a".to_string(), "bc".to_string()]);
        assert_ne!(a, b);
    }

    proptest! {
        #[test]
        fn prove_then_verify_accepts(
            data in proptest::collection::vec(any::<u8>(), 0..64),
            inputs in proptest::collection::vec("[a-z0-9]{0,12}", 0..5),
        ) {
            let proof = DigestVerifier::prove(&CircuitId::from_sequence(1), &data, &inputs);
            prop_assert_eq!(check(&data, &inputs, &proof), Ok(true));
        }
    }
}
