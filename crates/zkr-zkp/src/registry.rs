//! # Verifier Registry
//!
//! Strategy table mapping each [`ProofType`] to the backend that adjudicates
//! it. Dispatch is a pure lookup; the registry adds no verdict logic of its
//! own.
//!
//! ## Unknown proof types
//!
//! A proof type with no registered backend is an error
//! (`VerifyError::UnsupportedProofType`), not an implicit success. The
//! registry keeper turns that into `ProofVerificationFailed` and the proof
//! stays `pending` until governance installs a backend. A fallback backend
//! can be installed explicitly with [`VerifierRegistry::with_fallback`].

use std::collections::BTreeMap;

use zkr_core::ProofType;

use crate::traits::{CircuitDescriptor, ProofEnvelope, ProofVerifier, VerifyError};

/// Backends keyed by proof type, with an optional fallback.
#[derive(Default)]
pub struct VerifierRegistry {
    backends: BTreeMap<ProofType, Box<dyn ProofVerifier>>,
    fallback: Option<Box<dyn ProofVerifier>>,
}

impl VerifierRegistry {
    /// An empty registry. Every proof type is unsupported until registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `backend` for `proof_type`, replacing any previous backend.
    pub fn register(&mut self, proof_type: ProofType, backend: impl ProofVerifier + 'static) {
        self.backends.insert(proof_type, Box::new(backend));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, proof_type: ProofType, backend: impl ProofVerifier + 'static) -> Self {
        self.register(proof_type, backend);
        self
    }

    /// Install a backend used for proof types with no dedicated entry.
    pub fn with_fallback(mut self, backend: impl ProofVerifier + 'static) -> Self {
        self.fallback = Some(Box::new(backend));
        self
    }

    /// Whether a backend (dedicated or fallback) would handle `proof_type`.
    pub fn supports(&self, proof_type: &ProofType) -> bool {
        self.fallback.is_some() || self.backends.contains_key(proof_type)
    }

    /// Proof types with a dedicated backend, in order.
    pub fn registered_types(&self) -> impl Iterator<Item = &ProofType> {
        self.backends.keys()
    }

    /// Dispatch to the backend for `proof.proof_type`.
    pub fn verify(
        &self,
        circuit: &CircuitDescriptor<'_>,
        proof: &ProofEnvelope<'_>,
    ) -> Result<bool, VerifyError> {
        let backend = self
            .backends
            .get(proof.proof_type)
            .or(self.fallback.as_ref())
            .ok_or_else(|| VerifyError::UnsupportedProofType(proof.proof_type.clone()))?;
        let verdict = backend.verify(circuit, proof);
        tracing::debug!(
            proof_id = %proof.id,
            proof_type = %proof.proof_type,
            backend = backend.name(),
            verdict = ?verdict,
            "proof verification dispatched"
        );
        verdict
    }
}

impl std::fmt::Debug for VerifierRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backends: BTreeMap<&str, &str> = self
            .backends
            .iter()
            .map(|(k, v)| (k.as_str(), v.name()))
            .collect();
        f.debug_struct("VerifierRegistry")
            .field("backends", &backends)
            .field("fallback", &self.fallback.as_ref().map(|b| b.name()))
            .finish()
    }
}
