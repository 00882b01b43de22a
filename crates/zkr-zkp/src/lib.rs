//! # zkr-zkp: Pluggable Proof Verification
//!
//! The registry never does proof math itself. It hands a circuit and a proof
//! to a [`ProofVerifier`] and records the verdict.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): `ProofVerifier`, the capability every backend
//!   implements, plus the borrowed views it receives.
//! - **Registry** (`registry.rs`): `VerifierRegistry`, a strategy table keyed
//!   by `ProofType`. Proof types with no registered backend are rejected
//!   with `VerifyError::UnsupportedProofType` unless a fallback is installed.
//! - **Structural** (`structural.rs`): shape-only checks (non-empty proof
//!   bytes, required public inputs present). Carries no cryptographic
//!   assurance.
//! - **Mock** (`mock.rs`, feature `mock`): `DigestVerifier`, a deterministic
//!   SHA-256 binding of circuit and public inputs. Transparent, not
//!   zero-knowledge; used for tests and devnets.
//!
//! ## Crate Policy
//!
//! - Verification is a pure function: no I/O, no clocks, no randomness.
//! - Real proving systems plug in behind feature flags.

#[cfg(feature = "mock")]
pub mod mock;
pub mod registry;
pub mod structural;
pub mod traits;

#[cfg(feature = "mock")]
pub use mock::DigestVerifier;
pub use registry::VerifierRegistry;
pub use structural::StructuralVerifier;
pub use traits::{CircuitDescriptor, ProofEnvelope, ProofVerifier, VerifyError};
