//! # zkr-core: Foundational Types for the ZK Proof Registry
//!
//! The leaf crate of the workspace. Every other crate depends on `zkr-core`;
//! it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `Address`, `CircuitId`, `ProofId`,
//!    `RequestId`, `CircuitType`, `ProofType` are distinct types with
//!    validated constructors. You cannot pass a `ProofId` where a
//!    `CircuitId` is expected.
//!
//! 2. **Logical time only.** [`Timestamp`] has no wall-clock constructor.
//!    Every "now" in the registry is the block time supplied by the
//!    replication layer, so all replicas compute identical results.
//!
//! 3. **`CanonicalBytes` for digests.** State digests (used to compare
//!    genesis exports) flow through JCS canonicalization; floats are rejected.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zkr-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod coin;
pub mod digest;
pub mod error;
pub mod hex;
pub mod identity;
pub mod temporal;

pub use canonical::CanonicalBytes;
pub use coin::Coin;
pub use digest::{sha256_digest, ContentDigest};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{Address, CircuitId, CircuitType, ProofId, ProofType, RequestId};
pub use temporal::Timestamp;
