//! # zkr-registry: ZK Proof Registry State Machine
//!
//! Lets participants register zero-knowledge proof **circuits**, submit
//! **proofs** against them, have proofs **verified**, and solicit proofs
//! from specific provers through **proof requests**. Runs inside a
//! replicated, deterministic state machine: every replica applying the same
//! messages with the same block contexts reaches the same state.
//!
//! ## Structure
//!
//! - **Entities** (`circuit.rs`, `proof.rs`, `request.rs`): records, their
//!   lifecycle transitions and the secondary index entries they derive.
//! - **Keeper** (`keeper/`): the five message handlers and the fee gate.
//! - **Queries** (`query.rs`): paged, index-backed reads with lazy expiry.
//! - **Invariants** (`invariants.rs`): read-only audit of derived data.
//! - **Genesis** (`genesis.rs`): validated import, ordered export, digest.
//! - **Capabilities** (`capabilities.rs`): identity registry and account
//!   ledger traits plus in-memory implementations.
//!
//! ## Determinism
//!
//! Handlers never read a wall clock, spawn threads or perform I/O. "Now" is
//! [`BlockContext::time`]. Expiry is computed from stored timestamps at read
//! time, so it never needs a background sweep.
//!
//! ## Crate Policy
//!
//! - Every handler validates fully before charging a fee.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Logging through `tracing`; it never influences state.

pub mod capabilities;
pub mod circuit;
pub mod config;
pub mod context;
pub mod error;
pub mod genesis;
pub mod invariants;
pub mod keeper;
pub mod msgs;
pub mod params;
pub mod proof;
pub mod query;
pub mod request;
pub mod state;

pub use capabilities::{
    BankLedger, IdentityError, IdentityRegistry, IdentityValidator, Ledger, LedgerError,
    OpenIdentities,
};
pub use circuit::{Circuit, InputSpec};
pub use config::{ConfigError, RegistryConfig};
pub use context::{BlockContext, Event, EventKind};
pub use error::{ErrorKind, RegistryError};
pub use genesis::GenesisState;
pub use invariants::{BrokenInvariant, InvariantReport};
pub use keeper::Keeper;
pub use msgs::{
    MsgCreateCircuit, MsgCreateCircuitResponse, MsgCreateProofRequest,
    MsgCreateProofRequestResponse, MsgSubmitProof, MsgSubmitProofResponse, MsgUpdateCircuit,
    MsgUpdateCircuitResponse, MsgVerifyProof, MsgVerifyProofResponse,
};
pub use params::Params;
pub use proof::{ProofStatus, ZkProof};
pub use query::{CircuitStats, Page, PageRequest, ProofFilter, RequestFilter};
pub use request::{ProofRequest, RequestStatus};
pub use state::RegistryState;
