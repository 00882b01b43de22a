//! # zkr-cli: Registry Operator CLI
//!
//! Offline tooling over registry genesis documents and deployment
//! configuration. Nothing here mutates registry state; every subcommand
//! reads a file, runs the registry's own validation or query code, and
//! prints the result.
//!
//! ## Subcommands
//!
//! - `genesis validate`: full import validation of a genesis document
//! - `genesis digest`: canonical SHA-256 digest of a genesis document
//! - `genesis invariants`: import, then run every invariant route
//! - `genesis stats`: per-circuit proof statistics at a given time
//! - `params`: effective parameters from a configuration file
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handlers delegate to `zkr-registry`; no registry rules live here.
//! - Handlers write to a caller-supplied sink so they can be tested.

pub mod genesis;
pub mod params;
