//! # Genesis Subcommand
//!
//! Validation, digest, invariant audit and statistics over a genesis
//! document on disk.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Subcommand};

use zkr_core::Timestamp;
use zkr_registry::query::MAX_PAGE_LIMIT;
use zkr_registry::{GenesisState, PageRequest, RegistryState};

/// Arguments for the genesis subcommand.
#[derive(Args, Debug)]
pub struct GenesisArgs {
    #[command(subcommand)]
    pub command: GenesisCommand,
}

#[derive(Subcommand, Debug)]
pub enum GenesisCommand {
    /// Check that a genesis document would be accepted on import.
    Validate {
        /// Path to the genesis JSON file.
        file: PathBuf,
    },
    /// Print the canonical digest of a genesis document.
    Digest {
        /// Path to the genesis JSON file.
        file: PathBuf,
    },
    /// Import a genesis document and run every invariant route.
    Invariants {
        /// Path to the genesis JSON file.
        file: PathBuf,
    },
    /// Print per-circuit proof statistics as observed at `--at`.
    Stats {
        /// Path to the genesis JSON file.
        file: PathBuf,
        /// Observation time (RFC 3339, UTC). Decides lazy expiry.
        #[arg(long)]
        at: String,
    },
}

/// Dispatch a genesis subcommand, writing its report to `out`.
pub fn run(args: &GenesisArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    match &args.command {
        GenesisCommand::Validate { file } => validate(file, out),
        GenesisCommand::Digest { file } => digest(file, out),
        GenesisCommand::Invariants { file } => invariants(file, out),
        GenesisCommand::Stats { file, at } => stats(file, at, out),
    }
}

/// Read and parse a genesis document. Does not validate.
pub fn load(path: &Path) -> anyhow::Result<GenesisState> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let genesis = GenesisState::from_json(&json)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    tracing::debug!(path = %path.display(), circuits = genesis.circuits.len(), "genesis loaded");
    Ok(genesis)
}

fn import(path: &Path) -> anyhow::Result<RegistryState> {
    let genesis = load(path)?;
    RegistryState::from_genesis(&genesis)
        .with_context(|| format!("{} rejected on import", path.display()))
}

fn validate(path: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let genesis = load(path)?;
    genesis
        .validate()
        .with_context(|| format!("{} is not a valid genesis document", path.display()))?;
    writeln!(
        out,
        "OK: {} circuits, {} proofs, {} proof requests",
        genesis.circuits.len(),
        genesis.proofs.len(),
        genesis.proof_requests.len()
    )?;
    Ok(())
}

fn digest(path: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let genesis = load(path)?;
    let digest = genesis.digest()?;
    writeln!(out, "{digest}")?;
    Ok(())
}

fn invariants(path: &Path, out: &mut dyn Write) -> anyhow::Result<()> {
    let state = import(path)?;
    let report = state.check_invariants();
    writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    if !report.is_ok() {
        bail!(
            "{} invariant violation(s) across {} route(s)",
            report.broken.len(),
            report.checked.iter().filter(|r| report.is_broken(r)).count()
        );
    }
    tracing::info!(routes = report.checked.len(), "all invariants hold");
    Ok(())
}

fn stats(path: &Path, at: &str, out: &mut dyn Write) -> anyhow::Result<()> {
    let now = Timestamp::parse(at).with_context(|| format!("invalid --at time {at:?}"))?;
    let state = import(path)?;
    let mut offset = 0;
    loop {
        let page = state.list_circuits(None, PageRequest::new(offset, MAX_PAGE_LIMIT));
        for circuit in &page.items {
            let stats = state.circuit_stats(&circuit.id, now)?;
            writeln!(out, "{}", serde_json::to_string(&stats)?)?;
        }
        offset += page.items.len();
        if page.items.is_empty() || offset >= page.total {
            break;
        }
    }
    Ok(())
}
