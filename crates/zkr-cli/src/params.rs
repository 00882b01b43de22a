//! # Params Subcommand
//!
//! Loads a deployment configuration and prints the effective parameter
//! record, defaults filled in.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use zkr_registry::RegistryConfig;

/// Arguments for the params subcommand.
#[derive(Args, Debug)]
pub struct ParamsArgs {
    /// Configuration file (YAML or JSON).
    #[arg(long)]
    pub config: PathBuf,
}

pub fn run(args: &ParamsArgs, out: &mut dyn Write) -> anyhow::Result<()> {
    let config = RegistryConfig::load(&args.config)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
    Ok(())
}
