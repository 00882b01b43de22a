//! # zkr CLI Entry Point
//!
//! Assembles subcommands and dispatches to handler modules.

use clap::Parser;

/// ZK proof registry operator toolchain.
///
/// Validates and audits genesis documents and inspects deployment
/// parameters.
#[derive(Parser, Debug)]
#[command(name = "zkr", version, about)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Genesis document validation, digest and audit.
    Genesis(zkr_cli::genesis::GenesisArgs),
    /// Print effective parameters from a configuration file.
    Params(zkr_cli::params::ParamsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::from_default_env();
    if cli.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let mut stdout = std::io::stdout().lock();
    match &cli.command {
        Commands::Genesis(args) => zkr_cli::genesis::run(args, &mut stdout),
        Commands::Params(args) => zkr_cli::params::run(args, &mut stdout),
    }
}
