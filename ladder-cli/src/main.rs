//! Ladder CLI - Command-line interface
//!
//! Commands:
//! - lineup: Apply attendance and promotion to a league snapshot
//! - pair: Pair every group of a lineup
//! - round: Lineup and pairing in one step
//! - recompute: Pair one group again after a correction
//! - matrix: Print the cost matrix of a group

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod lineup_cmd;
mod matrix_cmd;
mod output;
mod pair_cmd;
mod recompute_cmd;

#[derive(Parser)]
#[command(name = "ladder")]
#[command(about = "Lineups and pairings for a tiered club competition")]
struct Cli {
    /// Log at debug level
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply attendance and promotion
    Lineup(lineup_cmd::LineupArgs),
    /// Pair every group of a lineup
    Pair(pair_cmd::PairArgs),
    /// Build the lineup and pair it
    Round(pair_cmd::RoundArgs),
    /// Pair one group again
    Recompute(recompute_cmd::RecomputeArgs),
    /// Print the cost matrix of a group
    Matrix(matrix_cmd::MatrixArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Lineup(args) => lineup_cmd::run(args),
        Commands::Pair(args) => pair_cmd::run_pair(args),
        Commands::Round(args) => pair_cmd::run_round(args),
        Commands::Recompute(args) => recompute_cmd::run(args),
        Commands::Matrix(args) => matrix_cmd::run(args),
    }
}

/// Logs go to stderr; stdout carries the JSON results
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
