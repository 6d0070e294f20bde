//! Pair and round commands - schedule every group of a round
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_pair(), run_round() - orchestration
//! - Level 2: report_outcome()
//! - Level 3: print_text_schedule()
//! - Level 4: argument types

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde::Serialize;

use ladder_core::{League, Schedule};
use ladder_pairing::{run_round as pair_full_round, schedule_round, EngineConfig, PairingStrategy, RoundOutcome};

use crate::output::{print_json, save_league, save_schedule};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum StrategyArg {
    /// Cost matrix and ordering search
    Optimizer,
    /// Recursive search with relaxation
    Backtracking,
}

/// Engine settings shared by the pairing commands
#[derive(Args, Clone, Debug)]
pub struct EngineArgs {
    /// Pairing strategy
    #[arg(long, value_enum, default_value = "optimizer")]
    pub strategy: StrategyArg,

    /// Improvement iterations of the ordering search
    #[arg(long, default_value = "10")]
    pub iterations: usize,

    /// Seed for the ordering search
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pair groups one after another
    #[arg(long)]
    pub sequential: bool,

    /// Fail instead of falling back to the optimizer when backtracking finds nothing
    #[arg(long)]
    pub no_fallback: bool,
}

impl EngineArgs {
    pub fn config(&self) -> EngineConfig {
        let strategy = match self.strategy {
            StrategyArg::Optimizer => PairingStrategy::Optimizer,
            StrategyArg::Backtracking => PairingStrategy::Backtracking,
        };
        let mut config = EngineConfig::default()
            .with_strategy(strategy)
            .with_iterations(self.iterations)
            .with_parallel(!self.sequential)
            .with_fallback(!self.no_fallback);
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        config
    }
}

/// Where the results of a round go
#[derive(Args, Clone, Debug)]
pub struct OutcomeArgs {
    /// Write the schedule here
    #[arg(long, value_name = "FILE")]
    pub schedule_out: Option<PathBuf>,

    /// Write the league with updated players here
    #[arg(long, value_name = "FILE")]
    pub league_out: Option<PathBuf>,

    /// Print the pairings as text instead of JSON
    #[arg(long)]
    pub text: bool,
}

#[derive(Args)]
pub struct PairArgs {
    /// Lineup JSON file (output of `ladder lineup`)
    #[arg(long, value_name = "FILE")]
    pub lineup: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub outcome: OutcomeArgs,
}

#[derive(Args)]
pub struct RoundArgs {
    /// League snapshot JSON file
    #[arg(long, value_name = "FILE")]
    pub league: PathBuf,

    /// Move the written league on to the next round
    #[arg(long)]
    pub advance: bool,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub outcome: OutcomeArgs,
}

#[derive(Serialize)]
struct RoundReport<'a> {
    schedule: &'a Schedule,
    league: &'a League,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Pair an existing lineup
pub fn run_pair(args: PairArgs) -> Result<()> {
    let working = League::load(&args.lineup)?;
    let config = args.engine.config();
    tracing::info!("Pairing {} groups with {:?}", working.groups.len(), config.strategy);

    let outcome = schedule_round(&working, &config).context("Failed to pair round")?;
    report_outcome(&outcome, &args.outcome)
}

/// Build the lineup of a snapshot and pair it
pub fn run_round(args: RoundArgs) -> Result<()> {
    let league = League::load(&args.league)?;
    let config = args.engine.config();
    tracing::info!(
        "Running period {} round {} with {:?}",
        league.period,
        league.round,
        config.strategy
    );

    let mut outcome = pair_full_round(&league, &config).context("Failed to run round")?;
    if args.advance {
        outcome.league.advance_round();
    }
    report_outcome(&outcome, &args.outcome)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

pub fn report_outcome(outcome: &RoundOutcome, args: &OutcomeArgs) -> Result<()> {
    if let Some(path) = &args.schedule_out {
        save_schedule(&outcome.schedule, path)?;
    }
    if let Some(path) = &args.league_out {
        save_league(&outcome.league, path, "league")?;
    }

    if args.text {
        print_text_schedule(&outcome.schedule, &outcome.league);
    } else if args.schedule_out.is_none() && args.league_out.is_none() {
        let report = RoundReport {
            schedule: &outcome.schedule,
            league: &outcome.league,
        };
        print_json(&report, "round")?;
    }
    Ok(())
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

fn print_text_schedule(schedule: &Schedule, league: &League) {
    println!("Period {} round {}", schedule.period, schedule.round);
    for matches in &schedule.groups {
        let name = league
            .group(matches.level)
            .map(|g| g.name.as_str())
            .unwrap_or("?");
        println!();
        println!("{} ({} series)", name, matches.series_count);
        for game in matches.all_matches() {
            println!(
                "{:>3}. {:<20} - {:<20} {}",
                game.id,
                game.white.name,
                game.black.name,
                game.result.score_text()
            );
        }
    }
}
