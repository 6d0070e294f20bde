//! Recompute command - pair one group again after a manual correction

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ladder_core::{LadderError, League, Schedule};
use ladder_pairing::{recompute_group_lineup, recompute_group_schedule};

use crate::output::save_league;
use crate::pair_cmd::{report_outcome, EngineArgs, OutcomeArgs};

#[derive(Args)]
pub struct RecomputeArgs {
    /// Lineup the schedule was made from
    #[arg(long, value_name = "FILE")]
    pub lineup: PathBuf,

    /// Schedule of the round
    #[arg(long, value_name = "FILE")]
    pub schedule: PathBuf,

    /// Level of the group to pair again
    #[arg(long)]
    pub level: u32,

    /// Corrected league snapshot; rebuilds the group's lineup first
    #[arg(long, value_name = "FILE")]
    pub attendance: Option<PathBuf>,

    /// Write the corrected lineup here
    #[arg(long, value_name = "FILE")]
    pub lineup_out: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[command(flatten)]
    pub outcome: OutcomeArgs,
}

pub fn run(args: RecomputeArgs) -> Result<()> {
    let mut working = League::load(&args.lineup)?;
    let schedule = Schedule::load(&args.schedule)?;
    let missing = LadderError::EmptyOrMissingGroup { level: args.level };

    if let Some(path) = &args.attendance {
        let attendance = League::load(path)?.attendance_copy();
        working = recompute_group_lineup(&attendance, &working, args.level)
            .ok_or_else(|| missing.clone())
            .context("Failed to rebuild lineup")?;
        if let Some(out) = &args.lineup_out {
            save_league(&working, out, "lineup")?;
        }
    }

    tracing::info!("Recomputing group {}", args.level);
    let outcome = recompute_group_schedule(&schedule, &working, args.level, &args.engine.config())
        .context("Failed to pair group")?
        .ok_or(missing)?;

    report_outcome(&outcome, &args.outcome)
}
