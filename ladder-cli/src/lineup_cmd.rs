//! Lineup command - attendance filter and promotion for a round

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use ladder_core::League;
use ladder_pairing::{build_lineup, promotion_count, PromotionPolicy};

use crate::output::{print_json, save_league};

#[derive(Args)]
pub struct LineupArgs {
    /// League snapshot JSON file
    #[arg(long, value_name = "FILE")]
    pub league: PathBuf,

    /// Where to write the lineup (stdout when omitted)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: LineupArgs) -> Result<()> {
    let league = League::load(&args.league)?;
    let policy = PromotionPolicy::default();

    tracing::info!(
        "Building lineup for period {} round {} ({} candidates per group)",
        league.period,
        league.round,
        promotion_count(league.round, &policy)
    );

    let working = build_lineup(&league, &policy);
    for group in &working.groups {
        tracing::debug!("{}", group.summary());
    }

    match &args.output {
        Some(path) => save_league(&working, path, "lineup"),
        None => print_json(&working, "lineup"),
    }
}
