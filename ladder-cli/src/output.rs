//! JSON output helpers shared by the commands

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use ladder_core::{League, Schedule};

/// Print `value` as pretty JSON to stdout
pub fn print_json<T: Serialize>(value: &T, what: &str) -> Result<()> {
    let content = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to encode {}", what))?;
    println!("{}", content);
    Ok(())
}

pub fn save_league(league: &League, path: &Path, what: &str) -> Result<()> {
    league.save(path)?;
    tracing::info!("Saved {} to {}", what, path.display());
    Ok(())
}

pub fn save_schedule(schedule: &Schedule, path: &Path) -> Result<()> {
    schedule.save(path)?;
    tracing::info!("Saved schedule to {}", path.display());
    Ok(())
}
