//! Matrix command - inspect the pairing costs of a group

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use ladder_core::{LadderError, League};
use ladder_pairing::{build_cost_matrix, minimize_triagonal, CostWeights};

#[derive(Args)]
pub struct MatrixArgs {
    /// Lineup JSON file
    #[arg(long, value_name = "FILE")]
    pub lineup: PathBuf,

    /// Group level
    #[arg(long)]
    pub level: u32,

    /// Series the costs are computed for (1 or 2)
    #[arg(long, default_value = "1")]
    pub series: u32,

    /// Also print the best order found and its permuted matrix
    #[arg(long)]
    pub optimize: bool,

    /// Improvement iterations of the ordering search
    #[arg(long, default_value = "10")]
    pub iterations: usize,

    /// Seed for the ordering search
    #[arg(long, default_value = "0")]
    pub seed: u64,
}

pub fn run(args: MatrixArgs) -> Result<()> {
    let league = League::load(&args.lineup)?;
    let group = league
        .group(args.level)
        .ok_or(LadderError::EmptyOrMissingGroup { level: args.level })?;

    let matrix = build_cost_matrix(&group.players, group.level, args.series, &CostWeights::default())
        .with_context(|| format!("Failed to build cost matrix for {}", group.name))?;

    println!("{}", group.summary());
    print!("{}", matrix);

    if args.optimize {
        let result = minimize_triagonal(&matrix, args.iterations, args.seed);
        println!();
        println!("order {:?}, band cost {}, trio {:?}", result.order, result.cost, result.trio);
        print!("{}", result.matrix);
    }
    Ok(())
}
