//! Ladder Pairing - Lineups and pairings for a tiered club competition
//!
//! This crate turns a league snapshot into the matches of a round:
//! - Promotion of group leaders into the group above
//! - A weighted cost model over every possible pairing
//! - An ordering search over the cost matrix, with a trio for odd groups
//! - A backtracking solver as the alternative strategy
//! - Match building and opponent history updates
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_round (orchestration)
//! - Level 2: build_lineup, schedule_round, schedule_group (phases)
//! - Level 3: build_cost_matrix, minimize_triagonal, backtrack_pairing,
//!   build_group_matches (steps)
//! - Level 4: utilities, configuration

mod backtrack;
mod builder;
mod config;
mod cost;
mod engine;
mod optimizer;
mod promotion;

pub use backtrack::{backtrack_pairing, minimum_difference, select_trio};
pub use builder::{build_group_matches, update_players, Pairing};
pub use config::{CostWeights, EngineConfig, PairingStrategy, PromotionPolicy};
pub use cost::{
    build_cost_matrix, color_matrix, forbid_pairs, promotion_matrix, recency_matrix,
    seed_gap_matrix, ColorBucket, CostMatrix,
};
pub use engine::{
    recompute_group_schedule, run_round, schedule_group, schedule_round, series_count,
    RoundOutcome,
};
pub use optimizer::{band_cost, minimize_triagonal, trio_location, Triagonal};
pub use promotion::{
    build_lineup, promote, promotion_active, promotion_count, recompute_group_lineup,
};
