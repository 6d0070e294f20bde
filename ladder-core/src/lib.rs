//! Ladder Core - Roster model for a tiered club competition
//!
//! This crate provides the records the pairing engine works on:
//! - Players with rating, points, colour preference and opponent history
//! - Groups (tiers) and the league snapshot for a round
//! - Matches, series and the per-group match collections of a round
//! - The error taxonomy shared by the engine and its callers

pub mod error;
pub mod group;
pub mod league;
pub mod player;
pub mod schedule;

// Re-exports for convenient access
pub use error::{LadderError, Result};
pub use group::Group;
pub use league::{League, PERIODS_PER_SEASON, ROUNDS_PER_PERIOD};
pub use player::{Player, COLOR_STEP, HISTORY_LEN};
pub use schedule::{GroupMatches, Match, MatchResult, Schedule, Series};
