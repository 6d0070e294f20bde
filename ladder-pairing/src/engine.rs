//! Round engine - lineup, pairing and history for every group
//!
//! Level 1 - Orchestration and Level 2 - Phases

use ladder_core::{Group, GroupMatches, LadderError, League, Player, Result, Schedule};
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::backtrack::{backtrack_pairing, minimum_difference};
use crate::builder::{build_group_matches, update_players, Pairing};
use crate::config::{EngineConfig, PairingStrategy};
use crate::cost::{build_cost_matrix, forbid_pairs};
use crate::optimizer::minimize_triagonal;
use crate::promotion::build_lineup;

/// Size of a group that plays its two series as one doubled series
const DOUBLED_GROUP_SIZE: usize = 5;

/// Optimizer reruns spent on removing repeated meetings from a doubled group
const MAX_REPAIR_ATTEMPTS: usize = 10;

/// Matches of a round plus the league with updated players
#[derive(Clone, Debug, PartialEq)]
pub struct RoundOutcome {
    pub schedule: Schedule,
    pub league: League,
}

impl RoundOutcome {
    pub fn group_matches(&self, level: u32) -> Option<&GroupMatches> {
        self.schedule.group(level)
    }
}

// ============================================================================
// Level 1 - Orchestration
// ============================================================================

/// Lineup and pairings for the round `league` is at
pub fn run_round(league: &League, config: &EngineConfig) -> Result<RoundOutcome> {
    let working = build_lineup(league, &config.promotion);
    schedule_round(&working, config)
}

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Pair every group of a working lineup
///
/// Groups are independent, so they are paired in parallel when configured;
/// the outcome does not depend on it.
pub fn schedule_round(working: &League, config: &EngineConfig) -> Result<RoundOutcome> {
    let levels: Vec<u32> = working.groups.iter().map(|g| g.level).collect();

    let results: Vec<Result<(GroupMatches, Group)>> = if config.parallel {
        levels
            .par_iter()
            .map(|&level| schedule_group(working, level, config))
            .collect()
    } else {
        levels
            .iter()
            .map(|&level| schedule_group(working, level, config))
            .collect()
    };

    let mut schedule = Schedule::new(working.period, working.round);
    let mut league = working.clone();
    for result in results {
        let (matches, group) = result?;
        schedule.groups.push(matches);
        league.replace_group(group)?;
    }

    tracing::info!(
        "period {} round {}: {} matches in {} groups",
        schedule.period,
        schedule.round,
        schedule.match_count(),
        schedule.groups.len()
    );
    Ok(RoundOutcome { schedule, league })
}

/// Pair one group again and leave every other group as it was
///
/// `working` is the lineup the schedule was made from. Returns `None` when
/// the lineup has no group at `level`.
pub fn recompute_group_schedule(
    schedule: &Schedule,
    working: &League,
    level: u32,
    config: &EngineConfig,
) -> Result<Option<RoundOutcome>> {
    if working.group(level).is_none() {
        tracing::warn!("{}", LadderError::EmptyOrMissingGroup { level });
        return Ok(None);
    }

    let (matches, group) = schedule_group(working, level, config)?;

    let mut schedule = schedule.clone();
    match schedule.groups.iter_mut().find(|g| g.level == level) {
        Some(slot) => *slot = matches,
        None => {
            schedule.groups.push(matches);
            schedule.groups.sort_by_key(|g| g.level);
        }
    }

    let mut league = working.clone();
    league.replace_group(group)?;
    Ok(Some(RoundOutcome { schedule, league }))
}

/// Pair a single group and record the games in a copy of its players
pub fn schedule_group(working: &League, level: u32, config: &EngineConfig) -> Result<(GroupMatches, Group)> {
    let group = working
        .group(level)
        .ok_or(LadderError::EmptyOrMissingGroup { level })?;
    let is_top = working.is_top_level(level);

    let mut roster = group.clone();
    if is_top && (2..=6).contains(&working.round) {
        roster.sort_by_rating();
        roster.renumber();
    }

    let series = series_count(is_top, working.period, working.round);
    let doubled = roster.len() == DOUBLED_GROUP_SIZE && series == 2;
    let entries: Vec<Player> = if doubled {
        roster.players.iter().chain(roster.players.iter()).cloned().collect()
    } else {
        roster.players.clone()
    };
    tracing::debug!("pairing {} ({} entries)", roster.summary(), entries.len());

    let pairing = match config.strategy {
        PairingStrategy::Optimizer => optimizer_pairing(&entries, level, doubled, config)?,
        PairingStrategy::Backtracking => {
            let min_difference =
                minimum_difference(entries.len(), is_top, working.period, working.round, 1);
            match backtrack_pairing(&entries, level, min_difference, working.round == 1, config) {
                Ok(pairing) => pairing,
                Err(err) if config.fallback => {
                    tracing::warn!("{}; falling back to the optimizer", err);
                    optimizer_pairing(&entries, level, doubled, config)?
                }
                Err(err) => return Err(err),
            }
        }
    };

    if !pairing.is_complete(entries.len()) {
        return Err(LadderError::NoValidPairing {
            level,
            reason: format!("{} entries left incompletely paired", entries.len()),
        });
    }

    let matches = build_group_matches(&entries, &pairing, level, series);
    update_players(&mut roster, &matches);
    Ok((matches, roster))
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Number of series a group plays in a round
pub fn series_count(is_top: bool, period: u32, round: u32) -> u32 {
    let opening = period == 1 && round == 1;
    match (is_top, opening) {
        (true, true) => 2,
        (true, false) => 1,
        (false, true) => 3,
        (false, false) => 2,
    }
}

/// Cost matrix and ordering search for one set of entries
///
/// A doubled group forbids every entry its own copy. When the chosen order
/// still pairs a member with itself or lets two members meet twice, that
/// meeting is forbidden in every copy combination and the search runs again
/// with the next seed. Repairs that keep failing hand the entries to the
/// backtracking solver, which never schedules either.
fn optimizer_pairing(entries: &[Player], level: u32, doubled: bool, config: &EngineConfig) -> Result<Pairing> {
    let mut matrix = build_cost_matrix(entries, level, 1, &config.weights)?;
    if doubled {
        let copies: Vec<(usize, usize)> = (0..DOUBLED_GROUP_SIZE)
            .map(|i| (i, i + DOUBLED_GROUP_SIZE))
            .collect();
        forbid_pairs(&mut matrix, &copies, config.weights.forbidden);
    }
    tracing::debug!("group {} cost matrix\n{}", level, matrix);

    for attempt in 0..MAX_REPAIR_ATTEMPTS {
        let seed = config.seed.wrapping_add(attempt as u64);
        let result = minimize_triagonal(&matrix, config.iterations, seed);
        tracing::debug!(
            "group {} order {:?} band cost {} trio {:?}",
            level,
            result.order,
            result.cost,
            result.trio
        );
        let pairing = result.pairing();

        let Some((a, b)) = invalid_meeting(entries, &pairing) else {
            return Ok(pairing);
        };
        tracing::debug!("group {}: players {} and {} scheduled wrongly, repairing", level, a, b);

        let first = positions_of(entries, a);
        let second = positions_of(entries, b);
        let combinations: Vec<(usize, usize)> = first
            .iter()
            .flat_map(|&i| second.iter().map(move |&j| (i, j)))
            .filter(|&(i, j)| i != j)
            .collect();
        forbid_pairs(&mut matrix, &combinations, config.weights.forbidden);
    }

    tracing::warn!(
        "group {}: no clean order after {} repairs, using the backtracking solver",
        level,
        MAX_REPAIR_ATTEMPTS
    );
    backtrack_pairing(entries, level, 1, false, config)
}

/// First member met by itself, or pair of members scheduled more than once
fn invalid_meeting(entries: &[Player], pairing: &Pairing) -> Option<(u32, u32)> {
    let mut seen = FxHashSet::default();
    pairing.pairs.iter().find_map(|&(i, j)| {
        let (a, b) = (entries[i].id, entries[j].id);
        let key = (a.min(b), a.max(b));
        (a == b || !seen.insert(key)).then_some(key)
    })
}

fn positions_of(entries: &[Player], id: u32) -> Vec<usize> {
    entries
        .iter()
        .enumerate()
        .filter(|(_, p)| p.id == id)
        .map(|(i, _)| i)
        .collect()
}
