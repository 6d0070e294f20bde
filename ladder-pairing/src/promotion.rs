//! Promotion - moving leaders of a group up one tier for a round
//!
//! Level 2 - Phases
//!
//! Promotion works on the attendance copy of the league. Promoted players
//! keep their home level, which is how later steps recognise them as
//! displaced.

use ladder_core::{Group, League, Player};

use crate::config::PromotionPolicy;

// ============================================================================
// Level 2 - Phases
// ============================================================================

/// Build the working league of a round: present players only, promotion
/// applied, every group renumbered
pub fn build_lineup(league: &League, policy: &PromotionPolicy) -> League {
    let mut working = league.attendance_copy();
    promote(&mut working, league, policy);
    working.renumber_all();
    tracing::info!(
        "lineup for period {} round {}: {} players in {} groups",
        working.period,
        working.round,
        working.player_count(),
        working.groups.len()
    );
    working
}

/// Rebuild the lineup of one group after a manual correction
///
/// The group is taken fresh from `attendance`. Members that `working`
/// already shows promoted into the group above stay out, and the players
/// promoted into this group in `working` are appended again. Returns `None`
/// when either snapshot lacks the group.
pub fn recompute_group_lineup(attendance: &League, working: &League, level: u32) -> Option<League> {
    let fresh = attendance.group(level)?.present_copy();
    let previous = working.group(level)?;

    let promoted_out: Vec<&Player> = working
        .group_above(level)
        .map(|above| {
            above
                .players
                .iter()
                .filter(|p| p.level == level && p.is_displaced_in(above.level))
                .collect()
        })
        .unwrap_or_default();

    let mut players: Vec<Player> = fresh
        .players
        .into_iter()
        .filter(|p| !promoted_out.iter().any(|q| q.same_member(p)))
        .collect();
    players.extend(previous.displaced_players().into_iter().cloned());

    let mut group = Group {
        level,
        name: previous.name.clone(),
        players,
    };
    group.renumber();
    tracing::debug!("recomputed lineup {}", group.summary());

    let mut result = working.clone();
    result.replace_group(group).ok()?;
    Some(result)
}

// ============================================================================
// Level 3 - Steps
// ============================================================================

/// Whether players move up in `round`
pub fn promotion_active(round: u32, policy: &PromotionPolicy) -> bool {
    round >= policy.start_round
}

/// How many candidates of each group are considered in `round`
pub fn promotion_count(round: u32, policy: &PromotionPolicy) -> u32 {
    if !promotion_active(round, policy) {
        0
    } else if round < policy.last_round {
        policy.window_count
    } else {
        policy.final_count
    }
}

/// Move candidates from every group into the group above
///
/// Boundaries are handled from the top down, so a player moves at most one
/// tier. `standings` is the full snapshot and decides whether a single
/// candidate can still be overtaken. Ids are left as found; the caller
/// renumbers.
pub fn promote(working: &mut League, standings: &League, policy: &PromotionPolicy) {
    let count = promotion_count(working.round, policy);
    if count == 0 {
        return;
    }

    for i in 0..working.groups.len().saturating_sub(1) {
        let (upper, lower) = working.groups.split_at_mut(i + 1);
        let dest = &mut upper[i];
        let src = &mut lower[0];
        let full_src = standings.group(src.level);

        for candidate in 1..=count {
            let Some(player) = src.player_by_id(candidate) else {
                continue;
            };

            let moves_up = if count == 1 {
                match full_src.and_then(|g| g.player_by_id(candidate + 1)) {
                    Some(next) => player.points - next.points > policy.final_margin,
                    None => true,
                }
            } else if candidate == count {
                dest.len() % 2 == 1
            } else {
                true
            };

            if !moves_up {
                tracing::debug!(
                    "{} stays in {} (candidate {} of {})",
                    player.initials,
                    src.name,
                    candidate,
                    count
                );
                continue;
            }

            if let Some(player) = src.take_player(candidate) {
                tracing::debug!("promote {} from {} to {}", player.initials, src.name, dest.name);
                dest.players.push(player);
            }
        }
    }
}
