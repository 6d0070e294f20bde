//! Match and history builder
//!
//! Level 3 - Steps
//!
//! Turns a pairing of entry positions into numbered matches and folds the
//! games back into the players' opponent history and colour preference.

use ladder_core::{Group, GroupMatches, LadderError, Match, Player, Series};
use rustc_hash::FxHashMap;

/// Pairs and optional trio, as positions into the group's entries
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Pairing {
    pub pairs: Vec<(usize, usize)>,
    pub trio: Option<[usize; 3]>,
}

impl Pairing {
    /// Every scheduled position, pairs first
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.pairs
            .iter()
            .flat_map(|&(a, b)| [a, b])
            .chain(self.trio.iter().flatten().copied())
    }

    /// True when each of the `n` positions is scheduled exactly once
    pub fn is_complete(&self, n: usize) -> bool {
        let mut seen = vec![false; n];
        for position in self.positions() {
            match seen.get_mut(position) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        seen.into_iter().all(|s| s)
    }

    pub fn match_count(&self) -> usize {
        self.pairs.len() + if self.trio.is_some() { 3 } else { 0 }
    }
}

/// Build the numbered series and trio matches of a group
///
/// Ordinary matches are numbered from 1 in pairing order; the trio round
/// robin continues the same counter.
pub fn build_group_matches(
    entries: &[Player],
    pairing: &Pairing,
    level: u32,
    series_count: u32,
) -> GroupMatches {
    let mut series = Series::new();
    for &(a, b) in &pairing.pairs {
        series.push(Match::new(0, entries[a].clone(), entries[b].clone()));
    }
    let mut next = series.renumber(1);

    let mut trio = Vec::new();
    if let Some([a, b, c]) = pairing.trio {
        for (x, y) in [(a, b), (b, c), (a, c)] {
            trio.push(Match::new(next, entries[x].clone(), entries[y].clone()));
            next += 1;
        }
    }

    for game in series.matches.iter().chain(trio.iter()) {
        tracing::debug!(
            "group {} match {}: {} - {}",
            level,
            game.id,
            game.white.initials,
            game.black.initials
        );
    }

    GroupMatches {
        level,
        series_count,
        series: vec![series],
        trio,
    }
}

/// Record every game of `matches` in the group's players
///
/// White loses one colour step, black gains one, and both remember the
/// opponent's initials. A match naming a player outside the roster is
/// reported and skipped.
pub fn update_players(group: &mut Group, matches: &GroupMatches) {
    let index: FxHashMap<u32, usize> = group
        .players
        .iter()
        .enumerate()
        .map(|(i, p)| (p.id, i))
        .collect();

    for game in matches.all_matches() {
        for (player, opponent, as_white) in [
            (&game.white, &game.black, true),
            (&game.black, &game.white, false),
        ] {
            match index.get(&player.id) {
                Some(&i) => group.players[i].record_game(&opponent.initials, as_white),
                None => {
                    let err = LadderError::InconsistentPlayerReference {
                        level: group.level,
                        player_id: player.id,
                    };
                    tracing::warn!("match {}: {}", game.id, err);
                }
            }
        }
    }
}
