//! Backtracking solver - direct search for a valid series
//!
//! Level 3 - Steps
//!
//! Pairs the first unscheduled position with the first acceptable partner
//! below it and recurses; a dead end undoes the pair and tries the next
//! partner. Promoted players can be taken first, in the same recursion.
//! Constraints are relaxed step by step when no series exists:
//! the minimum rank difference drops to zero first, then more of the
//! opponent history is ignored.

use ladder_core::{LadderError, Player, Result};
use rustc_hash::FxHashSet;

use crate::builder::Pairing;
use crate::config::EngineConfig;

/// Minimum rank difference between partners for a series
///
/// The opening round spreads the field; later rounds pair neighbours.
pub fn minimum_difference(group_len: usize, is_top: bool, period: u32, round: u32, series: u32) -> usize {
    let opening = period == 1 && round == 1;
    if is_top {
        if opening && series == 1 {
            group_len / 2
        } else {
            1
        }
    } else if round > 1 {
        series as usize
    } else {
        match series {
            1 => group_len / 2,
            2 => 1,
            _ => 2,
        }
    }
}

/// Pick three positions that will play a round robin
///
/// Searches windows of three neighbours outward from the middle of the
/// ranking, alternating down and up. When no window is free of recent
/// meetings, more history is ignored and the search restarts from the
/// middle.
pub fn select_trio(entries: &[Player], max_ignore: usize) -> Option<[usize; 3]> {
    let n = entries.len();
    if n < 3 || n % 2 == 0 {
        return None;
    }
    if n == 3 {
        return Some([0, 1, 2]);
    }

    let middle = n / 2;
    for ignore in 0..=max_ignore {
        for delta in 0..n {
            let below = middle.checked_sub(delta);
            let above = (delta > 0).then_some(middle + delta);
            for centre in [below, above].into_iter().flatten() {
                if centre == 0 || centre + 1 >= n {
                    continue;
                }
                let trio = [centre - 1, centre, centre + 1];
                if trio_is_fresh(entries, trio, ignore) {
                    return Some(trio);
                }
            }
        }
        tracing::debug!("no fresh trio with ignore window {}", ignore);
    }
    None
}

fn trio_is_fresh(entries: &[Player], [a, b, c]: [usize; 3], ignore: usize) -> bool {
    [(a, b), (b, c), (a, c)]
        .iter()
        .all(|&(x, y)| !met_recently(&entries[x], &entries[y], ignore))
}

fn met_recently(a: &Player, b: &Player, ignore: usize) -> bool {
    a.played_within(b, ignore) || b.played_within(a, ignore)
}

/// Search a complete pairing, relaxing constraints until one is found
///
/// `displaced_first` pairs promoted players before everybody else, lowest
/// ranked first, each trying partners from another home level from the
/// bottom of the ranking up.
pub fn backtrack_pairing(
    entries: &[Player],
    level: u32,
    min_difference: usize,
    displaced_first: bool,
    config: &EngineConfig,
) -> Result<Pairing> {
    let n = entries.len();
    if n == 1 {
        return Err(LadderError::NoValidPairing {
            level,
            reason: "a single player cannot be paired".to_string(),
        });
    }

    let trio = if n % 2 == 1 {
        let trio = select_trio(entries, config.max_ignore_window).ok_or_else(|| {
            LadderError::NoValidPairing {
                level,
                reason: "no trio available".to_string(),
            }
        })?;
        Some(trio)
    } else {
        None
    };

    // displaced players that cannot all be placed first join the plain search
    let passes = if displaced_first { vec![Some(level), None] } else { vec![None] };
    for displaced_level in passes {
        for ignore in 0..=config.max_ignore_window {
            for min_difference in (0..=min_difference).rev() {
                let mut search = Search::new(
                    entries,
                    displaced_level,
                    ignore,
                    min_difference,
                    config.max_backtrack_steps,
                );
                if let Some(trio) = trio {
                    for position in trio {
                        search.scheduled[position] = true;
                    }
                }
                if search.pair_rest() {
                    tracing::debug!(
                        "group {}: series found with ignore {} and difference {} in {} steps",
                        level,
                        ignore,
                        min_difference,
                        search.steps
                    );
                    return Ok(Pairing {
                        pairs: search.pairs,
                        trio,
                    });
                }
                if search.exhausted {
                    tracing::warn!(
                        "group {}: step budget spent with ignore {} and difference {}",
                        level,
                        ignore,
                        min_difference
                    );
                }
            }
        }
    }

    Err(LadderError::NoValidPairing {
        level,
        reason: format!(
            "no series within an ignore window of {}",
            config.max_ignore_window
        ),
    })
}

/// State of one backtracking attempt
struct Search<'a> {
    entries: &'a [Player],
    /// Group level whose promoted players are paired before the rest
    displaced_level: Option<u32>,
    scheduled: Vec<bool>,
    pairs: Vec<(usize, usize)>,
    /// Member pairs already in the plan, by id
    used: FxHashSet<(u32, u32)>,
    ignore: usize,
    min_difference: usize,
    steps: usize,
    max_steps: usize,
    exhausted: bool,
}

impl<'a> Search<'a> {
    fn new(
        entries: &'a [Player],
        displaced_level: Option<u32>,
        ignore: usize,
        min_difference: usize,
        max_steps: usize,
    ) -> Self {
        Self {
            entries,
            displaced_level,
            scheduled: vec![false; entries.len()],
            pairs: Vec::new(),
            used: FxHashSet::default(),
            ignore,
            min_difference,
            steps: 0,
            max_steps,
            exhausted: false,
        }
    }

    fn key(&self, i: usize, j: usize) -> (u32, u32) {
        let (a, b) = (self.entries[i].id, self.entries[j].id);
        (a.min(b), a.max(b))
    }

    fn compatible(&self, i: usize, j: usize) -> bool {
        let (a, b) = (&self.entries[i], &self.entries[j]);
        a.id != b.id && !met_recently(a, b, self.ignore) && !self.used.contains(&self.key(i, j))
    }

    fn schedule(&mut self, i: usize, j: usize) {
        self.scheduled[i] = true;
        self.scheduled[j] = true;
        self.used.insert(self.key(i, j));
        self.pairs.push((i, j));
    }

    fn unschedule(&mut self, i: usize, j: usize) {
        self.scheduled[i] = false;
        self.scheduled[j] = false;
        self.used.remove(&self.key(i, j));
        self.pairs.pop();
    }

    /// Lowest ranked promoted player still waiting for a partner
    fn next_displaced(&self) -> Option<usize> {
        let level = self.displaced_level?;
        (0..self.entries.len())
            .rev()
            .find(|&i| !self.scheduled[i] && self.entries[i].is_displaced_in(level))
    }

    /// Try partners for a promoted player from the bottom of the ranking up
    fn pair_displaced(&mut self, i: usize) -> bool {
        for j in (0..self.entries.len()).rev() {
            if j == i
                || self.scheduled[j]
                || self.entries[j].level == self.entries[i].level
                || !self.compatible(i, j)
            {
                continue;
            }
            self.schedule(i, j);
            if self.pair_rest() {
                return true;
            }
            self.unschedule(i, j);
            if self.exhausted {
                return false;
            }
        }
        false
    }

    /// Pair every remaining position; false on a dead end or a spent budget
    fn pair_rest(&mut self) -> bool {
        self.steps += 1;
        if self.steps > self.max_steps {
            self.exhausted = true;
            return false;
        }
        if let Some(i) = self.next_displaced() {
            return self.pair_displaced(i);
        }
        let Some(i) = self.scheduled.iter().position(|s| !s) else {
            return true;
        };

        for j in (i + 1)..self.entries.len() {
            if self.scheduled[j] || j - i < self.min_difference || !self.compatible(i, j) {
                continue;
            }
            self.schedule(i, j);
            if self.pair_rest() {
                return true;
            }
            self.unschedule(i, j);
            if self.exhausted {
                return false;
            }
        }
        false
    }
}
