//! Player records and opponent history

use serde::{Deserialize, Serialize};

/// Number of previous opponents remembered per player
pub const HISTORY_LEN: usize = 4;

/// Colour preference shift applied per game (white lowers it, black raises it)
pub const COLOR_STEP: f64 = 1.1;

/// A club member as seen by the pairing engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Rank within the group, dense from 1 after renumbering
    pub id: u32,
    pub name: String,
    pub initials: String,
    #[serde(default)]
    pub rating: u32,
    /// Positive values mean the player is due white
    #[serde(default)]
    pub color_preference: f64,
    #[serde(default = "default_present")]
    pub present: bool,
    /// Home group level; differs from the group's level when promoted
    pub level: u32,
    #[serde(default)]
    pub points: i32,
    /// Initials of previous opponents, most recent last
    #[serde(default)]
    pub history: Vec<String>,
}

fn default_present() -> bool {
    true
}

impl Player {
    pub fn new(id: u32, name: &str, initials: &str, level: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            initials: initials.to_string(),
            rating: 0,
            color_preference: 0.0,
            present: true,
            level,
            points: 0,
            history: Vec::new(),
        }
    }

    pub fn with_rating(mut self, rating: u32) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_points(mut self, points: i32) -> Self {
        self.points = points;
        self
    }

    pub fn with_color_preference(mut self, preference: f64) -> Self {
        self.color_preference = preference;
        self
    }

    /// Set opponent history (oldest first); only the last `HISTORY_LEN` entries are kept
    pub fn with_history(mut self, opponents: &[&str]) -> Self {
        self.history = opponents.iter().map(|s| s.to_string()).collect();
        self.trim_history();
        self
    }

    pub fn absent(mut self) -> Self {
        self.present = false;
        self
    }

    /// True when this player plays above their home group
    pub fn is_displaced_in(&self, group_level: u32) -> bool {
        self.level != group_level
    }

    /// Same club member, regardless of round-local id
    pub fn same_member(&self, other: &Player) -> bool {
        self.name == other.name && self.initials == other.initials && self.level == other.level
    }

    /// Round distance of every history slot that holds `other`, 0 elsewhere
    ///
    /// Slots are reported oldest first; the most recent opponent has distance 1.
    pub fn opponent_distances(&self, other: &Player) -> [u32; HISTORY_LEN] {
        let mut distances = [0; HISTORY_LEN];
        let len = self.history.len();
        for (slot, opponent) in self.history.iter().enumerate().take(HISTORY_LEN) {
            if *opponent == other.initials {
                distances[slot] = (len - slot) as u32;
            }
        }
        distances
    }

    /// Whether `other` is among the most recent `HISTORY_LEN - ignore` opponents
    pub fn played_within(&self, other: &Player, ignore: usize) -> bool {
        let window = HISTORY_LEN.saturating_sub(ignore);
        self.history
            .iter()
            .rev()
            .take(window)
            .any(|opponent| *opponent == other.initials)
    }

    /// Record a game against `opponent_initials`
    pub fn record_game(&mut self, opponent_initials: &str, as_white: bool) {
        self.history.push(opponent_initials.to_string());
        self.trim_history();
        if as_white {
            self.color_preference -= COLOR_STEP;
        } else {
            self.color_preference += COLOR_STEP;
        }
    }

    fn trim_history(&mut self) {
        if self.history.len() > HISTORY_LEN {
            let excess = self.history.len() - HISTORY_LEN;
            self.history.drain(..excess);
        }
    }
}
