//! Matches, series and the per-group match lists of a round

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{LadderError, Result};
use crate::player::Player;

/// Outcome of a match
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchResult {
    #[default]
    Unknown,
    WhiteWins,
    BlackWins,
    Draw,
}

impl MatchResult {
    /// Toto style code: 0 unknown, 1 white wins, 2 black wins, 3 draw
    pub fn code(self) -> u8 {
        match self {
            MatchResult::Unknown => 0,
            MatchResult::WhiteWins => 1,
            MatchResult::BlackWins => 2,
            MatchResult::Draw => 3,
        }
    }

    pub fn from_code(code: u8) -> Self {
        match code {
            1 => MatchResult::WhiteWins,
            2 => MatchResult::BlackWins,
            3 => MatchResult::Draw,
            _ => MatchResult::Unknown,
        }
    }

    /// Quick entry by white's score: 0 = 0-1, 1 = 1-0, 2 = draw
    pub fn from_quick_entry(value: u8) -> Self {
        match value {
            0 => MatchResult::BlackWins,
            1 => MatchResult::WhiteWins,
            2 => MatchResult::Draw,
            _ => MatchResult::Unknown,
        }
    }

    pub fn score_text(self) -> &'static str {
        match self {
            MatchResult::Unknown => "0-0",
            MatchResult::WhiteWins => "1-0",
            MatchResult::BlackWins => "0-1",
            MatchResult::Draw => "½-½",
        }
    }
}

/// A single game between two players
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Round-local match number
    pub id: u32,
    pub white: Player,
    pub black: Player,
    #[serde(default)]
    pub result: MatchResult,
}

impl Match {
    /// Create a match; the player due white (higher or equal preference) gets white
    pub fn new(id: u32, first: Player, second: Player) -> Self {
        let (white, black) = if first.color_preference >= second.color_preference {
            (first, second)
        } else {
            (second, first)
        };
        Self {
            id,
            white,
            black,
            result: MatchResult::Unknown,
        }
    }
}

/// One sub-round of matches for a group
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    pub matches: Vec<Match>,
}

impl Series {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, game: Match) {
        self.matches.push(game);
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Renumber matches densely from `start`; returns the next free number
    pub fn renumber(&mut self, start: u32) -> u32 {
        let mut next = start;
        for game in &mut self.matches {
            game.id = next;
            next += 1;
        }
        next
    }
}

/// All matches of one group in a round
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupMatches {
    pub level: u32,
    /// Number of sub-rounds the round calls for
    #[serde(default)]
    pub series_count: u32,
    pub series: Vec<Series>,
    /// Round robin of three players, only for odd groups
    #[serde(default)]
    pub trio: Vec<Match>,
}

impl GroupMatches {
    pub fn new(level: u32) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Ordinary matches followed by trio matches
    pub fn all_matches(&self) -> impl Iterator<Item = &Match> {
        self.series.iter().flat_map(|s| s.matches.iter()).chain(self.trio.iter())
    }

    pub fn match_count(&self) -> usize {
        self.all_matches().count()
    }

    pub fn has_trio(&self) -> bool {
        !self.trio.is_empty()
    }
}

/// Matches of every group for one round
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Schedule {
    pub period: u32,
    pub round: u32,
    pub groups: Vec<GroupMatches>,
}

impl Schedule {
    pub fn new(period: u32, round: u32) -> Self {
        Self {
            period,
            round,
            groups: Vec::new(),
        }
    }

    pub fn group(&self, level: u32) -> Option<&GroupMatches> {
        self.groups.iter().find(|g| g.level == level)
    }

    pub fn match_count(&self) -> usize {
        self.groups.iter().map(GroupMatches::match_count).sum()
    }

    /// Decode a schedule from JSON
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| LadderError::MalformedExternalData(e.to_string()))
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schedule: {}", path.display()))?;
        let schedule = Self::from_json(&content)
            .with_context(|| format!("Failed to decode schedule: {}", path.display()))?;
        Ok(schedule)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to encode schedule")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write schedule: {}", path.display()))?;
        Ok(())
    }
}
