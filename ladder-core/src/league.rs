//! League snapshot - all groups for one round

use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{LadderError, Result};
use crate::group::Group;

/// Rounds in one period
pub const ROUNDS_PER_PERIOD: u32 = 8;

/// Periods in one season
pub const PERIODS_PER_SEASON: u32 = 4;

/// Ordered groups of a round, highest tier first
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct League {
    /// Period number, 1..=4
    pub period: u32,
    /// Round number within the period, 1..=8
    pub round: u32,
    pub groups: Vec<Group>,
}

impl League {
    pub fn new(period: u32, round: u32) -> Self {
        Self {
            period,
            round,
            groups: Vec::new(),
        }
    }

    pub fn with_groups(mut self, groups: Vec<Group>) -> Self {
        self.groups = groups;
        self.sort_groups();
        self
    }

    /// Keep groups ordered by level, highest tier first
    pub fn sort_groups(&mut self) {
        self.groups.sort_by_key(|g| g.level);
    }

    pub fn group(&self, level: u32) -> Option<&Group> {
        self.groups.iter().find(|g| g.level == level)
    }

    pub fn group_mut(&mut self, level: u32) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.level == level)
    }

    /// Replace the group with the same level
    pub fn replace_group(&mut self, group: Group) -> Result<()> {
        let level = group.level;
        let slot = self
            .group_mut(level)
            .ok_or(LadderError::EmptyOrMissingGroup { level })?;
        *slot = group;
        Ok(())
    }

    /// Level of the highest tier
    pub fn top_level(&self) -> Option<u32> {
        self.groups.iter().map(|g| g.level).min()
    }

    pub fn is_top_level(&self, level: u32) -> bool {
        self.top_level() == Some(level)
    }

    /// The group one tier above `level`, if any
    pub fn group_above(&self, level: u32) -> Option<&Group> {
        self.groups
            .iter()
            .filter(|g| g.level < level)
            .max_by_key(|g| g.level)
    }

    pub fn renumber_all(&mut self) {
        for group in &mut self.groups {
            group.renumber();
        }
    }

    /// Snapshot holding only present players
    pub fn attendance_copy(&self) -> League {
        League {
            period: self.period,
            round: self.round,
            groups: self.groups.iter().map(Group::present_copy).collect(),
        }
    }

    /// Move to the next round, wrapping round and period
    pub fn advance_round(&mut self) {
        self.round += 1;
        if self.round > ROUNDS_PER_PERIOD {
            self.round = 1;
            self.period += 1;
            if self.period > PERIODS_PER_SEASON {
                self.period = 1;
            }
        }
    }

    pub fn player_count(&self) -> usize {
        self.groups.iter().map(Group::len).sum()
    }

    /// Decode a snapshot from JSON
    pub fn from_json(content: &str) -> Result<Self> {
        let mut league: League = serde_json::from_str(content)
            .map_err(|e| LadderError::MalformedExternalData(e.to_string()))?;
        league.sort_groups();
        Ok(league)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read league: {}", path.display()))?;
        let league = Self::from_json(&content)
            .with_context(|| format!("Failed to decode league: {}", path.display()))?;
        Ok(league)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to encode league")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write league: {}", path.display()))?;
        Ok(())
    }
}
