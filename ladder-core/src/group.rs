//! Groups (tiers) of the ladder

use serde::{Deserialize, Serialize};

use crate::player::Player;

/// One ranked division of the ladder
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Group {
    /// Tier rank, 0 is the highest group
    pub level: u32,
    pub name: String,
    #[serde(default)]
    pub players: Vec<Player>,
}

impl Group {
    pub fn new(level: u32, name: &str) -> Self {
        Self {
            level,
            name: name.to_string(),
            players: Vec::new(),
        }
    }

    pub fn with_players(mut self, players: Vec<Player>) -> Self {
        self.players = players;
        self
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn player_by_id(&self, id: u32) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    /// Remove and return the player with `id`
    pub fn take_player(&mut self, id: u32) -> Option<Player> {
        let index = self.players.iter().position(|p| p.id == id)?;
        Some(self.players.remove(index))
    }

    /// Renumber players 1..=n in their current order
    pub fn renumber(&mut self) {
        for (index, player) in self.players.iter_mut().enumerate() {
            player.id = index as u32 + 1;
        }
    }

    /// Players whose home level differs from this group's level
    pub fn displaced_players(&self) -> Vec<&Player> {
        self.players
            .iter()
            .filter(|p| p.is_displaced_in(self.level))
            .collect()
    }

    /// Copy of this group holding only the present players
    pub fn present_copy(&self) -> Group {
        Group {
            level: self.level,
            name: self.name.clone(),
            players: self.players.iter().filter(|p| p.present).cloned().collect(),
        }
    }

    /// Stable sort by rating, highest first
    pub fn sort_by_rating(&mut self) {
        self.players.sort_by(|a, b| b.rating.cmp(&a.rating));
    }

    /// Compact one-line description for logs
    pub fn summary(&self) -> String {
        let names: Vec<String> = self
            .players
            .iter()
            .map(|p| format!("{}:{}", p.id, p.initials))
            .collect();
        format!("{} (level {}): {}", self.name, self.level, names.join(" "))
    }
}
