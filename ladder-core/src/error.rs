//! Error taxonomy for the pairing engine

/// Errors raised while building lineups and pairings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LadderError {
    /// The requested group level does not exist in the snapshot
    #[error("group {level} not found")]
    EmptyOrMissingGroup { level: u32 },

    /// No complete pairing could be found under the current constraints
    #[error("no valid pairing for group {level}: {reason}")]
    NoValidPairing { level: u32, reason: String },

    /// A match refers to a player that is not in the group roster
    #[error("player {player_id} is not part of group {level}")]
    InconsistentPlayerReference { level: u32, player_id: u32 },

    /// Two cost matrices of different dimension were combined
    #[error("matrix dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },

    /// Snapshot data could not be decoded
    #[error("malformed league data: {0}")]
    MalformedExternalData(String),
}

pub type Result<T> = std::result::Result<T, LadderError>;
