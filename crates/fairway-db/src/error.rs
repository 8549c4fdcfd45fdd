//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] and [`serde_json`] errors and adds the domain failures the
//! stores detect themselves.

use fairway_types::{RoundId, ScoreCardError, UnknownEventType};

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `SQLite` operation failed.
    #[error("SQLite error: {0}")]
    Storage(#[from] sqlx::Error),

    /// A payload could not be encoded, or did not match its tag's shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored record carries a tag no decoder exists for.
    #[error("Unknown event type in stored record: {0:?}")]
    UnknownEventType(String),

    /// No score card exists for the round.
    #[error("No score card for round {0}")]
    NotFound(RoundId),

    /// The hole is not on the round's score card.
    #[error("Hole {hole} is not on the score card for round {round_id}")]
    InvalidHole {
        /// The round whose card was updated.
        round_id: RoundId,
        /// The requested hole.
        hole: u32,
    },

    /// A backend rejected the operation (duplicate key, corrupt row, ...).
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<UnknownEventType> for DbError {
    fn from(err: UnknownEventType) -> Self {
        Self::UnknownEventType(err.0)
    }
}

impl From<ScoreCardError> for DbError {
    fn from(err: ScoreCardError) -> Self {
        match err {
            ScoreCardError::UnknownHole { round_id, hole } => Self::InvalidHole { round_id, hole },
        }
    }
}
