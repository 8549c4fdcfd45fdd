//! Error types for round replay.

use fairway_db::DbError;

/// Errors that can occur while setting up or running a replay.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    /// The speed multiplier was not a finite number greater than zero.
    #[error("Invalid replay speed {0}: must be finite and greater than zero")]
    InvalidSpeed(f64),

    /// Reading the round's events failed.
    #[error("Failed to read round events: {0}")]
    Store(#[from] DbError),
}
