//! Data layer for the Fairway round tracker.
//!
//! The event log is append-only: records are created once, never mutated,
//! and deleted only in bulk per round. Score cards are a separate
//! materialized view persisted on every mutation.
//!
//! # Architecture
//!
//! ```text
//! RoundEvent --encode--> EventRecord --> EventBackend (MemoryBackend | SqliteBackend)
//!     ^                                       |
//!     +---------------decode------------------+
//!
//! ScoreCard ------------------------------> ScoreCardBackend
//! ```
//!
//! # Modules
//!
//! - [`record`] -- Persisted record shape, filter, and tag-dispatched codec
//! - [`backend`] -- Storage traits
//! - [`changes`] -- Per-backend change feed for live queries
//! - [`memory`] -- In-memory backend
//! - [`sqlite`] -- `SQLite` backend on [`sqlx`]
//! - [`event_store`] -- Append, live queries, snapshots
//! - [`scorecard_store`] -- Score card load/mutate/save
//! - [`error`] -- Shared error type

pub mod backend;
pub mod changes;
pub mod error;
pub mod event_store;
pub mod memory;
pub mod record;
pub mod scorecard_store;
pub mod sqlite;

// Re-export primary types for convenience.
pub use backend::{EventBackend, ScoreCardBackend};
pub use changes::ChangeFeed;
pub use error::DbError;
pub use event_store::{EventListStream, EventStore};
pub use memory::MemoryBackend;
pub use record::{EventRecord, RecordFilter};
pub use scorecard_store::ScoreCardStore;
pub use sqlite::{IN_MEMORY_URL, SqliteBackend, SqliteConfig};
