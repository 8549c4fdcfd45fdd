//! Storage backend traits.
//!
//! The stores in this crate own the record lifecycle and the codec; a
//! backend only has to persist and select rows. Two implementations ship
//! with the crate: [`MemoryBackend`](crate::MemoryBackend) and
//! [`SqliteBackend`](crate::SqliteBackend).

use std::future::Future;

use fairway_types::{RoundId, ScoreCard};

use crate::changes::ChangeFeed;
use crate::error::DbError;
use crate::record::{EventRecord, RecordFilter};

/// Row-level persistence for the event log.
pub trait EventBackend: Send + Sync + 'static {
    /// Append records atomically: either every record is stored or none is.
    fn insert(&self, records: Vec<EventRecord>) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Select matching records ordered by timestamp, ties in insertion order.
    fn query(
        &self,
        filter: &RecordFilter,
    ) -> impl Future<Output = Result<Vec<EventRecord>, DbError>> + Send;

    /// Delete every record of a round, returning how many were removed.
    fn delete_round(&self, round_id: RoundId) -> impl Future<Output = Result<u64, DbError>> + Send;

    /// Number of records stored for a round.
    fn count_round(&self, round_id: RoundId) -> impl Future<Output = Result<u64, DbError>> + Send;

    /// Distinct round ids with at least one record, ascending.
    fn round_ids(&self) -> impl Future<Output = Result<Vec<RoundId>, DbError>> + Send;

    /// The feed every store over this backend announces writes on.
    fn changes(&self) -> &ChangeFeed;
}

/// Persistence for score cards, keyed by round.
pub trait ScoreCardBackend: Send + Sync + 'static {
    /// Insert or replace the card for its round.
    fn save_scorecard(&self, card: &ScoreCard)
    -> impl Future<Output = Result<(), DbError>> + Send;

    /// Load the card for a round, if one exists.
    fn load_scorecard(
        &self,
        round_id: RoundId,
    ) -> impl Future<Output = Result<Option<ScoreCard>, DbError>> + Send;

    /// Remove the card for a round; `true` if one existed.
    fn delete_scorecard(
        &self,
        round_id: RoundId,
    ) -> impl Future<Output = Result<bool, DbError>> + Send;
}
