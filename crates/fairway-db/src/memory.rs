//! In-memory storage backend.
//!
//! Records are kept per round in timestamp order behind a single
//! [`RwLock`], so every insert batch is applied under one write guard and
//! concurrent writers never interleave inside a batch.

use std::collections::BTreeMap;
use std::collections::HashSet;

use fairway_types::{RoundId, ScoreCard};
use tokio::sync::RwLock;

use crate::backend::{EventBackend, ScoreCardBackend};
use crate::changes::ChangeFeed;
use crate::error::DbError;
use crate::record::{EventRecord, RecordFilter};

/// Process-local backend, used in tests and by hosts without a database.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    events: RwLock<BTreeMap<RoundId, Vec<EventRecord>>>,
    scorecards: RwLock<BTreeMap<RoundId, ScoreCard>>,
    changes: ChangeFeed,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventBackend for MemoryBackend {
    async fn insert(&self, records: Vec<EventRecord>) -> Result<(), DbError> {
        let mut events = self.events.write().await;

        // Validate the whole batch before touching anything.
        let mut batch_ids = HashSet::with_capacity(records.len());
        for record in &records {
            let duplicate_in_store = events
                .get(&record.round_id)
                .is_some_and(|rows| rows.iter().any(|r| r.id == record.id));
            if duplicate_in_store || !batch_ids.insert(record.id) {
                return Err(DbError::Backend(format!("duplicate event id {}", record.id)));
            }
        }

        for record in records {
            let rows = events.entry(record.round_id).or_default();
            // Insert after every row with an equal timestamp to keep ties stable.
            let position = rows.partition_point(|r| r.timestamp_millis <= record.timestamp_millis);
            rows.insert(position, record);
        }
        Ok(())
    }

    async fn query(&self, filter: &RecordFilter) -> Result<Vec<EventRecord>, DbError> {
        let events = self.events.read().await;
        Ok(events
            .get(&filter.round_id)
            .map(|rows| rows.iter().filter(|r| filter.matches(r)).cloned().collect())
            .unwrap_or_default())
    }

    async fn delete_round(&self, round_id: RoundId) -> Result<u64, DbError> {
        let removed = self.events.write().await.remove(&round_id);
        Ok(removed.map_or(0, |rows| u64::try_from(rows.len()).unwrap_or(u64::MAX)))
    }

    async fn count_round(&self, round_id: RoundId) -> Result<u64, DbError> {
        let events = self.events.read().await;
        Ok(events
            .get(&round_id)
            .map_or(0, |rows| u64::try_from(rows.len()).unwrap_or(u64::MAX)))
    }

    async fn round_ids(&self) -> Result<Vec<RoundId>, DbError> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(id, _)| *id)
            .collect())
    }

    fn changes(&self) -> &ChangeFeed {
        &self.changes
    }
}

impl ScoreCardBackend for MemoryBackend {
    async fn save_scorecard(&self, card: &ScoreCard) -> Result<(), DbError> {
        self.scorecards
            .write()
            .await
            .insert(card.round_id, card.clone());
        Ok(())
    }

    async fn load_scorecard(&self, round_id: RoundId) -> Result<Option<ScoreCard>, DbError> {
        Ok(self.scorecards.read().await.get(&round_id).cloned())
    }

    async fn delete_scorecard(&self, round_id: RoundId) -> Result<bool, DbError> {
        Ok(self.scorecards.write().await.remove(&round_id).is_some())
    }
}
