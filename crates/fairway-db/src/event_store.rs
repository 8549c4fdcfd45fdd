//! Event store: append and query a round's event log.
//!
//! Events are the source of truth for a round's history. The store
//! encodes each [`RoundEvent`] into an [`EventRecord`], appends it through
//! an [`EventBackend`], and decodes records back on read. Every read is
//! ordered by timestamp.
//!
//! Live queries (`events_for_*`) are streams that emit the current result
//! immediately and again after every write to the same round, made
//! through any store over the same backend. They subscribe to the
//! backend's [`ChangeFeed`](crate::ChangeFeed), hold only a weak handle to
//! the backend, and end once every handle to it is dropped.

use std::sync::{Arc, Weak};

use fairway_types::{EventId, EventType, PlayerId, RoundEvent, RoundId};
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use crate::backend::EventBackend;
use crate::error::DbError;
use crate::record::{EventRecord, RecordFilter};

/// Stream of ordered event lists, re-emitted after each change.
pub type EventListStream = BoxStream<'static, Result<Vec<RoundEvent>, DbError>>;

/// Append-only event log over a storage backend.
pub struct EventStore<B> {
    backend: Arc<B>,
}

impl<B> Clone for EventStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: EventBackend> EventStore<B> {
    /// Create a store owning `backend`.
    pub fn new(backend: B) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Create a store over a shared backend.
    ///
    /// Stores over the same backend share its change feed.
    pub const fn from_arc(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// The backend this store writes to.
    pub const fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Receive the id of every round that is written to or deleted.
    pub fn subscribe_changes(&self) -> broadcast::Receiver<RoundId> {
        self.backend.changes().subscribe()
    }

    /// Append one event.
    ///
    /// `hole_number` indexes the record for hole queries; when `None`, a
    /// shot's own hole is used.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Serialization`] if the payload cannot be
    /// encoded, or the backend's error if the append fails.
    pub async fn store_event(
        &self,
        event: &RoundEvent,
        round_id: RoundId,
        player_id: PlayerId,
        hole_number: Option<u32>,
    ) -> Result<EventId, DbError> {
        let record = EventRecord::encode(event, round_id, player_id, hole_number)?;
        let id = record.id;

        self.backend.insert(vec![record]).await.inspect_err(|e| {
            tracing::warn!(%round_id, event_type = %event.event_type(), error = %e, "Failed to store event");
        })?;

        tracing::debug!(%round_id, %id, event_type = %event.event_type(), "Stored event");
        self.notify(round_id);
        Ok(id)
    }

    /// Append a batch of events, all or nothing.
    ///
    /// Every event is encoded before anything is written, and the backend
    /// applies the batch atomically. An empty batch is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first encoding error, or the backend's error; in both
    /// cases no record of the batch is stored.
    pub async fn store_events(
        &self,
        events: &[RoundEvent],
        round_id: RoundId,
        player_id: PlayerId,
        hole_number: Option<u32>,
    ) -> Result<Vec<EventId>, DbError> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let records = events
            .iter()
            .map(|event| EventRecord::encode(event, round_id, player_id, hole_number))
            .collect::<Result<Vec<_>, _>>()?;
        let ids: Vec<EventId> = records.iter().map(|r| r.id).collect();

        self.backend.insert(records).await.inspect_err(|e| {
            tracing::warn!(%round_id, count = events.len(), error = %e, "Failed to store event batch");
        })?;

        tracing::debug!(%round_id, count = ids.len(), "Stored event batch");
        self.notify(round_id);
        Ok(ids)
    }

    /// Live, ordered events of a round.
    pub fn events_for_round(&self, round_id: RoundId) -> EventListStream {
        self.watch(RecordFilter::round(round_id))
    }

    /// Live, ordered events indexed under one hole.
    pub fn events_for_hole(&self, round_id: RoundId, hole_number: u32) -> EventListStream {
        self.watch(RecordFilter::round(round_id).with_hole(hole_number))
    }

    /// Live, ordered events of one type.
    pub fn events_by_type(&self, round_id: RoundId, event_type: EventType) -> EventListStream {
        self.watch(RecordFilter::round(round_id).with_type(event_type))
    }

    /// Live, ordered events with `start <= timestamp <= end`.
    pub fn events_by_time_range(&self, round_id: RoundId, start: i64, end: i64) -> EventListStream {
        self.watch(RecordFilter::round(round_id).with_time_range(start, end))
    }

    /// Point-in-time, ordered events of a round.
    ///
    /// # Errors
    ///
    /// Returns the backend's error, or a decode error for a corrupt record.
    pub async fn events_snapshot(&self, round_id: RoundId) -> Result<Vec<RoundEvent>, DbError> {
        fetch(self.backend.as_ref(), &RecordFilter::round(round_id)).await
    }

    /// Delete every event of a round; returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the delete fails.
    pub async fn delete_events_for_round(&self, round_id: RoundId) -> Result<u64, DbError> {
        let removed = self.backend.delete_round(round_id).await?;
        tracing::info!(%round_id, removed, "Deleted round events");
        self.notify(round_id);
        Ok(removed)
    }

    /// Number of events stored for a round.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the count fails.
    pub async fn event_count_for_round(&self, round_id: RoundId) -> Result<u64, DbError> {
        self.backend.count_round(round_id).await
    }

    /// Every round with at least one event, ascending.
    ///
    /// # Errors
    ///
    /// Returns the backend's error if the query fails.
    pub async fn all_round_ids(&self) -> Result<Vec<RoundId>, DbError> {
        self.backend.round_ids().await
    }

    fn notify(&self, round_id: RoundId) {
        self.backend.changes().notify(round_id);
    }

    fn watch(&self, filter: RecordFilter) -> EventListStream {
        let query = LiveQuery {
            backend: Arc::downgrade(&self.backend),
            changes: self.backend.changes().subscribe(),
            filter,
            primed: false,
            finished: false,
        };

        stream::unfold(query, |mut query| async move {
            if query.finished {
                return None;
            }
            if query.primed && !query.wait_for_change().await {
                return None;
            }
            query.primed = true;

            let backend = query.backend.upgrade()?;
            match fetch(backend.as_ref(), &query.filter).await {
                Ok(events) => Some((Ok(events), query)),
                Err(e) => {
                    tracing::warn!(round_id = %query.filter.round_id, error = %e, "Live event query failed");
                    query.finished = true;
                    Some((Err(e), query))
                }
            }
        })
        .boxed()
    }
}

/// State carried between emissions of a live query.
struct LiveQuery<B> {
    backend: Weak<B>,
    changes: broadcast::Receiver<RoundId>,
    filter: RecordFilter,
    primed: bool,
    finished: bool,
}

impl<B> LiveQuery<B> {
    /// Wait until the watched round changes. `false` once the backend is gone.
    async fn wait_for_change(&mut self) -> bool {
        loop {
            match self.changes.recv().await {
                Ok(round_id) if round_id == self.filter.round_id => return true,
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Live event query lagged, re-reading");
                    return true;
                }
                Err(RecvError::Closed) => return false,
            }
        }
    }
}

async fn fetch<B: EventBackend>(
    backend: &B,
    filter: &RecordFilter,
) -> Result<Vec<RoundEvent>, DbError> {
    let records = backend.query(filter).await?;
    records
        .iter()
        .map(EventRecord::decode)
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| {
            tracing::warn!(round_id = %filter.round_id, error = %e, "Failed to decode stored event");
        })
}
