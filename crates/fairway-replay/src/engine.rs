//! Replay engine: re-emit a stored round's events with their original pacing.
//!
//! Every replay is a single lazy stream. Nothing is read from the store
//! until the stream is first polled, and the only suspension points are
//! the store read and a [`tokio::time::sleep`] between emissions, so
//! dropping the stream cancels the replay. Nothing is spawned.

use std::time::Duration;

use fairway_db::{EventBackend, EventStore};
use fairway_types::{EventType, RoundEvent, RoundId, RoundReplaySummary};
use futures::StreamExt;
use futures::stream::{self, BoxStream};

use crate::config::ReplayConfig;
use crate::error::ReplayError;

/// Stream of replayed events. A read failure is the last item.
pub type ReplayStream = BoxStream<'static, Result<RoundEvent, ReplayError>>;

/// How long to wait between two consecutive emissions.
#[derive(Debug, Clone, Copy)]
enum Pacing {
    /// The recorded gap, divided by a speed multiplier.
    Recorded { speed: f64 },
    /// The same delay between every pair of events.
    Fixed(Duration),
}

impl Pacing {
    fn delay(self, previous_millis: i64, current_millis: i64) -> Duration {
        match self {
            Self::Recorded { speed } => {
                // Out-of-order timestamps replay back to back.
                let gap = current_millis.saturating_sub(previous_millis).max(0);
                #[allow(clippy::cast_precision_loss)]
                let seconds = gap as f64 / 1000.0 / speed;
                Duration::try_from_secs_f64(seconds).unwrap_or(Duration::MAX)
            }
            Self::Fixed(delay) => delay,
        }
    }
}

/// Replays stored rounds from an [`EventStore`].
pub struct ReplayEngine<B> {
    store: EventStore<B>,
    config: ReplayConfig,
}

impl<B> Clone for ReplayEngine<B> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config,
        }
    }
}

impl<B: EventBackend> ReplayEngine<B> {
    /// Create an engine with the default fixed delays.
    pub fn new(store: EventStore<B>) -> Self {
        Self::with_config(store, ReplayConfig::default())
    }

    /// Create an engine with explicit fixed delays.
    pub const fn with_config(store: EventStore<B>, config: ReplayConfig) -> Self {
        Self { store, config }
    }

    /// The pacing configuration in use.
    pub const fn config(&self) -> &ReplayConfig {
        &self.config
    }

    /// Replay every event of a round at recorded speed.
    pub fn replay_round(&self, round_id: RoundId) -> ReplayStream {
        self.replay(round_id, Pacing::Recorded { speed: 1.0 }, |_| true)
    }

    /// Replay every event of a round with each gap divided by `multiplier`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::InvalidSpeed`] unless `multiplier` is finite
    /// and greater than zero. No stream is created in that case.
    pub fn replay_round_with_speed(
        &self,
        round_id: RoundId,
        multiplier: f64,
    ) -> Result<ReplayStream, ReplayError> {
        if !multiplier.is_finite() || multiplier <= 0.0 {
            return Err(ReplayError::InvalidSpeed(multiplier));
        }
        Ok(self.replay(round_id, Pacing::Recorded { speed: multiplier }, |_| true))
    }

    /// Replay only hole navigation events, evenly spaced.
    pub fn replay_hole_navigation(&self, round_id: RoundId) -> ReplayStream {
        self.replay(
            round_id,
            Pacing::Fixed(self.config.hole_navigation_delay()),
            |event| event.event_type().is_hole_navigation(),
        )
    }

    /// Replay only shots, evenly spaced.
    pub fn replay_shot_tracking(&self, round_id: RoundId) -> ReplayStream {
        self.replay(
            round_id,
            Pacing::Fixed(self.config.shot_tracking_delay()),
            |event| event.event_type() == EventType::ShotTracked,
        )
    }

    /// Summarize a round without replaying it.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::Store`] if the round cannot be read.
    pub async fn round_replay_summary(
        &self,
        round_id: RoundId,
    ) -> Result<RoundReplaySummary, ReplayError> {
        let events = self.store.events_snapshot(round_id).await?;
        Ok(RoundReplaySummary::from_events(round_id, &events))
    }

    fn replay(
        &self,
        round_id: RoundId,
        pacing: Pacing,
        select: fn(&RoundEvent) -> bool,
    ) -> ReplayStream {
        let replay = Replay {
            round_id,
            pacing,
            select,
            phase: Phase::Loading(self.store.clone()),
        };

        stream::unfold(replay, |mut replay| async move {
            loop {
                match std::mem::replace(&mut replay.phase, Phase::Done) {
                    Phase::Loading(store) => match store.events_snapshot(replay.round_id).await {
                        Ok(events) => {
                            let events: Vec<RoundEvent> =
                                events.into_iter().filter(|e| (replay.select)(e)).collect();
                            tracing::info!(
                                round_id = %replay.round_id,
                                events = events.len(),
                                pacing = ?replay.pacing,
                                "Starting replay"
                            );
                            replay.phase = Phase::Emitting {
                                events: events.into_iter(),
                                previous_millis: None,
                            };
                        }
                        Err(e) => {
                            tracing::warn!(round_id = %replay.round_id, error = %e, "Replay read failed");
                            return Some((Err(ReplayError::Store(e)), replay));
                        }
                    },
                    Phase::Emitting {
                        mut events,
                        previous_millis,
                    } => {
                        let Some(event) = events.next() else {
                            tracing::debug!(round_id = %replay.round_id, "Replay finished");
                            return None;
                        };
                        if let Some(previous) = previous_millis {
                            let delay = replay.pacing.delay(previous, event.timestamp());
                            if !delay.is_zero() {
                                tokio::time::sleep(delay).await;
                            }
                        }
                        replay.phase = Phase::Emitting {
                            events,
                            previous_millis: Some(event.timestamp()),
                        };
                        return Some((Ok(event), replay));
                    }
                    Phase::Done => return None,
                }
            }
        })
        .boxed()
    }
}

/// State carried between emissions of one replay.
struct Replay<B> {
    round_id: RoundId,
    pacing: Pacing,
    select: fn(&RoundEvent) -> bool,
    phase: Phase<B>,
}

enum Phase<B> {
    /// Not yet polled; the round has not been read.
    Loading(EventStore<B>),
    /// Emitting the loaded events in order.
    Emitting {
        events: std::vec::IntoIter<RoundEvent>,
        previous_millis: Option<i64>,
    },
    /// Finished, or failed after yielding its error.
    Done,
}
