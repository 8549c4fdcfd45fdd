//! Round recorder: turns in-round actions into stored events.
//!
//! The recorder holds the round being played (course, player, current
//! hole) and appends the matching [`RoundEvent`] for every action through
//! the [`EventStore`], keeping the round's [`ScoreCard`] in step through
//! the [`ScoreCardStore`]. Hole navigation is bounded by the course, and a
//! finished round accepts no further events.

use std::sync::Arc;

use chrono::Utc;
use fairway_db::{DbError, EventBackend, EventStore, ScoreCardBackend, ScoreCardStore};
use fairway_geo::{CameraView, distance_yards, hole_camera};
use fairway_tracking::TrackingError;
use fairway_types::{
    Coordinate, CoordinateError, Course, CourseId, EventId, Hole, PlayerId, RoundEvent, RoundId,
    ScoreCard,
};
use futures::{Stream, StreamExt};

/// Errors that can occur while recording a round.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    /// No round has been started.
    #[error("no round in progress")]
    NoActiveRound,

    /// A round is already being played.
    #[error("round {0} is still in progress")]
    RoundInProgress(RoundId),

    /// The round was finished; it accepts no further events.
    #[error("round {0} is already finished")]
    RoundFinished(RoundId),

    /// The course has no holes to play.
    #[error("course {0} has no holes")]
    EmptyCourse(CourseId),

    /// Navigation would leave the course's hole range.
    #[error("cannot move {direction} from hole {hole}: course has {hole_count} holes")]
    InvalidTransition {
        /// Hole the player is on.
        hole: u32,
        /// `"forward"` or `"back"`.
        direction: &'static str,
        /// Holes on the course.
        hole_count: u32,
    },

    /// The current hole is not in the course layout.
    #[error("hole {0} is not on the course")]
    UnknownHole(u32),

    /// A position was outside valid latitude/longitude ranges.
    #[error("invalid position: {0}")]
    InvalidCoordinate(#[from] CoordinateError),

    /// The tracking stream ended with an error.
    #[error("tracking failed: {0}")]
    Tracking(#[from] TrackingError),

    /// Persisting an event or score card failed.
    #[error("storage error: {0}")]
    Store(#[from] DbError),
}

/// The round currently being played.
#[derive(Debug, Clone)]
struct ActiveRound {
    round_id: RoundId,
    player_id: PlayerId,
    course: Course,
    current_hole: u32,
    finished: bool,
}

impl ActiveRound {
    fn hole_count(&self) -> u32 {
        self.course.hole_count()
    }
}

/// Records one player's round at a time.
pub struct RoundRecorder<B> {
    events: EventStore<B>,
    scorecards: ScoreCardStore<B>,
    round: Option<ActiveRound>,
}

impl<B: EventBackend + ScoreCardBackend> RoundRecorder<B> {
    /// Create a recorder writing events and score cards to `backend`.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            events: EventStore::from_arc(Arc::clone(&backend)),
            scorecards: ScoreCardStore::from_arc(backend),
            round: None,
        }
    }

    /// The event store this recorder appends to.
    pub const fn events(&self) -> &EventStore<B> {
        &self.events
    }

    /// The score card store this recorder updates.
    pub const fn scorecards(&self) -> &ScoreCardStore<B> {
        &self.scorecards
    }

    /// The round being recorded, if any.
    pub fn round_id(&self) -> Option<RoundId> {
        self.round.as_ref().map(|r| r.round_id)
    }

    /// The hole the player is on, if a round is active.
    pub fn current_hole(&self) -> Option<u32> {
        self.round.as_ref().map(|r| r.current_hole)
    }

    /// Begin a round on hole 1 with an empty score card.
    ///
    /// # Errors
    ///
    /// [`RecorderError::EmptyCourse`] for a course without holes,
    /// [`RecorderError::RoundInProgress`] if an unfinished round is active.
    pub async fn start_round(
        &mut self,
        course: Course,
        player_id: PlayerId,
        round_id: RoundId,
    ) -> Result<ScoreCard, RecorderError> {
        if let Some(active) = self.round.as_ref().filter(|r| !r.finished) {
            return Err(RecorderError::RoundInProgress(active.round_id));
        }
        if course.holes.is_empty() {
            return Err(RecorderError::EmptyCourse(course.id));
        }

        let card = ScoreCard::new(round_id, player_id, course.id, course.hole_count(), Utc::now());
        self.scorecards.create(&card).await?;

        tracing::info!(
            %round_id,
            %player_id,
            course = %course.name,
            holes = course.hole_count(),
            "Round started"
        );
        self.round = Some(ActiveRound {
            round_id,
            player_id,
            course,
            current_hole: 1,
            finished: false,
        });
        Ok(card)
    }

    /// Record a shot on the current hole.
    pub async fn record_shot(&mut self) -> Result<EventId, RecorderError> {
        let hole = self.playing()?.current_hole;
        self.append(RoundEvent::shot_tracked(now_millis(), hole)).await
    }

    /// Move to the next hole.
    ///
    /// # Errors
    ///
    /// [`RecorderError::InvalidTransition`] on the last hole.
    pub async fn next_hole(&mut self) -> Result<u32, RecorderError> {
        let round = self.playing()?;
        if round.current_hole >= round.hole_count() {
            return Err(RecorderError::InvalidTransition {
                hole: round.current_hole,
                direction: "forward",
                hole_count: round.hole_count(),
            });
        }

        self.append(RoundEvent::next_hole(now_millis())).await?;
        self.move_to(|hole| hole.saturating_add(1))
    }

    /// Move back to the previous hole.
    ///
    /// # Errors
    ///
    /// [`RecorderError::InvalidTransition`] on hole 1.
    pub async fn previous_hole(&mut self) -> Result<u32, RecorderError> {
        let round = self.playing()?;
        if round.current_hole <= 1 {
            return Err(RecorderError::InvalidTransition {
                hole: round.current_hole,
                direction: "back",
                hole_count: round.hole_count(),
            });
        }

        self.append(RoundEvent::previous_hole(now_millis())).await?;
        self.move_to(|hole| hole.saturating_sub(1))
    }

    /// Finish the round and close its score card.
    ///
    /// The card must exist before `FinishRound` is appended. Once the event
    /// is stored the round is finished, even if closing the card fails.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] (wrapped in [`RecorderError::Store`]) if the
    /// round has no card; nothing is appended in that case.
    pub async fn finish_round(&mut self) -> Result<ScoreCard, RecorderError> {
        let round_id = self.playing()?.round_id;
        if self.scorecards.get(round_id).await?.is_none() {
            return Err(DbError::NotFound(round_id).into());
        }

        self.append(RoundEvent::finish_round(now_millis())).await?;
        if let Some(round) = self.round.as_mut() {
            round.finished = true;
        }

        let card = self.scorecards.finish(round_id).await?;
        tracing::info!(%round_id, total_strokes = card.total_strokes(), "Round finished");
        Ok(card)
    }

    /// Set (or clear) the strokes for a hole. Allowed after finishing.
    pub async fn set_hole_score(
        &mut self,
        hole: u32,
        strokes: Option<u32>,
    ) -> Result<ScoreCard, RecorderError> {
        let round_id = self.active()?.round_id;
        Ok(self
            .scorecards
            .update_hole_score(round_id, hole, strokes)
            .await?)
    }

    /// Store every location update from a tracking stream against the
    /// current hole, until the stream ends.
    ///
    /// Returns how many updates were stored. Other event kinds in the
    /// stream are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first tracking or storage error; updates stored before
    /// it are kept.
    pub async fn record_locations<S>(&mut self, mut locations: S) -> Result<u64, RecorderError>
    where
        S: Stream<Item = Result<RoundEvent, TrackingError>> + Unpin,
    {
        let mut stored: u64 = 0;
        while let Some(item) = locations.next().await {
            let event = item?;
            if !matches!(event, RoundEvent::LocationUpdated(_)) {
                tracing::debug!(event_type = %event.event_type(), "Ignoring non-location event");
                continue;
            }
            self.playing()?;
            self.append(event).await?;
            stored = stored.saturating_add(1);
        }

        tracing::debug!(stored, "Location stream ended");
        Ok(stored)
    }

    /// Distance in yards from `location` to the current hole's flag.
    pub fn yardage_to_flag(&self, location: Coordinate) -> Result<f64, RecorderError> {
        location.validate()?;
        let hole = self.current_layout()?;
        Ok(distance_yards(location, hole.flag))
    }

    /// Camera framing tee and flag of the current hole.
    pub fn hole_view(&self) -> Result<CameraView, RecorderError> {
        let hole = self.current_layout()?;
        Ok(hole_camera(hole.tee, hole.flag))
    }

    fn active(&self) -> Result<&ActiveRound, RecorderError> {
        self.round.as_ref().ok_or(RecorderError::NoActiveRound)
    }

    /// The active round, if it still accepts events.
    fn playing(&self) -> Result<&ActiveRound, RecorderError> {
        let round = self.active()?;
        if round.finished {
            return Err(RecorderError::RoundFinished(round.round_id));
        }
        Ok(round)
    }

    fn current_layout(&self) -> Result<&Hole, RecorderError> {
        let round = self.active()?;
        round
            .course
            .hole(round.current_hole)
            .ok_or(RecorderError::UnknownHole(round.current_hole))
    }

    async fn append(&self, event: RoundEvent) -> Result<EventId, RecorderError> {
        let round = self.playing()?;
        let id = self
            .events
            .store_event(&event, round.round_id, round.player_id, Some(round.current_hole))
            .await?;
        Ok(id)
    }

    fn move_to(&mut self, step: impl FnOnce(u32) -> u32) -> Result<u32, RecorderError> {
        let round = self.round.as_mut().ok_or(RecorderError::NoActiveRound)?;
        round.current_hole = step(round.current_hole);
        tracing::debug!(round_id = %round.round_id, hole = round.current_hole, "Changed hole");
        Ok(round.current_hole)
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
