//! Score card persistence.
//!
//! Score cards are a materialized view kept beside the event log. Every
//! mutation loads the card, applies the change, bumps `updated_at`, and
//! saves it back. Updates to one round are expected from a single caller;
//! concurrent updates to the same card are last-writer-wins.

use std::sync::Arc;

use chrono::Utc;
use fairway_types::{RoundId, ScoreCard};

use crate::backend::ScoreCardBackend;
use crate::error::DbError;

/// Load/mutate/save operations on score cards.
pub struct ScoreCardStore<B> {
    backend: Arc<B>,
}

impl<B> Clone for ScoreCardStore<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
        }
    }
}

impl<B: ScoreCardBackend> ScoreCardStore<B> {
    /// Create a store owning `backend`.
    pub fn new(backend: B) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Create a store over a shared backend.
    pub const fn from_arc(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Persist a newly created card (replacing any card for the same round).
    pub async fn create(&self, card: &ScoreCard) -> Result<(), DbError> {
        self.backend.save_scorecard(card).await?;
        tracing::info!(round_id = %card.round_id, holes = card.hole_scores.len(), "Created score card");
        Ok(())
    }

    /// Load a round's card.
    pub async fn get(&self, round_id: RoundId) -> Result<Option<ScoreCard>, DbError> {
        self.backend.load_scorecard(round_id).await
    }

    /// Set (or clear) the strokes for one hole and persist the card.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] if the round has no card,
    /// [`DbError::InvalidHole`] if the hole is not on it.
    pub async fn update_hole_score(
        &self,
        round_id: RoundId,
        hole: u32,
        strokes: Option<u32>,
    ) -> Result<ScoreCard, DbError> {
        let mut card = self.require(round_id).await?;
        card.set_score(hole, strokes, Utc::now())?;
        self.backend.save_scorecard(&card).await?;
        tracing::debug!(%round_id, hole, ?strokes, "Updated hole score");
        Ok(card)
    }

    /// Mark the round's card as finished and persist it.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] if the round has no card.
    pub async fn finish(&self, round_id: RoundId) -> Result<ScoreCard, DbError> {
        let mut card = self.require(round_id).await?;
        card.finish(Utc::now());
        self.backend.save_scorecard(&card).await?;
        tracing::info!(%round_id, total_strokes = card.total_strokes(), "Score card finished");
        Ok(card)
    }

    /// Delete a round's card; `true` if one existed.
    pub async fn delete(&self, round_id: RoundId) -> Result<bool, DbError> {
        self.backend.delete_scorecard(round_id).await
    }

    async fn require(&self, round_id: RoundId) -> Result<ScoreCard, DbError> {
        self.backend
            .load_scorecard(round_id)
            .await?
            .ok_or(DbError::NotFound(round_id))
    }
}
