//! Score card: a materialized per-hole view of a round, kept outside the
//! event log and persisted on every mutation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::course::Course;
use crate::ids::{CourseId, PlayerId, RoundId};

/// Errors raised when mutating a [`ScoreCard`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoreCardError {
    /// The hole is not part of this card.
    #[error("hole {hole} is not on the score card for round {round_id}")]
    UnknownHole {
        /// The round the card belongs to.
        round_id: RoundId,
        /// The hole that was requested.
        hole: u32,
    },
}

/// Per-hole strokes for one player's round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScoreCard {
    /// The round this card belongs to.
    pub round_id: RoundId,
    /// The player whose strokes are recorded.
    pub player_id: PlayerId,
    /// The course being played.
    pub course_id: CourseId,
    /// Strokes per hole number; `None` until the hole is scored.
    pub hole_scores: BTreeMap<u32, Option<u32>>,
    /// `false` once the round is finished.
    pub in_progress: bool,
    /// When the card was created.
    pub created_at: DateTime<Utc>,
    /// When the card was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl ScoreCard {
    /// Create an empty card with holes `1..=hole_count`.
    pub fn new(
        round_id: RoundId,
        player_id: PlayerId,
        course_id: CourseId,
        hole_count: u32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            round_id,
            player_id,
            course_id,
            hole_scores: (1..=hole_count).map(|hole| (hole, None)).collect(),
            in_progress: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set (or clear, with `None`) the strokes for a hole.
    pub fn set_score(
        &mut self,
        hole: u32,
        strokes: Option<u32>,
        now: DateTime<Utc>,
    ) -> Result<(), ScoreCardError> {
        let slot = self
            .hole_scores
            .get_mut(&hole)
            .ok_or(ScoreCardError::UnknownHole {
                round_id: self.round_id,
                hole,
            })?;
        *slot = strokes;
        self.updated_at = now;
        Ok(())
    }

    /// Mark the round as finished.
    pub const fn finish(&mut self, now: DateTime<Utc>) {
        self.in_progress = false;
        self.updated_at = now;
    }

    /// Strokes recorded so far across all scored holes. Saturates.
    pub fn total_strokes(&self) -> u64 {
        self.hole_scores
            .values()
            .flatten()
            .fold(0, |total: u64, &strokes| total.saturating_add(u64::from(strokes)))
    }

    /// Number of holes with a recorded score.
    pub fn holes_completed(&self) -> usize {
        self.hole_scores.values().filter(|s| s.is_some()).count()
    }

    /// Strokes relative to par over the scored holes only.
    ///
    /// Holes missing from `course` count as par.
    pub fn score_to_par(&self, course: &Course) -> i64 {
        self.hole_scores
            .iter()
            .filter_map(|(hole, strokes)| {
                let strokes = (*strokes)?;
                let par = course.hole(*hole).map_or(strokes, |h| h.par);
                Some(i64::from(strokes).saturating_sub(i64::from(par)))
            })
            .fold(0, i64::saturating_add)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use crate::course::Hole;
    use crate::geo::Coordinate;

    fn card() -> ScoreCard {
        ScoreCard::new(RoundId(1), PlayerId(2), CourseId(3), 3, Utc::now())
    }

    #[test]
    fn new_card_has_empty_holes() {
        let card = card();
        assert_eq!(card.hole_scores.len(), 3);
        assert!(card.in_progress);
        assert_eq!(card.holes_completed(), 0);
        assert_eq!(card.total_strokes(), 0);
    }

    #[test]
    fn set_score_updates_totals() {
        let mut card = card();
        card.set_score(1, Some(5), Utc::now()).unwrap();
        card.set_score(2, Some(3), Utc::now()).unwrap();
        assert_eq!(card.total_strokes(), 8);
        assert_eq!(card.holes_completed(), 2);

        card.set_score(2, None, Utc::now()).unwrap();
        assert_eq!(card.total_strokes(), 5);
    }

    #[test]
    fn totals_do_not_overflow() {
        let mut card = card();
        card.set_score(1, Some(u32::MAX), Utc::now()).unwrap();
        card.set_score(2, Some(u32::MAX), Utc::now()).unwrap();
        card.set_score(3, Some(1), Utc::now()).unwrap();
        assert_eq!(card.total_strokes(), 2 * u64::from(u32::MAX) + 1);
    }

    #[test]
    fn unknown_hole_is_rejected() {
        let mut card = card();
        let err = card.set_score(4, Some(4), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            ScoreCardError::UnknownHole {
                round_id: RoundId(1),
                hole: 4
            }
        );
    }

    #[test]
    fn score_to_par_counts_scored_holes() {
        let spot = Coordinate::new(0.0, 0.0);
        let course = Course {
            id: CourseId(3),
            name: "Test".to_owned(),
            holes: (1..=3)
                .map(|number| Hole {
                    number,
                    par: 4,
                    tee: spot,
                    flag: spot,
                })
                .collect(),
        };
        let mut card = card();
        card.set_score(1, Some(5), Utc::now()).unwrap();
        card.set_score(2, Some(3), Utc::now()).unwrap();
        assert_eq!(card.score_to_par(&course), 0);
        card.set_score(3, Some(6), Utc::now()).unwrap();
        assert_eq!(card.score_to_par(&course), 2);
    }

    #[test]
    fn finish_clears_in_progress() {
        let mut card = card();
        card.finish(Utc::now());
        assert!(!card.in_progress);
    }

    #[test]
    fn hole_scores_survive_json() {
        let mut card = card();
        card.set_score(2, Some(4), Utc::now()).unwrap();
        let json = serde_json::to_string(&card).unwrap();
        let back: ScoreCard = serde_json::from_str(&json).unwrap();
        assert_eq!(back, card);
    }
}
