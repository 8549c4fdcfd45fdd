//! Aggregate view of a recorded round.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::events::RoundEvent;
use crate::ids::RoundId;

/// Totals computed over a round's event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RoundReplaySummary {
    /// The round that was summarized.
    pub round_id: RoundId,
    /// Number of events in the log.
    pub total_events: u64,
    /// Number of `ShotTracked` events.
    pub shot_count: u64,
    /// Number of `NextHole` and `PreviousHole` events.
    pub hole_changes: u64,
    /// Last timestamp minus first timestamp; 0 for an empty log.
    pub duration_millis: i64,
    /// Whether a `FinishRound` event is present.
    pub is_completed: bool,
}

impl RoundReplaySummary {
    /// Summarize `events`, which must already be in timestamp order.
    pub fn from_events(round_id: RoundId, events: &[RoundEvent]) -> Self {
        let mut summary = Self {
            round_id,
            total_events: 0,
            shot_count: 0,
            hole_changes: 0,
            duration_millis: 0,
            is_completed: false,
        };

        for event in events {
            summary.total_events = summary.total_events.saturating_add(1);
            match event {
                RoundEvent::ShotTracked(_) => {
                    summary.shot_count = summary.shot_count.saturating_add(1);
                }
                RoundEvent::NextHole(_) | RoundEvent::PreviousHole(_) => {
                    summary.hole_changes = summary.hole_changes.saturating_add(1);
                }
                RoundEvent::FinishRound(_) => summary.is_completed = true,
                RoundEvent::LocationUpdated(_) => {}
            }
        }

        if let (Some(first), Some(last)) = (events.first(), events.last()) {
            summary.duration_millis = last.timestamp().saturating_sub(first.timestamp());
        }

        summary
    }
}
