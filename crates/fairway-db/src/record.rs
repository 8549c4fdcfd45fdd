//! Persisted event records and the codec between them and [`RoundEvent`].
//!
//! A record stores the event's tag and its payload struct serialized as
//! JSON. Decoding parses the tag first and then deserializes exactly the
//! payload shape that tag names; there is no fallback branch.

use fairway_types::{EventId, EventType, PlayerId, RoundEvent, RoundId};

use crate::error::DbError;

/// One row of the event log. Created once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Surrogate primary key.
    pub id: EventId,
    /// Round the event belongs to.
    pub round_id: RoundId,
    /// Player who generated the event.
    pub player_id: PlayerId,
    /// Persisted [`EventType`] tag.
    pub event_type: String,
    /// Event timestamp, epoch milliseconds.
    pub timestamp_millis: i64,
    /// Hole the event is indexed under, if any.
    pub hole_number: Option<u32>,
    /// JSON of the variant's payload struct.
    pub payload: String,
}

impl EventRecord {
    /// Encode an event into a new record with a fresh id.
    ///
    /// When `hole_number` is `None` the event's own hole (shots only) is
    /// used so hole queries still find it.
    pub fn encode(
        event: &RoundEvent,
        round_id: RoundId,
        player_id: PlayerId,
        hole_number: Option<u32>,
    ) -> Result<Self, DbError> {
        let payload = match event {
            RoundEvent::LocationUpdated(p) => serde_json::to_string(p)?,
            RoundEvent::ShotTracked(p) => serde_json::to_string(p)?,
            RoundEvent::NextHole(p) => serde_json::to_string(p)?,
            RoundEvent::PreviousHole(p) => serde_json::to_string(p)?,
            RoundEvent::FinishRound(p) => serde_json::to_string(p)?,
        };

        Ok(Self {
            id: EventId::new(),
            round_id,
            player_id,
            event_type: event.event_type().as_str().to_owned(),
            timestamp_millis: event.timestamp(),
            hole_number: hole_number.or_else(|| event.hole_number()),
            payload,
        })
    }

    /// Reconstruct the event from tag and payload.
    pub fn decode(&self) -> Result<RoundEvent, DbError> {
        let tag: EventType = self.event_type.parse()?;
        let event = match tag {
            EventType::LocationUpdated => {
                RoundEvent::LocationUpdated(serde_json::from_str(&self.payload)?)
            }
            EventType::ShotTracked => RoundEvent::ShotTracked(serde_json::from_str(&self.payload)?),
            EventType::NextHole => RoundEvent::NextHole(serde_json::from_str(&self.payload)?),
            EventType::PreviousHole => {
                RoundEvent::PreviousHole(serde_json::from_str(&self.payload)?)
            }
            EventType::FinishRound => RoundEvent::FinishRound(serde_json::from_str(&self.payload)?),
        };
        Ok(event)
    }
}

/// Which records of a round a query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFilter {
    /// The round to read.
    pub round_id: RoundId,
    /// Only records indexed under this hole.
    pub hole_number: Option<u32>,
    /// Only records with this tag.
    pub event_type: Option<EventType>,
    /// Only records with `start <= timestamp <= end`.
    pub time_range: Option<(i64, i64)>,
}

impl RecordFilter {
    /// Every record of a round.
    pub const fn round(round_id: RoundId) -> Self {
        Self {
            round_id,
            hole_number: None,
            event_type: None,
            time_range: None,
        }
    }

    /// Restrict to one hole.
    #[must_use]
    pub const fn with_hole(mut self, hole_number: u32) -> Self {
        self.hole_number = Some(hole_number);
        self
    }

    /// Restrict to one tag.
    #[must_use]
    pub const fn with_type(mut self, event_type: EventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    /// Restrict to an inclusive timestamp range.
    #[must_use]
    pub const fn with_time_range(mut self, start: i64, end: i64) -> Self {
        self.time_range = Some((start, end));
        self
    }

    /// Whether `record` passes the filter.
    pub fn matches(&self, record: &EventRecord) -> bool {
        record.round_id == self.round_id
            && self
                .hole_number
                .is_none_or(|hole| record.hole_number == Some(hole))
            && self
                .event_type
                .is_none_or(|tag| record.event_type == tag.as_str())
            && self.time_range.is_none_or(|(start, end)| {
                (start..=end).contains(&record.timestamp_millis)
            })
    }
}
