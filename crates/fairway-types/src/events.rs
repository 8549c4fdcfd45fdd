//! Round events: the entries of a round's append-only log.
//!
//! [`RoundEvent`] is a closed set of variants. Each variant wraps its own
//! payload struct, so the persisted form is the payload alone plus the
//! [`EventType`] tag, and decoding dispatches on the tag to exactly one
//! payload shape. The tag is always derived from the variant via
//! [`RoundEvent::event_type`], never stored beside it.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::geo::Coordinate;

/// Discriminant tag of a [`RoundEvent`], used for storage and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EventType {
    /// A device location sample.
    LocationUpdated,
    /// A shot was struck on a hole.
    ShotTracked,
    /// The player advanced to the next hole.
    NextHole,
    /// The player went back to the previous hole.
    PreviousHole,
    /// The round was completed.
    FinishRound,
}

impl EventType {
    /// Every tag, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::LocationUpdated,
        Self::ShotTracked,
        Self::NextHole,
        Self::PreviousHole,
        Self::FinishRound,
    ];

    /// The persisted string form of this tag.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocationUpdated => "LocationUpdated",
            Self::ShotTracked => "ShotTracked",
            Self::NextHole => "NextHole",
            Self::PreviousHole => "PreviousHole",
            Self::FinishRound => "FinishRound",
        }
    }

    /// Whether this tag belongs to hole navigation (next, previous, finish).
    pub const fn is_hole_navigation(self) -> bool {
        matches!(self, Self::NextHole | Self::PreviousHole | Self::FinishRound)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored tag that names no [`EventType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event type tag: {0:?}")]
pub struct UnknownEventType(pub String);

impl FromStr for EventType {
    type Err = UnknownEventType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LocationUpdated" => Ok(Self::LocationUpdated),
            "ShotTracked" => Ok(Self::ShotTracked),
            "NextHole" => Ok(Self::NextHole),
            "PreviousHole" => Ok(Self::PreviousHole),
            "FinishRound" => Ok(Self::FinishRound),
            other => Err(UnknownEventType(other.to_owned())),
        }
    }
}

/// Payload of [`RoundEvent::LocationUpdated`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LocationUpdated {
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Sampled device position.
    pub location: Coordinate,
}

/// Payload of [`RoundEvent::ShotTracked`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ShotTracked {
    /// Epoch milliseconds.
    pub timestamp: i64,
    /// Hole the shot was played on.
    pub hole_number: u32,
}

/// Payload of [`RoundEvent::NextHole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NextHole {
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// Payload of [`RoundEvent::PreviousHole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PreviousHole {
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// Payload of [`RoundEvent::FinishRound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FinishRound {
    /// Epoch milliseconds.
    pub timestamp: i64,
}

/// One entry in a round's event log.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "event_type")]
#[ts(export, export_to = "bindings/")]
pub enum RoundEvent {
    /// A device location sample.
    LocationUpdated(LocationUpdated),
    /// A shot was struck.
    ShotTracked(ShotTracked),
    /// Advance to the next hole.
    NextHole(NextHole),
    /// Go back to the previous hole.
    PreviousHole(PreviousHole),
    /// The round is over.
    FinishRound(FinishRound),
}

impl RoundEvent {
    /// A location sample taken at `timestamp`.
    pub const fn location_updated(timestamp: i64, location: Coordinate) -> Self {
        Self::LocationUpdated(LocationUpdated {
            timestamp,
            location,
        })
    }

    /// A shot on `hole_number` at `timestamp`.
    pub const fn shot_tracked(timestamp: i64, hole_number: u32) -> Self {
        Self::ShotTracked(ShotTracked {
            timestamp,
            hole_number,
        })
    }

    /// Advance to the next hole at `timestamp`.
    pub const fn next_hole(timestamp: i64) -> Self {
        Self::NextHole(NextHole { timestamp })
    }

    /// Return to the previous hole at `timestamp`.
    pub const fn previous_hole(timestamp: i64) -> Self {
        Self::PreviousHole(PreviousHole { timestamp })
    }

    /// Finish the round at `timestamp`.
    pub const fn finish_round(timestamp: i64) -> Self {
        Self::FinishRound(FinishRound { timestamp })
    }

    /// Epoch milliseconds at which the event happened.
    pub const fn timestamp(&self) -> i64 {
        match self {
            Self::LocationUpdated(e) => e.timestamp,
            Self::ShotTracked(e) => e.timestamp,
            Self::NextHole(e) => e.timestamp,
            Self::PreviousHole(e) => e.timestamp,
            Self::FinishRound(e) => e.timestamp,
        }
    }

    /// The tag derived from the variant.
    pub const fn event_type(&self) -> EventType {
        match self {
            Self::LocationUpdated(_) => EventType::LocationUpdated,
            Self::ShotTracked(_) => EventType::ShotTracked,
            Self::NextHole(_) => EventType::NextHole,
            Self::PreviousHole(_) => EventType::PreviousHole,
            Self::FinishRound(_) => EventType::FinishRound,
        }
    }

    /// Hole number carried in the payload, if the variant has one.
    pub const fn hole_number(&self) -> Option<u32> {
        match self {
            Self::ShotTracked(e) => Some(e.hole_number),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tag_strings_round_trip_through_from_str() {
        for tag in EventType::ALL {
            assert_eq!(tag.as_str().parse::<EventType>().unwrap(), tag);
        }
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "HoleInOne".parse::<EventType>().unwrap_err();
        assert_eq!(err, UnknownEventType("HoleInOne".to_owned()));
    }

    #[test]
    fn event_type_is_derived_from_variant() {
        assert_eq!(
            RoundEvent::shot_tracked(5, 3).event_type(),
            EventType::ShotTracked
        );
        assert_eq!(RoundEvent::finish_round(9).event_type(), EventType::FinishRound);
        assert_eq!(RoundEvent::next_hole(1).timestamp(), 1);
    }

    #[test]
    fn only_shots_carry_a_hole_number() {
        assert_eq!(RoundEvent::shot_tracked(0, 7).hole_number(), Some(7));
        assert_eq!(RoundEvent::next_hole(0).hole_number(), None);
    }

    #[test]
    fn tagged_json_names_the_variant() {
        let json = serde_json::to_value(RoundEvent::next_hole(4500)).unwrap();
        assert_eq!(json["event_type"], "NextHole");
        assert_eq!(json["timestamp"], 4500);
    }

    #[test]
    fn navigation_tags() {
        assert!(EventType::NextHole.is_hole_navigation());
        assert!(EventType::FinishRound.is_hole_navigation());
        assert!(!EventType::ShotTracked.is_hole_navigation());
    }
}
