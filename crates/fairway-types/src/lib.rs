//! Shared type definitions for the Fairway round tracker.
//!
//! This crate is the single source of truth for the types used across the
//! workspace. Types flow downstream to `TypeScript` via `ts-rs` for the
//! UI layer that renders rounds and replays.
//!
//! # Modules
//!
//! - [`ids`] -- Integer keys for rounds, players, courses; UUID event ids
//! - [`geo`] -- `Coordinate` and `ScreenPoint`
//! - [`events`] -- `RoundEvent` and its `EventType` tag
//! - [`course`] -- Course and hole layout
//! - [`scorecard`] -- Per-hole score card
//! - [`tracking`] -- Observable location tracking state
//! - [`replay`] -- Round replay summary

pub mod course;
pub mod events;
pub mod geo;
pub mod ids;
pub mod replay;
pub mod scorecard;
pub mod tracking;

// Re-export all public types at crate root for convenience.
pub use course::{Course, Hole};
pub use events::{
    EventType, FinishRound, LocationUpdated, NextHole, PreviousHole, RoundEvent, ShotTracked,
    UnknownEventType,
};
pub use geo::{Coordinate, CoordinateError, ScreenPoint};
pub use ids::{CourseId, EventId, PlayerId, RoundId};
pub use replay::RoundReplaySummary;
pub use scorecard::{ScoreCard, ScoreCardError};
pub use tracking::LocationTrackingState;
