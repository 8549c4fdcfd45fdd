//! Round replay for the Fairway round tracker.
//!
//! Replays read a round's events from the [`fairway_db::EventStore`] and
//! re-emit them as a stream, either following the recorded timestamps
//! (optionally sped up) or spaced by fixed delays for the hole-navigation
//! and shot-only views.
//!
//! # Modules
//!
//! - [`engine`] -- `ReplayEngine` and its lazy, cancellable streams
//! - [`config`] -- Fixed delays for the filtered replays
//! - [`error`] -- `ReplayError`

pub mod config;
pub mod engine;
pub mod error;

pub use config::ReplayConfig;
pub use engine::{ReplayEngine, ReplayStream};
pub use error::ReplayError;
