//! Geodesy and coordinate validation for the Fairway round tracker.
//!
//! # Modules
//!
//! - [`geodesy`] -- Haversine distance, initial bearing, midpoint, hole camera
//! - [`projection`] -- [`MapProjector`] trait and the validating
//!   [`CoordinateValidator`] wrapper
//! - [`error`] -- [`ValidationError`]

pub mod error;
pub mod geodesy;
pub mod projection;

pub use error::ValidationError;
pub use geodesy::{
    CameraView, EARTH_RADIUS_METERS, YARDS_PER_METER, bearing_degrees, distance_meters,
    distance_yards, hole_camera, midpoint,
};
pub use projection::{CoordinateValidator, MapProjector};
