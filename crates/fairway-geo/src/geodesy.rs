//! Spherical-Earth geodesy over [`Coordinate`] values.
//!
//! All functions are pure and deterministic. Distances use the haversine
//! formula on a sphere of radius [`EARTH_RADIUS_METERS`]; bearings use the
//! standard two-argument arctangent formula for the initial great-circle
//! heading.

use fairway_types::Coordinate;
use serde::{Deserialize, Serialize};

/// Mean Earth radius used for all distance calculations.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Yards per meter.
pub const YARDS_PER_METER: f64 = 1.09361;

/// Great-circle distance between two coordinates in meters.
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let half_chord = (lat_a.cos() * lat_b.cos())
        .mul_add((d_lon / 2.0).sin().powi(2), (d_lat / 2.0).sin().powi(2));
    let angle = 2.0 * half_chord.sqrt().atan2((1.0 - half_chord).sqrt());

    EARTH_RADIUS_METERS * angle
}

/// Great-circle distance between two coordinates in yards.
///
/// `distance_yards(a, a)` is zero and the result is symmetric in `a`, `b`.
pub fn distance_yards(a: Coordinate, b: Coordinate) -> f64 {
    distance_meters(a, b) * YARDS_PER_METER
}

/// Initial compass bearing from `a` to `b` in degrees, in `[0, 360)`.
///
/// 0 is north, 90 east. Identical points yield 0.
pub fn bearing_degrees(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let y = d_lon.sin() * lat_b.cos();
    // Fused multiply-add would leave a signed residue for identical points.
    #[allow(clippy::suboptimal_flops)]
    let x = lat_a.cos() * lat_b.sin() - lat_a.sin() * lat_b.cos() * d_lon.cos();

    let degrees = y.atan2(x).to_degrees().rem_euclid(360.0);
    // rem_euclid of a tiny negative angle rounds up to exactly 360.0
    if degrees >= 360.0 { 0.0 } else { degrees }
}

/// Component-wise mean of two coordinates.
///
/// This is a flat approximation, not the geodesic midpoint. It is accurate
/// at golf-hole scale and must not be used for spans beyond a few
/// kilometers or across the antimeridian.
pub const fn midpoint(a: Coordinate, b: Coordinate) -> Coordinate {
    Coordinate::new(
        (a.latitude + b.latitude) / 2.0,
        (a.longitude + b.longitude) / 2.0,
    )
}

/// How a map camera frames a hole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    /// Point the camera centers on (midpoint of tee and flag).
    pub target: Coordinate,
    /// Camera heading so the hole plays "up" the screen.
    pub bearing_degrees: f64,
    /// Tee-to-flag length in yards, used by the renderer to pick a zoom.
    pub span_yards: f64,
}

/// Camera orientation that frames a hole from tee to flag.
pub fn hole_camera(tee: Coordinate, flag: Coordinate) -> CameraView {
    CameraView {
        target: midpoint(tee, flag),
        bearing_degrees: bearing_degrees(tee, flag),
        span_yards: distance_yards(tee, flag),
    }
}
