//! Geographic and screen-space value types.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Smallest valid latitude in degrees.
pub const MIN_LATITUDE: f64 = -90.0;
/// Largest valid latitude in degrees.
pub const MAX_LATITUDE: f64 = 90.0;
/// Smallest valid longitude in degrees.
pub const MIN_LONGITUDE: f64 = -180.0;
/// Largest valid longitude in degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Reasons a coordinate pair is not a valid position on Earth.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CoordinateError {
    /// One of the components is NaN or infinite.
    #[error("coordinate components must be finite (lat {latitude}, lon {longitude})")]
    NonFinite {
        /// The latitude as supplied.
        latitude: f64,
        /// The longitude as supplied.
        longitude: f64,
    },

    /// Latitude outside `[-90, 90]`.
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside `[-180, 180]`.
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A latitude/longitude pair in decimal degrees (WGS84).
///
/// `Coordinate::new` does not validate, so values read from untrusted
/// sources (platform providers, map projectors) should go through
/// [`Coordinate::validate`] or [`Coordinate::try_new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub latitude: f64,
    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without range checks.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting out-of-range or non-finite components.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        let coordinate = Self::new(latitude, longitude);
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Check both components against their valid ranges.
    pub fn validate(self) -> Result<(), CoordinateError> {
        if !self.latitude.is_finite() || !self.longitude.is_finite() {
            return Err(CoordinateError::NonFinite {
                latitude: self.latitude,
                longitude: self.longitude,
            });
        }
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&self.latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(self.latitude));
        }
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&self.longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(self.longitude));
        }
        Ok(())
    }

    /// Whether both components are finite and in range.
    pub fn is_valid(self) -> bool {
        self.validate().is_ok()
    }
}

/// A point in screen pixel space, origin at the top-left of the map view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ScreenPoint {
    /// Horizontal offset in pixels.
    pub x: f64,
    /// Vertical offset in pixels.
    pub y: f64,
}

impl ScreenPoint {
    /// Create a screen point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Whether either axis is negative (off the top or left edge).
    pub const fn is_negative(self) -> bool {
        self.x < 0.0 || self.y < 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_range_boundaries() {
        assert!(Coordinate::try_new(90.0, 180.0).is_ok());
        assert!(Coordinate::try_new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(matches!(
            Coordinate::try_new(91.0, 0.0),
            Err(CoordinateError::LatitudeOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(matches!(
            Coordinate::new(0.0, -180.5).validate(),
            Err(CoordinateError::LongitudeOutOfRange(_))
        ));
    }

    #[test]
    fn rejects_nan() {
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn negative_screen_point() {
        assert!(ScreenPoint::new(-1.0, 5.0).is_negative());
        assert!(ScreenPoint::new(5.0, -0.5).is_negative());
        assert!(!ScreenPoint::new(0.0, 0.0).is_negative());
    }
}
