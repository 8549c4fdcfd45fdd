//! Validation around a platform map projector.
//!
//! The projector that converts between screen pixels and geographic
//! coordinates belongs to whichever mapping SDK hosts the map view. This
//! module wraps it so that invalid inputs never reach it and invalid
//! outputs never leave it.

use fairway_types::{Coordinate, ScreenPoint};
use tracing::debug;

use crate::error::ValidationError;

/// Converts between screen space and geographic space for one map view.
///
/// `Handle` identifies the map instance (a widget reference, a camera
/// snapshot); it is passed through untouched.
pub trait MapProjector {
    /// The map instance the projection is relative to.
    type Handle: ?Sized;

    /// Project a coordinate onto the screen, or `None` if the map cannot.
    fn to_screen(&self, coordinate: Coordinate, handle: &Self::Handle) -> Option<ScreenPoint>;

    /// Unproject a screen point, or `None` if the map cannot.
    fn to_coordinate(&self, x: f64, y: f64, handle: &Self::Handle) -> Option<Coordinate>;
}

/// Validating wrapper around a [`MapProjector`].
#[derive(Debug, Clone)]
pub struct CoordinateValidator<P> {
    projector: P,
}

impl<P: MapProjector> CoordinateValidator<P> {
    /// Wrap a projector.
    pub const fn new(projector: P) -> Self {
        Self { projector }
    }

    /// Borrow the wrapped projector.
    pub const fn projector(&self) -> &P {
        &self.projector
    }

    /// Convert a screen point to a coordinate.
    ///
    /// Negative or non-finite pixels are rejected before the projector is
    /// called; a projected coordinate outside the valid ranges is rejected
    /// afterwards.
    pub fn screen_to_location(
        &self,
        x: f64,
        y: f64,
        handle: &P::Handle,
    ) -> Result<Coordinate, ValidationError> {
        check_screen_point(ScreenPoint::new(x, y))?;

        let coordinate = self
            .projector
            .to_coordinate(x, y, handle)
            .ok_or(ValidationError::ProjectionFailed)?;

        coordinate
            .validate()
            .map_err(|source| ValidationError::ProjectedOutOfRange { source })?;
        Ok(coordinate)
    }

    /// Convert a coordinate to a screen point.
    ///
    /// An invalid coordinate is rejected before the projector is called; a
    /// negative or non-finite resulting point is rejected afterwards.
    pub fn location_to_screen(
        &self,
        coordinate: Coordinate,
        handle: &P::Handle,
    ) -> Result<ScreenPoint, ValidationError> {
        coordinate
            .validate()
            .map_err(|source| ValidationError::InvalidCoordinate { source })?;

        let point = self
            .projector
            .to_screen(coordinate, handle)
            .ok_or(ValidationError::ProjectionFailed)?;

        check_screen_point(point)?;
        Ok(point)
    }
}

/// Both axes finite and non-negative.
fn check_screen_point(point: ScreenPoint) -> Result<(), ValidationError> {
    let ScreenPoint { x, y } = point;
    if !x.is_finite() || !y.is_finite() {
        debug!(x, y, "Rejected non-finite screen point");
        return Err(ValidationError::NonFiniteScreenPoint { x, y });
    }
    if point.is_negative() {
        debug!(x, y, "Rejected negative screen point");
        return Err(ValidationError::NegativeScreenPoint { x, y });
    }
    Ok(())
}
