//! Integration tests for [`CoordinateValidator`].
//!
//! A recording projector stands in for the mapping SDK so the tests can
//! assert whether the projector was consulted at all.

#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

use std::cell::Cell;

use fairway_geo::{CoordinateValidator, MapProjector, ValidationError};
use fairway_types::{Coordinate, CoordinateError, ScreenPoint};

/// Identity-style projector: one degree per pixel, counting calls.
#[derive(Default)]
struct RecordingProjector {
    calls: Cell<u32>,
    screen_result: Option<ScreenPoint>,
    coordinate_result: Option<Coordinate>,
}

/// Map view handle; the tests only need something to pass through.
struct MapHandle;

impl MapProjector for RecordingProjector {
    type Handle = MapHandle;

    fn to_screen(&self, coordinate: Coordinate, _handle: &MapHandle) -> Option<ScreenPoint> {
        self.calls.set(self.calls.get() + 1);
        self.screen_result
            .or(Some(ScreenPoint::new(coordinate.longitude, coordinate.latitude)))
    }

    fn to_coordinate(&self, x: f64, y: f64, _handle: &MapHandle) -> Option<Coordinate> {
        self.calls.set(self.calls.get() + 1);
        self.coordinate_result.or(Some(Coordinate::new(y, x)))
    }
}

fn validator() -> CoordinateValidator<RecordingProjector> {
    CoordinateValidator::new(RecordingProjector::default())
}

#[test]
fn negative_x_is_rejected_without_projecting() {
    let v = validator();
    let err = v.screen_to_location(-1.0, 5.0, &MapHandle).unwrap_err();
    assert_eq!(err, ValidationError::NegativeScreenPoint { x: -1.0, y: 5.0 });
    assert_eq!(v.projector().calls.get(), 0);
}

#[test]
fn negative_y_is_rejected_without_projecting() {
    let v = validator();
    assert!(v.screen_to_location(3.0, -0.5, &MapHandle).is_err());
    assert_eq!(v.projector().calls.get(), 0);
}

#[test]
fn nan_pixels_are_rejected() {
    let v = validator();
    assert!(matches!(
        v.screen_to_location(f64::NAN, 1.0, &MapHandle),
        Err(ValidationError::NonFiniteScreenPoint { .. })
    ));
    assert_eq!(v.projector().calls.get(), 0);
}

#[test]
fn valid_screen_point_projects() {
    let v = validator();
    let coordinate = v.screen_to_location(20.0, 10.0, &MapHandle).unwrap();
    assert_eq!(coordinate, Coordinate::new(10.0, 20.0));
    assert_eq!(v.projector().calls.get(), 1);
}

#[test]
fn out_of_range_projection_is_rejected() {
    let v = CoordinateValidator::new(RecordingProjector {
        coordinate_result: Some(Coordinate::new(95.0, 0.0)),
        ..RecordingProjector::default()
    });
    let err = v.screen_to_location(1.0, 1.0, &MapHandle).unwrap_err();
    assert_eq!(
        err,
        ValidationError::ProjectedOutOfRange {
            source: CoordinateError::LatitudeOutOfRange(95.0)
        }
    );
}

#[test]
fn invalid_latitude_is_rejected_without_projecting() {
    let v = validator();
    let err = v
        .location_to_screen(Coordinate::new(91.0, 0.0), &MapHandle)
        .unwrap_err();
    assert_eq!(
        err,
        ValidationError::InvalidCoordinate {
            source: CoordinateError::LatitudeOutOfRange(91.0)
        }
    );
    assert_eq!(v.projector().calls.get(), 0);
}

#[test]
fn negative_screen_result_is_rejected() {
    let v = CoordinateValidator::new(RecordingProjector {
        screen_result: Some(ScreenPoint::new(-4.0, 12.0)),
        ..RecordingProjector::default()
    });
    assert!(matches!(
        v.location_to_screen(Coordinate::new(1.0, 1.0), &MapHandle),
        Err(ValidationError::NegativeScreenPoint { .. })
    ));
    assert_eq!(v.projector().calls.get(), 1);
}

#[test]
fn non_finite_screen_result_is_rejected() {
    for bad in [
        ScreenPoint::new(f64::NAN, 12.0),
        ScreenPoint::new(4.0, f64::INFINITY),
    ] {
        let v = CoordinateValidator::new(RecordingProjector {
            screen_result: Some(bad),
            ..RecordingProjector::default()
        });
        assert!(matches!(
            v.location_to_screen(Coordinate::new(1.0, 1.0), &MapHandle),
            Err(ValidationError::NonFiniteScreenPoint { .. })
        ));
        assert_eq!(v.projector().calls.get(), 1);
    }
}

#[test]
fn valid_coordinate_projects() {
    let v = validator();
    let point = v
        .location_to_screen(Coordinate::new(30.0, 40.0), &MapHandle)
        .unwrap();
    assert_eq!(point, ScreenPoint::new(40.0, 30.0));
}
