//! Error types for coordinate validation.

use fairway_types::CoordinateError;

/// Rejected input or output around a map projection.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// A screen point with a negative axis.
    #[error("screen point ({x}, {y}) has a negative axis")]
    NegativeScreenPoint {
        /// Horizontal pixel offset.
        x: f64,
        /// Vertical pixel offset.
        y: f64,
    },

    /// A screen point with a NaN or infinite axis.
    #[error("screen point ({x}, {y}) is not finite")]
    NonFiniteScreenPoint {
        /// Horizontal pixel offset.
        x: f64,
        /// Vertical pixel offset.
        y: f64,
    },

    /// The coordinate handed in for projection is invalid.
    #[error("invalid coordinate: {source}")]
    InvalidCoordinate {
        /// Which component was wrong.
        source: CoordinateError,
    },

    /// The projector produced a coordinate outside the valid ranges.
    #[error("projected coordinate is invalid: {source}")]
    ProjectedOutOfRange {
        /// Which component was wrong.
        source: CoordinateError,
    },

    /// The projector could not map the input (map not laid out, etc.).
    #[error("map projection returned no result")]
    ProjectionFailed,
}
