//! Error types for location tracking.

/// Why a tracking session ended with an error.
///
/// Every variant is terminal: it is the last item a session's stream
/// yields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackingError {
    /// The user has not granted location permission.
    #[error("Location permission has not been granted")]
    PermissionDenied,

    /// Location services are turned off on the device.
    #[error("Location services are disabled")]
    LocationDisabled,

    /// The location provider failed while acquiring a fix.
    #[error("Location provider error: {0}")]
    ProviderError(String),
}
