//! Platform seams consumed by the tracker.
//!
//! The tracker never talks to a device directly. Permission state,
//! location services, and permission prompts are supplied by the host
//! through these traits.

use std::future::Future;

use fairway_types::Coordinate;

/// A location fix could not be acquired.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderFailure {
    /// Human-readable cause reported by the platform.
    pub message: String,
}

impl ProviderFailure {
    /// Create a failure with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reports whether the app may read the device location.
pub trait PermissionChecker: Send + Sync + 'static {
    /// `true` if location permission is currently granted.
    fn has_location_permission(&self) -> bool;
}

/// Source of location fixes.
pub trait LocationProvider: Send + Sync + 'static {
    /// `true` if location services are turned on.
    fn is_location_enabled(&self) -> bool;

    /// Acquire the current location.
    fn current_location(&self) -> impl Future<Output = Result<Coordinate, ProviderFailure>> + Send;

    /// Release any platform subscription held for location updates.
    fn stop_updates(&self);
}

/// Prompts the user for location permission.
///
/// The prompt needs a host context (a window, an activity, a session);
/// callers pass it explicitly rather than the tracker reaching for a
/// process-wide "current" one.
pub trait PermissionRequester {
    /// Host context the prompt is shown in.
    type Context: ?Sized + Sync;

    /// Show the prompt and resolve to whether permission was granted.
    fn request_location_permission(
        &self,
        context: &Self::Context,
    ) -> impl Future<Output = bool> + Send;
}
