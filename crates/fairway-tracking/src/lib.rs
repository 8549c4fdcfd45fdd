//! Location tracking for the Fairway round tracker.
//!
//! [`LocationTracker`] samples a host-supplied [`LocationProvider`] on a
//! fixed interval and streams `LocationUpdated` events. Sessions are
//! cancellable through the returned stream, [`LocationTracker::stop`], or
//! a caller-supplied cancellation scope. Persisting the events is the
//! caller's job.
//!
//! # Modules
//!
//! - [`tracker`] -- Session lifecycle and sampling loop
//! - [`provider`] -- Permission and location seams implemented by the host
//! - [`config`] -- Sampling interval and buffering
//! - [`error`] -- `TrackingError`

pub mod config;
pub mod error;
pub mod provider;
pub mod tracker;

pub use config::TrackingConfig;
pub use error::TrackingError;
pub use provider::{LocationProvider, PermissionChecker, PermissionRequester, ProviderFailure};
pub use tracker::{LocationStream, LocationTracker, TrackingPhase};
