//! Observable state of the location tracking pipeline.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Snapshot of the tracker as seen by the UI. Ephemeral, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LocationTrackingState {
    /// `true` from a successful start until the session ends.
    pub is_tracking: bool,
    /// Result of the most recent permission check; `None` before any check.
    pub has_permission: Option<bool>,
    /// `true` while a permission request is in flight.
    pub is_requesting_permission: bool,
    /// Message of the most recent failure, cleared on the next start.
    pub last_error: Option<String>,
}
