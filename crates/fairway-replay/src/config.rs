//! Replay pacing configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Fixed delays used by the filtered replays.
///
/// Full replays follow the recorded timestamps; the hole-navigation and
/// shot-only replays space their emissions evenly instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayConfig {
    /// Delay between hole navigation events, in milliseconds.
    #[serde(default = "default_hole_navigation_delay_ms")]
    pub hole_navigation_delay_ms: u64,

    /// Delay between shot events, in milliseconds.
    #[serde(default = "default_shot_tracking_delay_ms")]
    pub shot_tracking_delay_ms: u64,
}

const fn default_hole_navigation_delay_ms() -> u64 {
    1000
}

const fn default_shot_tracking_delay_ms() -> u64 {
    500
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            hole_navigation_delay_ms: default_hole_navigation_delay_ms(),
            shot_tracking_delay_ms: default_shot_tracking_delay_ms(),
        }
    }
}

impl ReplayConfig {
    /// Delay between hole navigation events.
    pub const fn hole_navigation_delay(&self) -> Duration {
        Duration::from_millis(self.hole_navigation_delay_ms)
    }

    /// Delay between shot events.
    pub const fn shot_tracking_delay(&self) -> Duration {
        Duration::from_millis(self.shot_tracking_delay_ms)
    }
}
