//! Tracking session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Sampling cadence and buffering for tracking sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingConfig {
    /// Milliseconds between location samples.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Samples buffered for a slow consumer before the session waits.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

const fn default_interval_ms() -> u64 {
    5000
}

const fn default_channel_capacity() -> usize {
    16
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl TrackingConfig {
    /// Time between samples.
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = TrackingConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(5));
        assert_eq!(config.channel_capacity, 16);
    }

    #[test]
    fn empty_yaml_is_default() {
        let config: TrackingConfig = serde_yml::from_str("{}").unwrap();
        assert_eq!(config, TrackingConfig::default());
    }
}
