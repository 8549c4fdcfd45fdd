//! Configuration loading and typed config structures for the Fairway round tracker.
//!
//! The configuration lives in `fairway-config.yaml`. Every field has a
//! default, so a partial file (or no file at all) is valid. Sections for
//! tracking and replay reuse the config types of the crates they drive.

use std::path::Path;

use fairway_replay::ReplayConfig;
use fairway_tracking::TrackingConfig;
use serde::Deserialize;

/// Default location of the configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "fairway-config.yaml";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Which value is wrong and why.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration. Mirrors the structure of `fairway-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FairwayConfig {
    /// Event and score card storage.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Location tracking cadence.
    #[serde(default)]
    pub tracking: TrackingConfig,

    /// Fixed delays for filtered replays.
    #[serde(default)]
    pub replay: ReplayConfig,

    /// Log level and output format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FairwayConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `DATABASE_URL` overrides `storage.database_url` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.storage.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides
    /// are applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Load from `path` if it exists, otherwise use defaults, then
    /// validate.
    ///
    /// # Errors
    ///
    /// Returns any read, parse, or validation error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::info!(path = %path.display(), "Config file not found, using defaults");
            let mut config = Self::default();
            config.storage.apply_env_overrides();
            config
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot work.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage.database_url.trim().is_empty() {
            return Err(invalid("storage.database_url must not be empty"));
        }
        if self.storage.max_connections == 0 {
            return Err(invalid("storage.max_connections must be at least 1"));
        }
        if self.tracking.interval_ms == 0 {
            return Err(invalid("tracking.interval_ms must be at least 1"));
        }
        if self.tracking.channel_capacity == 0 {
            return Err(invalid("tracking.channel_capacity must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

/// Storage connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// `SQLite` connection URL.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl StorageConfig {
    /// Override the database URL with `DATABASE_URL` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DATABASE_URL") {
            self.database_url = val;
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://fairway.db".to_owned()
}

const fn default_max_connections() -> u32 {
    5
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = FairwayConfig::default();
        assert_eq!(config.storage.database_url, "sqlite://fairway.db");
        assert_eq!(config.storage.max_connections, 5);
        assert_eq!(config.tracking.interval_ms, 5000);
        assert_eq!(config.tracking.channel_capacity, 16);
        assert_eq!(config.replay.hole_navigation_delay_ms, 1000);
        assert_eq!(config.replay.shot_tracking_delay_ms, 500);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
storage:
  database_url: "sqlite://rounds.db"
  max_connections: 2

tracking:
  interval_ms: 2000
  channel_capacity: 4

replay:
  hole_navigation_delay_ms: 750
  shot_tracking_delay_ms: 250

logging:
  level: debug
  format: json
"#;
        let config = FairwayConfig::parse(yaml).unwrap();

        assert_eq!(config.storage.database_url, "sqlite://rounds.db");
        assert_eq!(config.storage.max_connections, 2);
        assert_eq!(config.tracking.interval_ms, 2000);
        assert_eq!(config.tracking.channel_capacity, 4);
        assert_eq!(config.replay.hole_navigation_delay_ms, 750);
        assert_eq!(config.replay.shot_tracking_delay_ms, 250);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = FairwayConfig::parse("tracking:\n  interval_ms: 1000\n").unwrap();

        // Interval is overridden
        assert_eq!(config.tracking.interval_ms, 1000);
        // Everything else uses defaults
        assert_eq!(config.tracking.channel_capacity, 16);
        assert_eq!(config.storage, StorageConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(FairwayConfig::parse("").unwrap(), FairwayConfig::default());
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let result = FairwayConfig::parse("logging:\n  format: xml\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn zero_interval_is_invalid() {
        let config = FairwayConfig::parse("tracking:\n  interval_ms: 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let config = FairwayConfig::parse("tracking:\n  channel_capacity: 0\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = FairwayConfig::from_file(Path::new("/nonexistent/fairway-config.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join(DEFAULT_CONFIG_PATH);
        if path.exists() {
            let config = FairwayConfig::load(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
