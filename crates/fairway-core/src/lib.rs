//! Configuration and round recording for the Fairway round tracker.
//!
//! # Modules
//!
//! - [`config`] -- `fairway-config.yaml` loading, defaults, and validation
//! - [`recorder`] -- `RoundRecorder`, which turns in-round actions into
//!   stored events and score card updates

pub mod config;
pub mod recorder;

pub use config::{
    ConfigError, DEFAULT_CONFIG_PATH, FairwayConfig, LogFormat, LoggingConfig, StorageConfig,
};
pub use recorder::{RecorderError, RoundRecorder};
