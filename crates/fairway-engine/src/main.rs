//! Command-line binary for the Fairway round tracker.
//!
//! Opens the configured `SQLite` event log and runs one command against
//! it: list rounds, summarize a round, replay a round to stdout, or delete
//! a round.
//!
//! # Startup Sequence
//!
//! 1. Parse command-line arguments
//! 2. Load and validate configuration from `fairway-config.yaml`
//! 3. Initialize structured logging (tracing) on stderr
//! 4. Connect to `SQLite` and create tables
//! 5. Run the command, writing results to stdout
//! 6. Close the connection pool

mod cli;
mod commands;
mod error;

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use fairway_core::{FairwayConfig, LogFormat, LoggingConfig};
use fairway_db::{EventStore, ScoreCardStore, SqliteBackend, SqliteConfig};
use fairway_replay::ReplayEngine;
use fairway_types::RoundId;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::EngineError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, storage, or the command fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Parse arguments.
    let cli = Cli::parse();

    // 2. Load configuration.
    let config = FairwayConfig::load(&cli.config).map_err(EngineError::from)?;

    // 3. Initialize structured logging.
    init_tracing(&config.logging);
    info!(
        config = %cli.config.display(),
        database_url = %config.storage.database_url,
        max_connections = config.storage.max_connections,
        "fairway-engine starting"
    );

    // 4. Connect to storage.
    let sqlite = SqliteConfig::new(&config.storage.database_url)
        .with_max_connections(config.storage.max_connections);
    let backend = Arc::new(
        SqliteBackend::connect(&sqlite)
            .await
            .map_err(EngineError::from)?,
    );
    let events = EventStore::from_arc(Arc::clone(&backend));
    let scorecards = ScoreCardStore::from_arc(Arc::clone(&backend));
    let replay = ReplayEngine::with_config(events.clone(), config.replay);

    // 5. Run the command.
    let mut out = std::io::stdout().lock();
    let result = match cli.command {
        Command::Rounds => commands::list_rounds(&events, &mut out).await.map(|n| {
            info!(rounds = n, "Listed rounds");
        }),
        Command::Summary { round } => {
            commands::print_summary(&replay, &scorecards, RoundId(round), &mut out).await
        }
        Command::Replay { round, speed, mode } => {
            commands::run_replay(&replay, RoundId(round), speed, mode, &mut out)
                .await
                .map(|_| ())
        }
        Command::Delete { round } => {
            commands::delete_round(&events, &scorecards, RoundId(round), &mut out)
                .await
                .map(|_| ())
        }
    };
    out.flush().map_err(EngineError::from)?;

    // 6. Shut down.
    backend.close().await;
    result?;
    Ok(())
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match logging.format {
        LogFormat::Text => builder.compact().init(),
        LogFormat::Json => builder.json().init(),
    }
}
