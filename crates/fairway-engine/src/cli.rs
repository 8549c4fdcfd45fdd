//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fairway_core::DEFAULT_CONFIG_PATH;

/// Inspect, replay, and prune recorded rounds.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the stored rounds.
#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// List every recorded round with its event count
    Rounds,

    /// Print a round's replay summary and score card as JSON
    Summary {
        /// Round to summarize
        #[arg(short, long)]
        round: i64,
    },

    /// Replay a round to stdout, one JSON event per line
    Replay {
        /// Round to replay
        #[arg(short, long)]
        round: i64,

        /// Speed multiplier for full replays (2.0 plays twice as fast)
        #[arg(short, long)]
        speed: Option<f64>,

        /// Which events to replay
        #[arg(short, long, default_value_t, value_enum)]
        mode: ReplayMode,
    },

    /// Delete a round's events and score card
    Delete {
        /// Round to delete
        #[arg(short, long)]
        round: i64,
    },
}

/// Which slice of a round to replay.
#[derive(clap::ValueEnum, Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum ReplayMode {
    /// Every event, paced by recorded timestamps.
    #[default]
    Full,
    /// Hole navigation only, evenly spaced.
    Holes,
    /// Shots only, evenly spaced.
    Shots,
}
