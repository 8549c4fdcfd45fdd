//! Command implementations.
//!
//! Each command writes its output to the given writer so it can be run
//! against any backend and checked in tests.

use std::io::Write;

use fairway_db::{EventBackend, EventStore, ScoreCardBackend, ScoreCardStore};
use fairway_replay::{ReplayEngine, ReplayStream};
use fairway_types::RoundId;
use futures::StreamExt;
use tracing::{info, warn};

use crate::cli::ReplayMode;
use crate::error::EngineError;

/// Print every round id with its event count, one per line.
pub async fn list_rounds<B: EventBackend>(
    store: &EventStore<B>,
    out: &mut impl Write,
) -> Result<usize, EngineError> {
    let round_ids = store.all_round_ids().await?;
    for round_id in &round_ids {
        let count = store.event_count_for_round(*round_id).await?;
        writeln!(out, "{round_id}\t{count} events")?;
    }
    Ok(round_ids.len())
}

/// Print a round's replay summary, and its score card when one exists.
pub async fn print_summary<B: EventBackend + ScoreCardBackend>(
    replay: &ReplayEngine<B>,
    scorecards: &ScoreCardStore<B>,
    round_id: RoundId,
    out: &mut impl Write,
) -> Result<(), EngineError> {
    let summary = replay.round_replay_summary(round_id).await?;
    writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;

    if let Some(card) = scorecards.get(round_id).await? {
        writeln!(out, "{}", serde_json::to_string_pretty(&card)?)?;
    }
    Ok(())
}

/// Replay a round, writing each event as a JSON line as it is emitted.
///
/// Returns the number of events written.
pub async fn run_replay<B: EventBackend>(
    replay: &ReplayEngine<B>,
    round_id: RoundId,
    speed: Option<f64>,
    mode: ReplayMode,
    out: &mut impl Write,
) -> Result<u64, EngineError> {
    let mut stream: ReplayStream = match (mode, speed) {
        (ReplayMode::Full, None) => replay.replay_round(round_id),
        (ReplayMode::Full, Some(multiplier)) => {
            replay.replay_round_with_speed(round_id, multiplier)?
        }
        (ReplayMode::Holes, _) => replay.replay_hole_navigation(round_id),
        (ReplayMode::Shots, _) => replay.replay_shot_tracking(round_id),
    };
    if speed.is_some() && mode != ReplayMode::Full {
        warn!(?mode, "Speed only applies to full replays; using fixed delays");
    }

    let mut written: u64 = 0;
    while let Some(item) = stream.next().await {
        let event = item?;
        writeln!(out, "{}", serde_json::to_string(&event)?)?;
        out.flush()?;
        written = written.saturating_add(1);
    }

    info!(%round_id, ?mode, events = written, "Replay complete");
    Ok(written)
}

/// Delete a round's events and score card.
pub async fn delete_round<B: EventBackend + ScoreCardBackend>(
    events: &EventStore<B>,
    scorecards: &ScoreCardStore<B>,
    round_id: RoundId,
    out: &mut impl Write,
) -> Result<u64, EngineError> {
    let removed = events.delete_events_for_round(round_id).await?;
    let had_card = scorecards.delete(round_id).await?;
    writeln!(
        out,
        "Deleted {removed} events{} for round {round_id}",
        if had_card { " and the score card" } else { "" }
    )?;
    Ok(removed)
}
