//! Integration tests against an in-memory `SQLite` database.
//!
//! Each test opens its own `sqlite::memory:` pool, so tests never share
//! state and need no external service.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use chrono::Utc;
use fairway_db::{
    DbError, EventBackend, EventRecord, EventStore, ScoreCardStore, SqliteBackend, SqliteConfig,
};
use fairway_types::{Coordinate, CourseId, EventType, PlayerId, RoundEvent, RoundId, ScoreCard};
use futures::StreamExt;

const ROUND: RoundId = RoundId(42);
const PLAYER: PlayerId = PlayerId(7);

async fn backend() -> SqliteBackend {
    SqliteBackend::connect(&SqliteConfig::in_memory())
        .await
        .unwrap()
}

#[tokio::test]
async fn events_roundtrip_in_timestamp_order() {
    let store = EventStore::new(backend().await);
    let events = [
        RoundEvent::finish_round(9000),
        RoundEvent::location_updated(1000, Coordinate::new(36.567, -121.949)),
        RoundEvent::next_hole(4500),
        RoundEvent::shot_tracked(4000, 3),
        RoundEvent::previous_hole(4500),
    ];
    for event in &events {
        store.store_event(event, ROUND, PLAYER, None).await.unwrap();
    }

    let snapshot = store.events_snapshot(ROUND).await.unwrap();
    assert_eq!(
        snapshot,
        vec![
            RoundEvent::location_updated(1000, Coordinate::new(36.567, -121.949)),
            RoundEvent::shot_tracked(4000, 3),
            RoundEvent::next_hole(4500),
            RoundEvent::previous_hole(4500),
            RoundEvent::finish_round(9000),
        ]
    );
}

#[tokio::test]
async fn filters_match_the_memory_backend() {
    let store = EventStore::new(backend().await);
    store
        .store_events(
            &[
                RoundEvent::shot_tracked(1000, 1),
                RoundEvent::next_hole(2000),
                RoundEvent::shot_tracked(3000, 2),
                RoundEvent::shot_tracked(4000, 2),
            ],
            ROUND,
            PLAYER,
            None,
        )
        .await
        .unwrap();

    let hole_two = store.events_for_hole(ROUND, 2).next().await.unwrap().unwrap();
    assert_eq!(hole_two.len(), 2);

    let navigation = store
        .events_by_type(ROUND, EventType::NextHole)
        .next()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(navigation, vec![RoundEvent::next_hole(2000)]);

    let window = store
        .events_by_time_range(ROUND, 2000, 3000)
        .next()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        window,
        vec![RoundEvent::next_hole(2000), RoundEvent::shot_tracked(3000, 2)]
    );
}

#[tokio::test]
async fn failed_batch_leaves_no_partial_rows() {
    let backend = backend().await;
    let first = EventRecord::encode(&RoundEvent::next_hole(1), ROUND, PLAYER, None).unwrap();
    backend.insert(vec![first.clone()]).await.unwrap();

    let fresh = EventRecord::encode(&RoundEvent::next_hole(2), ROUND, PLAYER, None).unwrap();
    let result = backend.insert(vec![fresh, first]).await;

    assert!(matches!(result, Err(DbError::Storage(_))));
    assert_eq!(backend.count_round(ROUND).await.unwrap(), 1);
}

#[tokio::test]
async fn delete_count_and_round_ids() {
    let store = EventStore::new(backend().await);
    store
        .store_events(
            &[RoundEvent::next_hole(1), RoundEvent::next_hole(2)],
            ROUND,
            PLAYER,
            None,
        )
        .await
        .unwrap();
    store
        .store_event(&RoundEvent::next_hole(1), RoundId(3), PLAYER, None)
        .await
        .unwrap();

    assert_eq!(store.event_count_for_round(ROUND).await.unwrap(), 2);
    assert_eq!(store.all_round_ids().await.unwrap(), vec![RoundId(3), ROUND]);

    assert_eq!(store.delete_events_for_round(ROUND).await.unwrap(), 2);
    assert_eq!(store.event_count_for_round(ROUND).await.unwrap(), 0);
    assert_eq!(store.all_round_ids().await.unwrap(), vec![RoundId(3)]);
}

#[tokio::test]
async fn scorecard_lifecycle() {
    let store = ScoreCardStore::new(backend().await);
    let card = ScoreCard::new(ROUND, PLAYER, CourseId(1), 18, Utc::now());
    store.create(&card).await.unwrap();

    let loaded = store.get(ROUND).await.unwrap().unwrap();
    assert_eq!(loaded.hole_scores.len(), 18);
    assert!(loaded.in_progress);

    let updated = store.update_hole_score(ROUND, 4, Some(5)).await.unwrap();
    assert_eq!(updated.total_strokes(), 5);
    let reloaded = store.get(ROUND).await.unwrap().unwrap();
    assert_eq!(reloaded.hole_scores.get(&4), Some(&Some(5)));
    assert_eq!(reloaded.holes_completed(), 1);

    let finished = store.finish(ROUND).await.unwrap();
    assert!(!finished.in_progress);
    assert!(!store.get(ROUND).await.unwrap().unwrap().in_progress);

    assert!(store.delete(ROUND).await.unwrap());
    assert!(store.get(ROUND).await.unwrap().is_none());
    assert!(!store.delete(ROUND).await.unwrap());
}

#[tokio::test]
async fn scorecard_errors() {
    let store = ScoreCardStore::new(backend().await);

    let missing = store.update_hole_score(ROUND, 1, Some(4)).await;
    assert!(matches!(missing, Err(DbError::NotFound(id)) if id == ROUND));

    store
        .create(&ScoreCard::new(ROUND, PLAYER, CourseId(1), 9, Utc::now()))
        .await
        .unwrap();
    let off_card = store.update_hole_score(ROUND, 10, Some(4)).await;
    assert!(matches!(off_card, Err(DbError::InvalidHole { hole: 10, .. })));
}
