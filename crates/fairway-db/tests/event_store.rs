//! Integration tests for [`EventStore`] over the in-memory backend.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]

use std::sync::Arc;
use std::time::Duration;

use fairway_db::{DbError, EventBackend, EventRecord, EventStore, MemoryBackend};
use fairway_types::{Coordinate, EventType, PlayerId, RoundEvent, RoundId};
use futures::StreamExt;

const ROUND: RoundId = RoundId(42);
const PLAYER: PlayerId = PlayerId(7);

fn store() -> EventStore<MemoryBackend> {
    EventStore::new(MemoryBackend::new())
}

fn sample_round() -> Vec<RoundEvent> {
    vec![
        RoundEvent::location_updated(1000, Coordinate::new(36.56, -121.95)),
        RoundEvent::shot_tracked(4000, 3),
        RoundEvent::next_hole(4500),
        RoundEvent::finish_round(9000),
    ]
}

fn is_sorted(events: &[RoundEvent]) -> bool {
    events.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp())
}

#[tokio::test]
async fn snapshot_is_ordered_regardless_of_insert_order() {
    let store = store();
    for event in sample_round().into_iter().rev() {
        store.store_event(&event, ROUND, PLAYER, None).await.unwrap();
    }

    let snapshot = store.events_snapshot(ROUND).await.unwrap();
    assert_eq!(snapshot, sample_round());
    assert!(is_sorted(&snapshot));
}

#[tokio::test]
async fn same_millisecond_events_do_not_collide() {
    let store = store();
    let a = store
        .store_event(&RoundEvent::shot_tracked(5000, 1), ROUND, PLAYER, None)
        .await
        .unwrap();
    let b = store
        .store_event(&RoundEvent::next_hole(5000), ROUND, PLAYER, None)
        .await
        .unwrap();

    assert_ne!(a, b);
    let snapshot = store.events_snapshot(ROUND).await.unwrap();
    assert_eq!(
        snapshot,
        vec![RoundEvent::shot_tracked(5000, 1), RoundEvent::next_hole(5000)]
    );
}

#[tokio::test]
async fn batch_store_and_count() {
    let store = store();
    let ids = store
        .store_events(&sample_round(), ROUND, PLAYER, None)
        .await
        .unwrap();
    assert_eq!(ids.len(), 4);
    assert_eq!(store.event_count_for_round(ROUND).await.unwrap(), 4);

    let empty = store.store_events(&[], ROUND, PLAYER, None).await.unwrap();
    assert!(empty.is_empty());
    assert_eq!(store.event_count_for_round(ROUND).await.unwrap(), 4);
}

#[tokio::test]
async fn filtered_queries() {
    let store = store();
    store
        .store_events(&sample_round(), ROUND, PLAYER, None)
        .await
        .unwrap();
    store
        .store_event(&RoundEvent::shot_tracked(6000, 4), ROUND, PLAYER, None)
        .await
        .unwrap();

    let hole_three = store.events_for_hole(ROUND, 3).next().await.unwrap().unwrap();
    assert_eq!(hole_three, vec![RoundEvent::shot_tracked(4000, 3)]);

    let shots = store
        .events_by_type(ROUND, EventType::ShotTracked)
        .next()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        shots,
        vec![RoundEvent::shot_tracked(4000, 3), RoundEvent::shot_tracked(6000, 4)]
    );

    let window = store
        .events_by_time_range(ROUND, 4000, 6000)
        .next()
        .await
        .unwrap()
        .unwrap();
    assert_eq!(window.len(), 3);
    assert!(is_sorted(&window));
}

#[tokio::test]
async fn live_query_re_emits_after_append() {
    let store = store();
    let mut live = store.events_for_round(ROUND);

    assert!(live.next().await.unwrap().unwrap().is_empty());

    store
        .store_event(&RoundEvent::next_hole(100), ROUND, PLAYER, None)
        .await
        .unwrap();
    assert_eq!(live.next().await.unwrap().unwrap().len(), 1);

    store
        .store_event(&RoundEvent::previous_hole(50), ROUND, PLAYER, None)
        .await
        .unwrap();
    let latest = live.next().await.unwrap().unwrap();
    assert_eq!(
        latest,
        vec![RoundEvent::previous_hole(50), RoundEvent::next_hole(100)]
    );
}

#[tokio::test]
async fn live_query_ignores_other_rounds() {
    let store = store();
    let mut live = store.events_for_round(ROUND);
    assert!(live.next().await.unwrap().unwrap().is_empty());

    store
        .store_event(&RoundEvent::next_hole(100), RoundId(99), PLAYER, None)
        .await
        .unwrap();

    let pending = tokio::time::timeout(Duration::from_millis(50), live.next()).await;
    assert!(pending.is_err(), "no emission expected for another round");
}

#[tokio::test]
async fn live_query_sees_writes_from_another_store_on_the_same_backend() {
    let backend = Arc::new(MemoryBackend::new());
    let reader = EventStore::from_arc(Arc::clone(&backend));
    let writer = EventStore::from_arc(backend);

    let mut live = reader.events_for_round(ROUND);
    assert!(live.next().await.unwrap().unwrap().is_empty());

    writer
        .store_event(&RoundEvent::next_hole(10), ROUND, PLAYER, None)
        .await
        .unwrap();
    let latest = tokio::time::timeout(Duration::from_millis(200), live.next())
        .await
        .expect("live query should re-emit after a write through the other store")
        .unwrap()
        .unwrap();
    assert_eq!(latest, vec![RoundEvent::next_hole(10)]);

    writer.delete_events_for_round(ROUND).await.unwrap();
    let latest = tokio::time::timeout(Duration::from_millis(200), live.next())
        .await
        .expect("live query should re-emit after a delete through the other store")
        .unwrap()
        .unwrap();
    assert!(latest.is_empty());
}

#[tokio::test]
async fn live_query_ends_when_store_is_dropped() {
    let store = store();
    let mut live = store.events_for_round(ROUND);
    assert!(live.next().await.unwrap().is_ok());
    drop(store);
    assert!(live.next().await.is_none());
}

#[tokio::test]
async fn live_query_outlives_one_of_two_stores() {
    let backend = Arc::new(MemoryBackend::new());
    let first = EventStore::from_arc(Arc::clone(&backend));
    let second = EventStore::from_arc(backend);

    let mut live = first.events_for_round(ROUND);
    assert!(live.next().await.unwrap().is_ok());
    drop(first);

    second
        .store_event(&RoundEvent::finish_round(20), ROUND, PLAYER, None)
        .await
        .unwrap();
    assert_eq!(live.next().await.unwrap().unwrap().len(), 1);

    drop(second);
    assert!(live.next().await.is_none());
}

#[tokio::test]
async fn unknown_stored_tag_surfaces_as_error() {
    let store = store();
    let mut record =
        EventRecord::encode(&RoundEvent::next_hole(1), ROUND, PLAYER, None).unwrap();
    record.event_type = "Eagle".to_owned();
    store.backend().insert(vec![record]).await.unwrap();

    let result = store.events_snapshot(ROUND).await;
    assert!(matches!(result, Err(DbError::UnknownEventType(tag)) if tag == "Eagle"));

    let mut live = store.events_for_round(ROUND);
    assert!(matches!(live.next().await, Some(Err(DbError::UnknownEventType(_)))));
    assert!(live.next().await.is_none(), "error terminates the live query");
}

#[tokio::test]
async fn delete_and_round_ids() {
    let store = store();
    store
        .store_events(&sample_round(), ROUND, PLAYER, None)
        .await
        .unwrap();
    store
        .store_event(&RoundEvent::next_hole(1), RoundId(1), PLAYER, None)
        .await
        .unwrap();

    assert_eq!(store.all_round_ids().await.unwrap(), vec![RoundId(1), ROUND]);
    assert_eq!(store.delete_events_for_round(ROUND).await.unwrap(), 4);
    assert_eq!(store.event_count_for_round(ROUND).await.unwrap(), 0);
    assert_eq!(store.all_round_ids().await.unwrap(), vec![RoundId(1)]);
}

#[tokio::test]
async fn concurrent_writers_keep_ordering() {
    let store = store();
    let mut handles = Vec::new();
    for i in 0..50_i64 {
        let writer = store.clone();
        handles.push(tokio::spawn(async move {
            let timestamp = (i * 37) % 50 * 10;
            let event = if i % 2 == 0 {
                RoundEvent::location_updated(timestamp, Coordinate::new(1.0, 1.0))
            } else {
                RoundEvent::shot_tracked(timestamp, 1)
            };
            writer.store_event(&event, ROUND, PLAYER, None).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let snapshot = store.events_snapshot(ROUND).await.unwrap();
    assert_eq!(snapshot.len(), 50);
    assert!(is_sorted(&snapshot));
}
