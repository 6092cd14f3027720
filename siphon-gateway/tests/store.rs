use std::collections::HashMap;

use jiff::Timestamp;
use siphon_core::{HistoryRecord, LatestSnapshot, SensorKind, UploadId};
use siphon_gateway::store::ReadingStore;
use siphon_gateway::store::memory::MemoryStore;
use siphon_gateway::store::sqlite::{SqliteStore, SqliteStoreError};
use tempfile::NamedTempFile;
use ulid::Ulid;

const HOUR_MS: i64 = 60 * 60 * 1000;
const DAY_MS: i64 = 24 * HOUR_MS;

fn shifted(base: Timestamp, offset_ms: i64) -> Timestamp {
    Timestamp::from_millisecond(base.as_millisecond() + offset_ms).unwrap()
}

fn dummy_snapshot(received_at: Timestamp) -> LatestSnapshot {
    LatestSnapshot {
        upload_id: UploadId(Ulid::new()),
        device_id: Some("bedroom-unit".into()),
        received_at,
        readings: Box::new([]),
    }
}

fn dummy_record(timestamp: Timestamp, temperature: f64) -> HistoryRecord {
    let mut values = HashMap::new();
    values.insert(SensorKind::Temperature, temperature);
    HistoryRecord { timestamp, values }
}

// Memory store tests

#[tokio::test]
async fn memory_latest_lifecycle() {
    let store = MemoryStore::default();
    let now = Timestamp::now();

    assert_eq!(store.latest().await.unwrap(), None);

    let first = dummy_snapshot(now);
    store
        .append(first.clone(), dummy_record(now, 21.0), now)
        .await
        .unwrap();
    assert_eq!(store.latest().await.unwrap(), Some(first));

    let second = dummy_snapshot(shifted(now, 1000));
    store
        .append(
            second.clone(),
            dummy_record(shifted(now, 1000), 22.0),
            shifted(now, 1000),
        )
        .await
        .unwrap();
    assert_eq!(store.latest().await.unwrap(), Some(second));
}

#[tokio::test]
async fn memory_prune_keeps_fresh_records() {
    let store = MemoryStore::default();
    let now = Timestamp::now();

    store
        .append(dummy_snapshot(now), dummy_record(now, 21.0), now)
        .await
        .unwrap();

    let history = store.history_since(Timestamp::UNIX_EPOCH).await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn memory_prune_drops_expired_records() {
    let store = MemoryStore::default();
    let now = Timestamp::now();

    // A record eight days old never survives an append-triggered prune.
    let stale = shifted(now, -8 * DAY_MS);
    store
        .append(dummy_snapshot(stale), dummy_record(stale, 20.0), now)
        .await
        .unwrap();
    assert!(
        store
            .history_since(Timestamp::UNIX_EPOCH)
            .await
            .unwrap()
            .is_empty()
    );

    // A record exactly at the retention edge is kept.
    let edge = shifted(now, -7 * DAY_MS);
    store
        .append(dummy_snapshot(edge), dummy_record(edge, 20.5), now)
        .await
        .unwrap();
    assert_eq!(
        store
            .history_since(Timestamp::UNIX_EPOCH)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn memory_history_reads_in_time_order() {
    let store = MemoryStore::default();
    let now = Timestamp::now();

    for offset in [-2 * HOUR_MS, -3 * HOUR_MS, -1 * HOUR_MS] {
        let at = shifted(now, offset);
        store
            .append(dummy_snapshot(at), dummy_record(at, 21.0), now)
            .await
            .unwrap();
    }

    let history = store.history_since(Timestamp::UNIX_EPOCH).await.unwrap();
    let timestamps: Vec<i64> = history.iter().map(|r| r.timestamp.as_millisecond()).collect();
    let mut sorted = timestamps.clone();
    sorted.sort_unstable();
    assert_eq!(timestamps, sorted);
}

#[tokio::test]
async fn memory_history_since_filters_by_cutoff() {
    let store = MemoryStore::default();
    let now = Timestamp::now();

    for offset in [-4 * HOUR_MS, -1 * HOUR_MS] {
        let at = shifted(now, offset);
        store
            .append(dummy_snapshot(at), dummy_record(at, 21.0), now)
            .await
            .unwrap();
    }

    let history = store.history_since(shifted(now, -3 * HOUR_MS)).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(
        history[0].timestamp.as_millisecond(),
        shifted(now, -1 * HOUR_MS).as_millisecond()
    );
}

// SQLite store tests

#[tokio::test]
async fn sqlite_latest_lifecycle() -> Result<(), SqliteStoreError> {
    let temp_file = NamedTempFile::new().unwrap();
    let store = SqliteStore::new(temp_file.path()).await?;
    let now = Timestamp::now();

    assert_eq!(store.latest().await?, None);

    let snapshot = dummy_snapshot(now);
    store
        .append(snapshot.clone(), dummy_record(now, 21.0), now)
        .await?;
    assert_eq!(store.latest().await?, Some(snapshot));

    Ok(())
}

#[tokio::test]
async fn sqlite_snapshot_survives_reopen() -> Result<(), SqliteStoreError> {
    let temp_file = NamedTempFile::new().unwrap();
    let now = Timestamp::now();
    let snapshot = dummy_snapshot(now);

    {
        let store = SqliteStore::new(temp_file.path()).await?;
        store
            .append(snapshot.clone(), dummy_record(now, 21.0), now)
            .await?;
    }

    let reopened = SqliteStore::new(temp_file.path()).await?;
    assert_eq!(reopened.latest().await?, Some(snapshot));
    assert_eq!(reopened.history_since(Timestamp::UNIX_EPOCH).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn sqlite_prune_drops_expired_records() -> Result<(), SqliteStoreError> {
    let temp_file = NamedTempFile::new().unwrap();
    let store = SqliteStore::new(temp_file.path()).await?;
    let now = Timestamp::now();

    let stale = shifted(now, -8 * DAY_MS);
    store
        .append(dummy_snapshot(stale), dummy_record(stale, 20.0), now)
        .await?;
    assert!(store.history_since(Timestamp::UNIX_EPOCH).await?.is_empty());

    store
        .append(dummy_snapshot(now), dummy_record(now, 21.0), now)
        .await?;
    assert_eq!(store.history_since(Timestamp::UNIX_EPOCH).await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn sqlite_history_reads_in_time_order() -> Result<(), SqliteStoreError> {
    let temp_file = NamedTempFile::new().unwrap();
    let store = SqliteStore::new(temp_file.path()).await?;
    let now = Timestamp::now();

    for offset in [-2 * HOUR_MS, -3 * HOUR_MS, -1 * HOUR_MS] {
        let at = shifted(now, offset);
        store
            .append(dummy_snapshot(at), dummy_record(at, 21.0), now)
            .await?;
    }

    let history = store.history_since(Timestamp::UNIX_EPOCH).await?;
    let timestamps: Vec<i64> = history.iter().map(|r| r.timestamp.as_millisecond()).collect();
    let mut sorted = timestamps.clone();
    sorted.sort_unstable();
    assert_eq!(timestamps, sorted);

    Ok(())
}
