use std::path::Path;

use async_trait::async_trait;
use jiff::Timestamp;
use siphon_core::{HistoryRecord, LatestSnapshot};
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::store::{ReadingStore, retention_cutoff};

/// SQLite-backed store. The snapshot lives in a single-row table and history
/// records are JSON blobs keyed by timestamp; append and prune share one
/// transaction so a failed write leaves the prior state intact.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

/// Error type for SqliteStore
#[derive(Debug, thiserror::Error)]
pub enum SqliteStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("record serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SqliteStore {
    /// Opens or creates a SQLite database at the given path.
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, SqliteStoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        Self::init_schema(&pool).await?;

        Ok(Self { pool })
    }

    async fn init_schema(pool: &SqlitePool) -> Result<(), SqliteStoreError> {
        sqlx::raw_sql(
            r#"
            CREATE TABLE IF NOT EXISTS latest_snapshot (
                slot INTEGER PRIMARY KEY CHECK (slot = 0),
                snapshot_json TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS history (
                timestamp_ms INTEGER NOT NULL,
                record_json TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_history_timestamp
            ON history(timestamp_ms);
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ReadingStore for SqliteStore {
    type Error = SqliteStoreError;

    async fn append(
        &self,
        snapshot: LatestSnapshot,
        record: HistoryRecord,
        now: Timestamp,
    ) -> Result<(), Self::Error> {
        let snapshot_json = serde_json::to_string(&snapshot)?;
        let record_json = serde_json::to_string(&record)?;
        let timestamp_ms = record.timestamp.as_millisecond();
        let cutoff = retention_cutoff(now);

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO latest_snapshot (slot, snapshot_json) VALUES (0, ?) \
             ON CONFLICT(slot) DO UPDATE SET snapshot_json = excluded.snapshot_json",
        )
        .bind(&snapshot_json)
        .execute(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO history (timestamp_ms, record_json) VALUES (?, ?)")
            .bind(timestamp_ms)
            .bind(&record_json)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM history WHERE timestamp_ms < ?")
            .bind(cutoff)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn latest(&self) -> Result<Option<LatestSnapshot>, Self::Error> {
        let row = sqlx::query("SELECT snapshot_json FROM latest_snapshot WHERE slot = 0")
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let json: String = row.get(0);
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn history_since(&self, cutoff: Timestamp) -> Result<Vec<HistoryRecord>, Self::Error> {
        let rows = sqlx::query(
            "SELECT record_json FROM history WHERE timestamp_ms >= ? ORDER BY timestamp_ms ASC",
        )
        .bind(cutoff.as_millisecond())
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            let json: String = row.get(0);
            records.push(serde_json::from_str(&json)?);
        }

        Ok(records)
    }
}
