use std::convert::Infallible;
use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use siphon_core::{HistoryRecord, LatestSnapshot};
use tokio::sync::Mutex;

use crate::store::{ReadingStore, retention_cutoff};

/// In-memory store. A single mutex covers both the snapshot slot and the
/// history log, so append+prune is atomic with respect to readers.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    latest: Option<LatestSnapshot>,
    history: Vec<HistoryRecord>,
}

#[async_trait]
impl ReadingStore for MemoryStore {
    type Error = Infallible;

    async fn append(
        &self,
        snapshot: LatestSnapshot,
        record: HistoryRecord,
        now: Timestamp,
    ) -> Result<(), Self::Error> {
        let cutoff = retention_cutoff(now);

        let mut inner = self.inner.lock().await;
        inner.latest = Some(snapshot);
        inner.history.push(record);
        inner
            .history
            .retain(|r| r.timestamp.as_millisecond() >= cutoff);

        Ok(())
    }

    async fn latest(&self) -> Result<Option<LatestSnapshot>, Self::Error> {
        let inner = self.inner.lock().await;
        Ok(inner.latest.clone())
    }

    async fn history_since(&self, cutoff: Timestamp) -> Result<Vec<HistoryRecord>, Self::Error> {
        let cutoff_ms = cutoff.as_millisecond();

        let inner = self.inner.lock().await;
        let mut records: Vec<HistoryRecord> = inner
            .history
            .iter()
            .filter(|r| r.timestamp.as_millisecond() >= cutoff_ms)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.timestamp.as_millisecond());

        Ok(records)
    }
}
