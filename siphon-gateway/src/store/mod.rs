pub mod memory;
pub mod sqlite;

use std::time::Duration;

use async_trait::async_trait;
use jiff::Timestamp;
use siphon_core::{HistoryRecord, LatestSnapshot};

/// Rolling retention window for history records.
pub const RETENTION: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Storage abstraction for the decoded time series.
///
/// The store has one logical owner: implementations serialize appends
/// (including the retention prune) against reads, so a query never observes
/// a partially appended or partially pruned state.
#[async_trait]
pub trait ReadingStore: Send + Sync + 'static {
    /// Error type specific to this store implementation
    type Error: std::error::Error + Send + Sync + 'static;

    /// Replace the latest snapshot, append one history record, then prune
    /// records older than the retention window relative to `now`. All three
    /// steps succeed or fail together.
    async fn append(
        &self,
        snapshot: LatestSnapshot,
        record: HistoryRecord,
        now: Timestamp,
    ) -> Result<(), Self::Error>;

    /// Most recent successfully decoded snapshot, if any upload ever
    /// succeeded.
    async fn latest(&self) -> Result<Option<LatestSnapshot>, Self::Error>;

    /// History records at or after `cutoff`, ascending by timestamp.
    async fn history_since(&self, cutoff: Timestamp) -> Result<Vec<HistoryRecord>, Self::Error>;
}

/// Oldest history timestamp (epoch milliseconds) that survives a prune at
/// `now`. Records exactly at the edge are kept.
pub(crate) fn retention_cutoff(now: Timestamp) -> i64 {
    now.as_millisecond() - RETENTION.as_millis() as i64
}
