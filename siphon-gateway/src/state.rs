use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::Mutex;

/// Shared state for the HTTP surface: the store plus ingest counters.
#[derive(Clone)]
pub struct AppState<S> {
    pub store: S,
    pub stats: IngestStats,
}

/// Counters for accepted and rejected uploads.
#[derive(Clone)]
pub struct IngestStats {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    accepted: u64,
    rejected: u64,
    startup_time: Instant,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StatsSnapshot {
    pub accepted: u64,
    pub rejected: u64,
    pub uptime_secs: u64,
}

impl IngestStats {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                accepted: 0,
                rejected: 0,
                startup_time: Instant::now(),
            })),
        }
    }

    pub async fn record_accepted(&self) {
        let mut inner = self.inner.lock().await;
        inner.accepted += 1;
    }

    pub async fn record_rejected(&self) {
        let mut inner = self.inner.lock().await;
        inner.rejected += 1;
    }

    pub async fn snapshot(&self) -> StatsSnapshot {
        let inner = self.inner.lock().await;
        StatsSnapshot {
            accepted: inner.accepted,
            rejected: inner.rejected,
            uptime_secs: inner.startup_time.elapsed().as_secs(),
        }
    }
}

impl Default for IngestStats {
    fn default() -> Self {
        Self::new()
    }
}
