use std::collections::HashMap;

use jiff::Timestamp;
use serde::Serialize;
use siphon_core::{Scope, SensorKind};

use crate::store::ReadingStore;

/// Shaped result of a scoped history query: one timestamp axis plus one
/// equal-length series per requested sensor, `null` for gaps.
#[derive(Debug, Clone, Serialize)]
pub struct QueryResult {
    pub scope: &'static str,
    /// Nominal sampling interval of the scope, in seconds. Metadata only;
    /// the series is not resampled.
    pub interval_secs: u64,
    /// Epoch milliseconds, ascending.
    pub timestamps: Vec<i64>,
    pub series: HashMap<SensorKind, Vec<Option<f64>>>,
}

/// Answer a scoped query from stored history. Read-only: no store state is
/// mutated, and absence of data yields empty arrays rather than synthesized
/// values.
pub async fn run_query<S: ReadingStore>(
    store: &S,
    scope: Scope,
    kinds: &[SensorKind],
    now: Timestamp,
) -> Result<QueryResult, S::Error> {
    let cutoff_ms = now.as_millisecond() - scope.lookback().as_millis() as i64;
    let cutoff = Timestamp::from_millisecond(cutoff_ms).unwrap_or(Timestamp::MIN);

    let records = store.history_since(cutoff).await?;

    let mut timestamps = Vec::with_capacity(records.len());
    let mut series: HashMap<SensorKind, Vec<Option<f64>>> = kinds
        .iter()
        .map(|kind| (*kind, Vec::with_capacity(records.len())))
        .collect();

    for record in &records {
        timestamps.push(record.timestamp.as_millisecond());
        for kind in kinds {
            if let Some(values) = series.get_mut(kind) {
                values.push(record.values.get(kind).copied());
            }
        }
    }

    Ok(QueryResult {
        scope: scope.as_str(),
        interval_secs: scope.nominal_interval().as_secs(),
        timestamps,
        series,
    })
}
