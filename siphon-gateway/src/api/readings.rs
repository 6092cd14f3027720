use std::str::FromStr;

use axum::Json;
use axum::extract::{Path, Query, State};
use jiff::Timestamp;
use serde::Deserialize;

use siphon_core::{Scope, SensorKind};

use crate::api::error::ApiError;
use crate::api::models::LatestResponse;
use crate::query::{QueryResult, run_query};
use crate::state::{AppState, StatsSnapshot};
use crate::store::ReadingStore;

/// Current snapshot, or an explicit "no data yet" — never a default reading.
pub async fn latest<S>(State(state): State<AppState<S>>) -> Result<Json<LatestResponse>, ApiError>
where
    S: ReadingStore + Clone,
{
    match state.store.latest().await {
        Ok(Some(snapshot)) => Ok(Json(LatestResponse::from(snapshot))),
        Ok(None) => Err(ApiError::NoData),
        Err(e) => Err(ApiError::Internal(e.to_string())),
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Comma-separated sensor kinds; all six when absent.
    pub sensors: Option<String>,
}

pub async fn history<S>(
    State(state): State<AppState<S>>,
    Path(scope): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<QueryResult>, ApiError>
where
    S: ReadingStore + Clone,
{
    let scope = Scope::from_str(&scope).map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let kinds = parse_sensor_list(params.sensors.as_deref())?;

    run_query(&state.store, scope, &kinds, Timestamp::now())
        .await
        .map(Json)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

pub async fn status<S>(State(state): State<AppState<S>>) -> Json<StatsSnapshot>
where
    S: ReadingStore + Clone,
{
    Json(state.stats.snapshot().await)
}

fn parse_sensor_list(sensors: Option<&str>) -> Result<Vec<SensorKind>, ApiError> {
    let Some(list) = sensors else {
        return Ok(SensorKind::ALL.to_vec());
    };

    let mut kinds = Vec::new();
    for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind = SensorKind::from_str(name).map_err(|e| ApiError::BadRequest(e.to_string()))?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }

    if kinds.is_empty() {
        Ok(SensorKind::ALL.to_vec())
    } else {
        Ok(kinds)
    }
}
