use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use jiff::Timestamp;
use tracing::{error, warn};

use siphon_core::IngestAck;

use crate::api::error::ApiError;
use crate::ingest::{IngestError, ingest_upload};
use crate::state::AppState;
use crate::store::ReadingStore;

/// Header carrying the out-of-band device identity.
pub const DEVICE_ID_HEADER: &str = "x-device-id";

/// Accept one raw device upload. The body is the device's binary envelope
/// exactly as captured off the wire.
pub async fn upload_data<S>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<IngestAck>, ApiError>
where
    S: ReadingStore + Clone,
{
    let device_identity = headers.get(DEVICE_ID_HEADER).and_then(|v| v.to_str().ok());

    match ingest_upload(&state.store, &body, device_identity, Timestamp::now()).await {
        Ok(ack) => {
            state.stats.record_accepted().await;
            Ok(Json(ack))
        }
        Err(IngestError::Decode(e)) => {
            state.stats.record_rejected().await;
            warn!(error = %e, device_id = ?device_identity, "Rejected upload");
            Err(ApiError::UndecodableUpload(e.to_string()))
        }
        Err(IngestError::Store(e)) => {
            error!(error = %e, "Failed to persist decoded upload");
            Err(ApiError::Internal("storage failure".to_string()))
        }
    }
}
