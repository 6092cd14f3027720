use std::collections::HashMap;

use jiff::Timestamp;
use tracing::info;
use ulid::Ulid;

use siphon_core::pipeline::{self, DecodeContext};
use siphon_core::protocol::DecodeError;
use siphon_core::{HistoryRecord, IngestAck, LatestSnapshot, UploadId};

use crate::store::ReadingStore;

/// Errors from one ingestion request.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("storage failed: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Decode one upload and persist it.
///
/// On a decode failure the store is left untouched. On a storage failure the
/// already-decoded snapshot is surfaced in the error path instead of being
/// half-written; the previous snapshot and history remain intact either way.
pub async fn ingest_upload<S: ReadingStore>(
    store: &S,
    raw: &[u8],
    device_identity: Option<&str>,
    received_at: Timestamp,
) -> Result<IngestAck, IngestError> {
    let ctx = DecodeContext {
        device_identity,
        received_at,
    };
    let decoded = pipeline::decode_upload(raw, &ctx)?;

    let upload_id = UploadId(Ulid::new());

    // Only in-domain readings contribute to history; degraded fields show up
    // as gaps when queried.
    let values: HashMap<_, _> = decoded
        .readings
        .iter()
        .filter(|r| r.status == 1)
        .filter_map(|r| r.calibrated.map(|v| (r.kind, v)))
        .collect();

    let snapshot = LatestSnapshot {
        upload_id,
        device_id: device_identity.map(Into::into),
        received_at,
        readings: decoded.readings.into_boxed_slice(),
    };
    let record = HistoryRecord {
        timestamp: received_at,
        values,
    };

    store
        .append(snapshot, record, received_at)
        .await
        .map_err(|e| IngestError::Store(Box::new(e)))?;

    info!(
        upload_id = ?upload_id,
        device_id = ?device_identity,
        mode = ?decoded.cipher_mode,
        key = ?decoded.key_source,
        "Stored decoded upload"
    );

    Ok(IngestAck {
        upload_id,
        received_at,
    })
}
