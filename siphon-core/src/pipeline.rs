use jiff::Timestamp;

use crate::SensorReading;
use crate::protocol::cipher::{self, CipherMode, DecryptedPayload};
use crate::protocol::envelope::RawEnvelope;
use crate::protocol::error::DecodeError;
use crate::protocol::extract::extract;
use crate::protocol::keys::KeySource;

/// Per-request decode context. Everything the pipeline needs travels here,
/// so concurrent uploads share no mutable state.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    /// Out-of-band device identity, when the transport carries one.
    pub device_identity: Option<&'a str>,
    /// Server receive time for the upload.
    pub received_at: Timestamp,
}

/// Result of one successful decode.
#[derive(Debug, Clone)]
pub struct DecodedUpload {
    pub envelope_version: Option<u32>,
    pub device_timestamp_millis: Option<u64>,
    pub cipher_mode: CipherMode,
    pub key_source: KeySource,
    pub received_at: Timestamp,
    pub readings: Vec<SensorReading>,
}

/// Run the full ingestion decode: envelope → candidate decryption (gated by
/// the plausibility validator) → field extraction and classification.
///
/// A failure at any stage aborts the upload; nothing is ever stored from a
/// failed decode. Per-field extraction degradation is represented in-band on
/// the readings, not as an error.
pub fn decode_upload(raw: &[u8], ctx: &DecodeContext<'_>) -> Result<DecodedUpload, DecodeError> {
    let envelope = RawEnvelope::parse(raw)?;

    let DecryptedPayload {
        mode,
        key_source,
        bytes,
    } = cipher::decrypt_payload(&envelope.payload, ctx.device_identity)?;

    let readings = extract(&bytes);

    Ok(DecodedUpload {
        envelope_version: envelope.version,
        device_timestamp_millis: envelope.timestamp_millis,
        cipher_mode: mode,
        key_source,
        received_at: ctx.received_at,
        readings,
    })
}
