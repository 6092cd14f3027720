use super::error::EnvelopeError;
use super::{TIMESTAMP_TAG, VERSION_TAG};

/// Outer container of one device upload: protocol metadata up front, the
/// encrypted payload as everything that remains.
///
/// The format has no length prefix for the payload. Recognized tags are
/// consumed at most once each; the first byte that is not an unconsumed
/// known tag starts the payload. Unknown leading bytes are therefore
/// tolerated, never rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEnvelope {
    pub version: Option<u32>,
    pub timestamp_millis: Option<u64>,
    pub payload: Vec<u8>,
}

impl RawEnvelope {
    pub fn parse(bytes: &[u8]) -> Result<Self, EnvelopeError> {
        let mut cursor = 0usize;
        let mut version = None;
        let mut timestamp = None;

        while cursor < bytes.len() {
            match bytes[cursor] {
                VERSION_TAG if version.is_none() => {
                    let (value, read) = read_varint(&bytes[cursor + 1..], VERSION_TAG)?;
                    version = Some(value as u32);
                    cursor += 1 + read;
                }
                TIMESTAMP_TAG if timestamp.is_none() => {
                    let (value, read) = read_varint(&bytes[cursor + 1..], TIMESTAMP_TAG)?;
                    timestamp = Some(value);
                    cursor += 1 + read;
                }
                _ => break,
            }
        }

        Ok(Self {
            version,
            timestamp_millis: timestamp,
            payload: bytes[cursor..].to_vec(),
        })
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.payload.len() + 16);

        if let Some(version) = self.version {
            bytes.push(VERSION_TAG);
            write_varint(&mut bytes, u64::from(version));
        }
        if let Some(timestamp) = self.timestamp_millis {
            bytes.push(TIMESTAMP_TAG);
            write_varint(&mut bytes, timestamp);
        }
        bytes.extend_from_slice(&self.payload);

        bytes
    }
}

/// Read one LEB128 varint. Returns the value and the number of bytes
/// consumed. Running out of input mid-field is a hard error: the envelope
/// declared a tag it cannot back.
fn read_varint(bytes: &[u8], tag: u8) -> Result<(u64, usize), EnvelopeError> {
    let mut value = 0u64;
    let mut shift = 0u32;

    for (i, &byte) in bytes.iter().enumerate() {
        if shift >= 64 {
            return Err(EnvelopeError::VarintOverflow { tag });
        }
        value |= u64::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }

    Err(EnvelopeError::TruncatedVarint { tag })
}

fn write_varint(bytes: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            bytes.push(byte);
            break;
        }
        bytes.push(byte | 0x80);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_with_both_tags() {
        let envelope = RawEnvelope {
            version: Some(2),
            timestamp_millis: Some(1_712_345_678_901),
            payload: vec![0xAA, 0xBB, 0xCC],
        };

        let parsed = RawEnvelope::parse(&envelope.to_bytes()).unwrap();
        assert_eq!(parsed, envelope);
    }

    #[test]
    fn empty_input_yields_empty_envelope() {
        let envelope = RawEnvelope::parse(&[]).unwrap();
        assert_eq!(envelope.version, None);
        assert_eq!(envelope.timestamp_millis, None);
        assert!(envelope.payload.is_empty());
    }

    #[test]
    fn unknown_leading_byte_starts_payload() {
        let bytes = [0x7F, 0x01, 0x02];
        let envelope = RawEnvelope::parse(&bytes).unwrap();
        assert_eq!(envelope.version, None);
        assert_eq!(envelope.payload, bytes.to_vec());
    }

    #[test]
    fn payload_after_recognized_tags_is_preserved_verbatim() {
        // Payload deliberately starts with a tag byte; both tags are already
        // consumed, so it must not be re-interpreted.
        let envelope = RawEnvelope {
            version: Some(1),
            timestamp_millis: Some(42),
            payload: vec![VERSION_TAG, 0x05, 0x06],
        };

        let parsed = RawEnvelope::parse(&envelope.to_bytes()).unwrap();
        assert_eq!(parsed.payload, envelope.payload);
    }

    #[test]
    fn truncated_varint_is_an_error() {
        // Tag followed by a continuation byte with no terminator.
        let err = RawEnvelope::parse(&[VERSION_TAG, 0x80]).unwrap_err();
        assert_eq!(err, EnvelopeError::TruncatedVarint { tag: VERSION_TAG });
    }

    #[test]
    fn oversized_varint_is_an_error() {
        let mut bytes = vec![TIMESTAMP_TAG];
        bytes.extend_from_slice(&[0x80; 10]);
        bytes.push(0x01);

        let err = RawEnvelope::parse(&bytes).unwrap_err();
        assert_eq!(err, EnvelopeError::VarintOverflow { tag: TIMESTAMP_TAG });
    }

    #[test]
    fn multi_byte_varint_round_trips() {
        let envelope = RawEnvelope {
            version: Some(300),
            timestamp_millis: Some(u64::MAX),
            payload: Vec::new(),
        };

        let parsed = RawEnvelope::parse(&envelope.to_bytes()).unwrap();
        assert_eq!(parsed.version, Some(300));
        assert_eq!(parsed.timestamp_millis, Some(u64::MAX));
    }
}
