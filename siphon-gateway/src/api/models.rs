use serde::Serialize;

use siphon_core::classify::{Condition, condition_message};
use siphon_core::{LatestSnapshot, SensorKind};

// Latest-reading response models

#[derive(Debug, Serialize)]
pub struct LatestResponse {
    pub upload_id: String,
    pub device_id: Option<String>,
    /// Server receive time, epoch milliseconds.
    pub received_at_ms: i64,
    pub readings: Vec<ReadingResponse>,
}

#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    pub kind: SensorKind,
    pub raw: Option<u16>,
    pub calibrated: Option<f64>,
    pub unit: String,
    pub condition: Option<Condition>,
    /// Human-readable condition text; empty when no value was decoded.
    pub message: &'static str,
    pub status: u8,
}

impl From<LatestSnapshot> for LatestResponse {
    fn from(snapshot: LatestSnapshot) -> Self {
        Self {
            upload_id: snapshot.upload_id.0.to_string(),
            device_id: snapshot.device_id.map(|s| s.to_string()),
            received_at_ms: snapshot.received_at.as_millisecond(),
            readings: snapshot
                .readings
                .into_vec()
                .into_iter()
                .map(reading_to_response)
                .collect(),
        }
    }
}

fn reading_to_response(reading: siphon_core::SensorReading) -> ReadingResponse {
    let message = match reading.condition {
        Some(condition) => condition_message(reading.kind, condition),
        None => "",
    };

    ReadingResponse {
        kind: reading.kind,
        raw: reading.raw,
        calibrated: reading.calibrated,
        unit: reading.unit.to_string(),
        condition: reading.condition,
        message,
        status: reading.status,
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use siphon_core::{SensorReading, UploadId};
    use ulid::Ulid;

    use super::*;

    #[test]
    fn response_carries_condition_messages() {
        let snapshot = LatestSnapshot {
            upload_id: UploadId(Ulid::new()),
            device_id: Some("bedroom-unit".into()),
            received_at: Timestamp::UNIX_EPOCH,
            readings: Box::new([SensorReading {
                kind: SensorKind::Temperature,
                raw: Some(7500),
                calibrated: Some(25.0),
                unit: "°C".into(),
                condition: Some(Condition::Ideal),
                status: 1,
            }]),
        };

        let response = LatestResponse::from(snapshot);
        assert_eq!(response.readings[0].message, "Temperature is comfortable");
    }

    #[test]
    fn degraded_reading_has_no_message() {
        let snapshot = LatestSnapshot {
            upload_id: UploadId(Ulid::new()),
            device_id: None,
            received_at: Timestamp::UNIX_EPOCH,
            readings: Box::new([SensorReading {
                kind: SensorKind::Humidity,
                raw: None,
                calibrated: None,
                unit: "%".into(),
                condition: None,
                status: 0,
            }]),
        };

        let response = LatestResponse::from(snapshot);
        assert_eq!(response.readings[0].message, "");
    }
}
