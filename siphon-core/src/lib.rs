use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

pub mod classify;
pub mod pipeline;
pub mod protocol;

use classify::Condition;

// We use `Box<str>` and `Box<[T]>` for structures that don't need to be
// dynamically sized. This helps us keep allocations compact and avoid
// accidental cloning of large values.
type BoxStr = Box<str>;
type BoxList<T> = Box<[T]>;

/// Unique identifier for one accepted upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UploadId(pub Ulid);

/// The six quantities carried in every device payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    Temperature,
    Humidity,
    Light,
    Sound,
    AirQuality,
    Particulates,
}

impl SensorKind {
    /// All kinds in payload field order.
    pub const ALL: [SensorKind; 6] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::Light,
        SensorKind::Sound,
        SensorKind::AirQuality,
        SensorKind::Particulates,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "temperature",
            SensorKind::Humidity => "humidity",
            SensorKind::Light => "light",
            SensorKind::Sound => "sound",
            SensorKind::AirQuality => "air_quality",
            SensorKind::Particulates => "particulates",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sensor kind: {0}")]
pub struct UnknownSensorKind(pub BoxStr);

impl std::str::FromStr for SensorKind {
    type Err = UnknownSensorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "temperature" => Ok(SensorKind::Temperature),
            "humidity" => Ok(SensorKind::Humidity),
            "light" => Ok(SensorKind::Light),
            "sound" => Ok(SensorKind::Sound),
            "air_quality" => Ok(SensorKind::AirQuality),
            "particulates" => Ok(SensorKind::Particulates),
            other => Err(UnknownSensorKind(other.into())),
        }
    }
}

/// A single calibrated sensor value decoded from one upload.
///
/// Created fresh per ingestion and never mutated, only superseded by the
/// next snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub kind: SensorKind,
    /// Raw little-endian field value; absent when the plaintext was too
    /// short to carry this field.
    pub raw: Option<u16>,
    /// Calibrated physical value, rounded to one decimal place.
    pub calibrated: Option<f64>,
    pub unit: BoxStr,
    pub condition: Option<Condition>,
    /// 1 when the calibrated value falls inside the sensor's physical
    /// domain, 0 otherwise.
    pub status: u8,
}

/// The most recent full set of readings. Single slot, overwritten atomically
/// on each successful ingestion — a failed decode never touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestSnapshot {
    pub upload_id: UploadId,
    /// Out-of-band device identity, when the transport carried one.
    pub device_id: Option<BoxStr>,
    pub received_at: jiff::Timestamp,
    pub readings: BoxList<SensorReading>,
}

/// One history entry: calibrated values of the readings that were in-domain
/// at ingestion time. Sensors that degraded are simply absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub timestamp: jiff::Timestamp,
    pub values: HashMap<SensorKind, f64>,
}

/// Acknowledgement returned for one accepted upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestAck {
    pub upload_id: UploadId,
    pub received_at: jiff::Timestamp,
}

/// Named historical query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Last day, nominally one sample per five minutes.
    Day5Minute,
    /// Last week, nominally one sample per hour.
    Week1Hour,
    /// Last three hours, nominally one sample per five minutes.
    Last3h5Minute,
}

impl Scope {
    pub const ALL: [Scope; 3] = [Scope::Day5Minute, Scope::Week1Hour, Scope::Last3h5Minute];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Day5Minute => "day-5-minute",
            Scope::Week1Hour => "week-1-hour",
            Scope::Last3h5Minute => "last-3h-5-minute",
        }
    }

    /// Lookback window covered by this scope.
    pub fn lookback(&self) -> Duration {
        match self {
            Scope::Day5Minute => Duration::from_secs(24 * 60 * 60),
            Scope::Week1Hour => Duration::from_secs(7 * 24 * 60 * 60),
            Scope::Last3h5Minute => Duration::from_secs(3 * 60 * 60),
        }
    }

    /// Nominal sampling interval. Metadata only — stored history is never
    /// resampled to it.
    pub fn nominal_interval(&self) -> Duration {
        match self {
            Scope::Day5Minute | Scope::Last3h5Minute => Duration::from_secs(5 * 60),
            Scope::Week1Hour => Duration::from_secs(60 * 60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown history scope: {0}")]
pub struct InvalidScope(pub BoxStr);

impl std::str::FromStr for Scope {
    type Err = InvalidScope;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day-5-minute" => Ok(Scope::Day5Minute),
            "week-1-hour" => Ok(Scope::Week1Hour),
            "last-3h-5-minute" => Ok(Scope::Last3h5Minute),
            other => Err(InvalidScope(other.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn scope_names_round_trip() {
        for scope in Scope::ALL {
            assert_eq!(Scope::from_str(scope.as_str()), Ok(scope));
        }
    }

    #[test]
    fn unknown_scope_is_rejected() {
        let err = Scope::from_str("month-1-day").unwrap_err();
        assert_eq!(err.0.as_ref(), "month-1-day");
    }

    #[test]
    fn sensor_kind_names_round_trip() {
        for kind in SensorKind::ALL {
            assert_eq!(SensorKind::from_str(kind.as_str()), Ok(kind));
        }
        assert!(SensorKind::from_str("pressure").is_err());
    }
}
