use serde::{Deserialize, Serialize};

use crate::SensorKind;

/// Qualitative band for a calibrated sensor value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Cold,
    Ideal,
    Hot,
    Dry,
    Humid,
    Dark,
    Bright,
    Loud,
    Good,
    Fair,
    Poor,
}

/// Map a calibrated value to its qualitative band.
///
/// Ideal ranges are inclusive at both edges: 16.0 °C and 25.0 °C both
/// classify as Ideal, 25.1 °C is Hot.
pub fn classify(kind: SensorKind, value: f64) -> Condition {
    match kind {
        SensorKind::Temperature => {
            if value < 16.0 {
                Condition::Cold
            } else if value <= 25.0 {
                Condition::Ideal
            } else {
                Condition::Hot
            }
        }
        SensorKind::Humidity => {
            if value < 30.0 {
                Condition::Dry
            } else if value <= 60.0 {
                Condition::Ideal
            } else {
                Condition::Humid
            }
        }
        SensorKind::Light => {
            if value < 20.0 {
                Condition::Dark
            } else if value <= 80.0 {
                Condition::Ideal
            } else {
                Condition::Bright
            }
        }
        SensorKind::Sound => {
            if value > 60.0 {
                Condition::Loud
            } else {
                Condition::Ideal
            }
        }
        SensorKind::AirQuality => {
            if value > 60.0 {
                Condition::Poor
            } else if value >= 30.0 {
                Condition::Fair
            } else {
                Condition::Good
            }
        }
        SensorKind::Particulates => {
            if value > 50.0 {
                Condition::Poor
            } else if value >= 25.0 {
                Condition::Fair
            } else {
                Condition::Good
            }
        }
    }
}

/// Fixed user-facing message for a (sensor, band) pair. Combinations no
/// sensor produces return the empty string.
pub fn condition_message(kind: SensorKind, condition: Condition) -> &'static str {
    match (kind, condition) {
        (SensorKind::Temperature, Condition::Cold) => "Temperature is below the comfortable range",
        (SensorKind::Temperature, Condition::Ideal) => "Temperature is comfortable",
        (SensorKind::Temperature, Condition::Hot) => "Temperature is above the comfortable range",
        (SensorKind::Humidity, Condition::Dry) => "Air is too dry",
        (SensorKind::Humidity, Condition::Ideal) => "Humidity is comfortable",
        (SensorKind::Humidity, Condition::Humid) => "Air is too humid",
        (SensorKind::Light, Condition::Dark) => "Light level is low",
        (SensorKind::Light, Condition::Ideal) => "Light level is comfortable",
        (SensorKind::Light, Condition::Bright) => "Light level is high",
        (SensorKind::Sound, Condition::Ideal) => "Noise level is acceptable",
        (SensorKind::Sound, Condition::Loud) => "Noise level is high",
        (SensorKind::AirQuality, Condition::Good) => "Air quality is good",
        (SensorKind::AirQuality, Condition::Fair) => "Air quality is moderate",
        (SensorKind::AirQuality, Condition::Poor) => "Air quality is poor",
        (SensorKind::Particulates, Condition::Good) => "Particulate level is low",
        (SensorKind::Particulates, Condition::Fair) => "Particulate level is elevated",
        (SensorKind::Particulates, Condition::Poor) => "Particulate level is high",
        _ => "",
    }
}
