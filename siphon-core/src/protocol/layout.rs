use crate::SensorKind;

/// Calibration transform applied to a raw little-endian field value.
#[derive(Debug, Clone, Copy)]
pub struct Transform {
    /// Divisor applied to the raw integer.
    pub scale: f64,
    /// Offset added after scaling.
    pub offset: f64,
}

impl Transform {
    pub const fn new(scale: f64, offset: f64) -> Self {
        Self { scale, offset }
    }

    pub fn apply(&self, raw: u16) -> f64 {
        f64::from(raw) / self.scale + self.offset
    }
}

/// One entry of the reverse-engineered payload layout.
#[derive(Debug, Clone, Copy)]
pub struct SensorField {
    pub kind: SensorKind,
    /// Byte offset of the little-endian u16 field in the plaintext.
    pub offset: usize,
    pub transform: Transform,
    /// Physical domain of the calibrated value. Doubles as the plausibility
    /// acceptance range.
    pub min: f64,
    pub max: f64,
    pub unit: &'static str,
}

impl SensorField {
    /// Raw field value, or `None` when the plaintext is too short.
    pub fn read_raw(&self, plaintext: &[u8]) -> Option<u16> {
        if plaintext.len() < self.offset + 2 {
            return None;
        }
        Some(u16::from_le_bytes([
            plaintext[self.offset],
            plaintext[self.offset + 1],
        ]))
    }

    pub fn in_domain(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// The payload layout. Field offsets were derived empirically from captured
/// traffic, not from vendor documentation; revising them means editing this
/// table only.
pub const SENSOR_FIELDS: [SensorField; 6] = [
    SensorField {
        kind: SensorKind::Temperature,
        offset: 0,
        transform: Transform::new(100.0, -50.0),
        min: -50.0,
        max: 100.0,
        unit: "°C",
    },
    SensorField {
        kind: SensorKind::Humidity,
        offset: 2,
        transform: Transform::new(100.0, 0.0),
        min: 0.0,
        max: 100.0,
        unit: "%",
    },
    SensorField {
        kind: SensorKind::Light,
        offset: 4,
        transform: Transform::new(1.0, 0.0),
        min: 0.0,
        max: 65535.0,
        unit: "lux",
    },
    SensorField {
        kind: SensorKind::Sound,
        offset: 6,
        transform: Transform::new(100.0, 0.0),
        min: 0.0,
        max: 100.0,
        unit: "dB",
    },
    SensorField {
        kind: SensorKind::AirQuality,
        offset: 8,
        transform: Transform::new(100.0, 0.0),
        min: 0.0,
        max: 500.0,
        unit: "aqi",
    },
    SensorField {
        kind: SensorKind::Particulates,
        offset: 10,
        transform: Transform::new(10.0, 0.0),
        min: 0.0,
        max: 1000.0,
        unit: "µg/m³",
    },
];
