use crate::SensorReading;
use crate::classify::classify;

use super::layout::SENSOR_FIELDS;

/// Decode all six sensor fields from an accepted plaintext.
///
/// Extraction degrades per field: a plaintext too short for a field yields
/// that reading with no value and `status = 0` instead of failing the whole
/// upload. A value outside its physical domain keeps the value but is marked
/// `status = 0`.
pub fn extract(plaintext: &[u8]) -> Vec<SensorReading> {
    SENSOR_FIELDS
        .iter()
        .map(|field| match field.read_raw(plaintext) {
            Some(raw) => {
                let calibrated = round_one_decimal(field.transform.apply(raw));
                SensorReading {
                    kind: field.kind,
                    raw: Some(raw),
                    calibrated: Some(calibrated),
                    unit: field.unit.into(),
                    condition: Some(classify(field.kind, calibrated)),
                    status: u8::from(field.in_domain(calibrated)),
                }
            }
            None => SensorReading {
                kind: field.kind,
                raw: None,
                calibrated: None,
                unit: field.unit.into(),
                condition: None,
                status: 0,
            },
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use crate::SensorKind;
    use crate::classify::Condition;

    use super::*;

    fn plaintext(fields: [u16; 6]) -> Vec<u8> {
        fields.iter().flat_map(|f| f.to_le_bytes()).collect()
    }

    #[test]
    fn extracts_six_calibrated_readings() {
        let readings = extract(&plaintext([7500, 4500, 50, 3000, 2000, 100]));

        assert_eq!(readings.len(), 6);
        let calibrated: Vec<f64> = readings.iter().map(|r| r.calibrated.unwrap()).collect();
        assert_eq!(calibrated, vec![25.0, 45.0, 50.0, 30.0, 20.0, 10.0]);
        assert!(readings.iter().all(|r| r.status == 1));

        let conditions: Vec<Condition> = readings.iter().map(|r| r.condition.unwrap()).collect();
        assert_eq!(
            conditions,
            vec![
                Condition::Ideal,
                Condition::Ideal,
                Condition::Ideal,
                Condition::Ideal,
                Condition::Good,
                Condition::Good,
            ]
        );
    }

    #[test]
    fn calibrated_values_are_rounded_to_one_decimal() {
        // Humidity raw 4567 calibrates to 45.67, which rounds to 45.7.
        let readings = extract(&plaintext([7500, 4567, 50, 3000, 2000, 100]));
        assert_eq!(readings[1].calibrated, Some(45.7));
    }

    #[test]
    fn short_plaintext_degrades_per_field() {
        // Eight bytes: the first four fields decode, sound's field is
        // present, air quality and particulates are missing.
        let full = plaintext([7500, 4500, 50, 3000, 2000, 100]);
        let readings = extract(&full[..8]);

        assert_eq!(readings[0].status, 1);
        assert_eq!(readings[3].status, 1);
        for reading in &readings[4..] {
            assert_eq!(reading.status, 0);
            assert_eq!(reading.calibrated, None);
            assert_eq!(reading.condition, None);
        }
    }

    #[test]
    fn out_of_domain_value_keeps_the_value_with_zero_status() {
        // Temperature raw 20000 calibrates to 150 °C.
        let readings = extract(&plaintext([20000, 4500, 50, 3000, 2000, 100]));

        assert_eq!(readings[0].kind, SensorKind::Temperature);
        assert_eq!(readings[0].calibrated, Some(150.0));
        assert_eq!(readings[0].status, 0);
        assert_eq!(readings[0].condition, Some(Condition::Hot));
    }

    #[test]
    fn units_match_the_layout() {
        let readings = extract(&plaintext([7500, 4500, 50, 3000, 2000, 100]));
        let units: Vec<&str> = readings.iter().map(|r| r.unit.as_ref()).collect();
        assert_eq!(units, vec!["°C", "%", "lux", "dB", "aqi", "µg/m³"]);
    }
}
