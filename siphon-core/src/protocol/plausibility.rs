use super::MIN_PLAINTEXT_SIZE;
use super::layout::SENSOR_FIELDS;

/// Heuristic acceptance test for a decryption candidate.
///
/// The wire format carries no integrity tag, so range-checking the six
/// calibrated fields against their physical domains is the only available
/// oracle. A wrong key whose output happens to land in-range on all six
/// fields is accepted — that false-positive exposure is inherent to the
/// protocol, not a defect to paper over.
pub fn is_plausible(plaintext: &[u8]) -> bool {
    if plaintext.len() < MIN_PLAINTEXT_SIZE {
        return false;
    }

    SENSOR_FIELDS.iter().all(|field| {
        field
            .read_raw(plaintext)
            .is_some_and(|raw| field.in_domain(field.transform.apply(raw)))
    })
}
