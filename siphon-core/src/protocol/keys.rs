use sha2::{Digest, Sha256};

use super::KEY_SIZE;

/// Key baked into the vendor firmware, recovered from a captured flash
/// image. Devices that were never provisioned with a cloud account encrypt
/// under this key.
pub const DEFAULT_KEY: [u8; KEY_SIZE] = *b"8c2f1a9be4d7035f";

/// Prefix the firmware mixes into per-device key derivation.
const DEVICE_KEY_SALT: &[u8] = b"airkey-v2:";

/// Where an accepted candidate key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Derived from the device identity.
    Derived,
    /// The firmware default key.
    Default,
}

/// Derive the per-device key: SHA-256 over the salt and the identity,
/// truncated to the AES-128 key length. Pure and deterministic.
pub fn derive_key(device_identity: &str) -> [u8; KEY_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(DEVICE_KEY_SALT);
    hasher.update(device_identity.as_bytes());
    let digest = hasher.finalize();

    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&digest[..KEY_SIZE]);
    key
}

/// Candidate keys in trial priority order: device-derived first, firmware
/// default last. Without an identity only the default key is a candidate.
pub fn candidate_keys(device_identity: Option<&str>) -> Vec<(KeySource, [u8; KEY_SIZE])> {
    match device_identity {
        Some(identity) => vec![
            (KeySource::Derived, derive_key(identity)),
            (KeySource::Default, DEFAULT_KEY),
        ],
        None => vec![(KeySource::Default, DEFAULT_KEY)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(derive_key("bedroom-unit"), derive_key("bedroom-unit"));
    }

    #[test]
    fn distinct_identities_derive_distinct_keys() {
        assert_ne!(derive_key("bedroom-unit"), derive_key("kitchen-unit"));
        assert_ne!(derive_key("bedroom-unit"), DEFAULT_KEY);
    }

    #[test]
    fn derived_key_is_tried_before_default() {
        let candidates = candidate_keys(Some("bedroom-unit"));
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].0, KeySource::Derived);
        assert_eq!(candidates[1].0, KeySource::Default);
        assert_eq!(candidates[1].1, DEFAULT_KEY);
    }

    #[test]
    fn missing_identity_skips_derivation() {
        let candidates = candidate_keys(None);
        assert_eq!(candidates, vec![(KeySource::Default, DEFAULT_KEY)]);
    }
}
