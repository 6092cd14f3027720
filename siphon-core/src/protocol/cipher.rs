use aes::Aes128;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};

use super::error::DecodeError;
use super::keys::{KeySource, candidate_keys};
use super::plausibility::is_plausible;
use super::{BLOCK_SIZE, KEY_SIZE};

type EcbDecryptor = ecb::Decryptor<Aes128>;
type EcbEncryptor = ecb::Encryptor<Aes128>;
type CbcDecryptor = cbc::Decryptor<Aes128>;
type CbcEncryptor = cbc::Encryptor<Aes128>;

/// Cipher modes observed on the wire, in trial priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    Ecb,
    Cbc,
}

/// One decryption hypothesis: a mode paired with a candidate key.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub mode: CipherMode,
    pub key_source: KeySource,
    pub key: [u8; KEY_SIZE],
}

/// Plaintext accepted by the candidate search, together with the hypothesis
/// that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptedPayload {
    pub mode: CipherMode,
    pub key_source: KeySource,
    pub bytes: Vec<u8>,
}

/// Build the trial sequence as one flat ordered list: modes in
/// `[Ecb, Cbc]` priority, keys in derived-then-default priority within each
/// mode. New hypotheses are appended here, never branched into the search.
pub fn candidates(device_identity: Option<&str>) -> Vec<Candidate> {
    let keys = candidate_keys(device_identity);

    let mut sequence = Vec::with_capacity(keys.len() * 2);
    for mode in [CipherMode::Ecb, CipherMode::Cbc] {
        for (key_source, key) in &keys {
            sequence.push(Candidate {
                mode,
                key_source: *key_source,
                key: *key,
            });
        }
    }
    sequence
}

/// Walk the candidate sequence and return the first plaintext the
/// plausibility check accepts. Short-circuits on the first hit; exhaustion
/// is fatal for the upload and the ciphertext is discarded.
pub fn decrypt_payload(
    payload: &[u8],
    device_identity: Option<&str>,
) -> Result<DecryptedPayload, DecodeError> {
    let sequence = candidates(device_identity);
    let attempts = sequence.len();

    for candidate in &sequence {
        let Some(bytes) = try_candidate(candidate, payload) else {
            continue;
        };
        if is_plausible(&bytes) {
            return Ok(DecryptedPayload {
                mode: candidate.mode,
                key_source: candidate.key_source,
                bytes,
            });
        }
    }

    Err(DecodeError::DecryptionExhausted { attempts })
}

/// Try one hypothesis. `None` means the attempt could not complete:
/// misaligned ciphertext, bad PKCS#7 padding, or a payload too short to
/// carry a CBC IV.
fn try_candidate(candidate: &Candidate, payload: &[u8]) -> Option<Vec<u8>> {
    match candidate.mode {
        CipherMode::Ecb => {
            if payload.is_empty() || payload.len() % BLOCK_SIZE != 0 {
                return None;
            }
            let decryptor = EcbDecryptor::new_from_slice(&candidate.key).ok()?;
            decryptor.decrypt_padded_vec_mut::<Pkcs7>(payload).ok()
        }
        CipherMode::Cbc => {
            // The device prefixes CBC payloads with one block of IV; anything
            // shorter than IV plus one ciphertext block cannot be CBC.
            if payload.len() < 2 * BLOCK_SIZE {
                return None;
            }
            let (iv, ciphertext) = payload.split_at(BLOCK_SIZE);
            if ciphertext.len() % BLOCK_SIZE != 0 {
                return None;
            }
            let decryptor = CbcDecryptor::new_from_slices(&candidate.key, iv).ok()?;
            decryptor.decrypt_padded_vec_mut::<Pkcs7>(ciphertext).ok()
        }
    }
}

/// Device-side ECB encryption. Used by the simulated feed and by tests to
/// produce wire-faithful payloads.
pub fn encrypt_ecb(key: [u8; KEY_SIZE], plaintext: &[u8]) -> Vec<u8> {
    EcbEncryptor::new(&key.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext)
}

/// Device-side CBC encryption, returning the wire form `IV || ciphertext`.
pub fn encrypt_cbc(key: [u8; KEY_SIZE], iv: [u8; BLOCK_SIZE], plaintext: &[u8]) -> Vec<u8> {
    let ciphertext =
        CbcEncryptor::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut payload = Vec::with_capacity(BLOCK_SIZE + ciphertext.len());
    payload.extend_from_slice(&iv);
    payload.extend_from_slice(&ciphertext);
    payload
}
