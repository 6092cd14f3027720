pub mod cipher;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod keys;
pub mod layout;
pub mod plausibility;

pub use cipher::{CipherMode, DecryptedPayload};
pub use envelope::RawEnvelope;
pub use error::{DecodeError, EnvelopeError};
pub use keys::KeySource;

/// Field tag introducing the firmware version varint.
pub const VERSION_TAG: u8 = 0x08;
/// Field tag introducing the device timestamp varint (epoch milliseconds).
pub const TIMESTAMP_TAG: u8 = 0x10;
/// AES-128 key length in bytes.
pub const KEY_SIZE: usize = 16;
/// AES block length in bytes. CBC payloads lead with one block of IV.
pub const BLOCK_SIZE: usize = 16;
/// Shortest plaintext that can hold all six sensor fields.
pub const MIN_PLAINTEXT_SIZE: usize = 12;
