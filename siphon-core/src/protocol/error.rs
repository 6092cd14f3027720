/// Errors from parsing the outer tagged container.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    #[error("truncated varint after tag {tag:#04x}")]
    TruncatedVarint { tag: u8 },

    #[error("varint after tag {tag:#04x} exceeds 64 bits")]
    VarintOverflow { tag: u8 },
}

/// Errors that abort one ingestion. A failed decode leaves every store
/// untouched; the ciphertext is never persisted or guessed at.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("envelope decode failed: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("no cipher mode and key candidate produced a plausible payload ({attempts} attempts)")]
    DecryptionExhausted { attempts: usize },
}
