//! Common error types for DualPass.

use thiserror::Error;

/// Top-level error type for DualPass operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Key derivation or cipher setup failed.
    #[error("Cryptographic error: {0}")]
    Crypto(String),

    /// AEAD verification failed for a block/key pair.
    #[error("Authentication failed")]
    Authentication,

    /// Malformed compressed stream.
    #[error("Compression error: {0}")]
    Compression(String),

    /// Truncated or inconsistent framing.
    #[error("Framing error: {0}")]
    Framing(String),

    /// Invalid text alphabet or padding.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Decryption did not recover any data.
    ///
    /// Every failure inside the decrypt pipeline is folded into this variant so
    /// callers cannot tell a wrong password apart from corrupted input. The
    /// message is diagnostic only.
    #[error("Decryption failed. Invalid password or corrupted data. Reason: {0}")]
    DecryptionFailed(String),

    /// Invalid input or configuration provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error is the folded decryption failure.
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Error::DecryptionFailed(_))
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
