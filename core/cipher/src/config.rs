//! Cipher configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use dualpass_common::{Error, Result};
use dualpass_crypto::KdfParams;

/// zlib level used by the standard configuration.
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Highest zlib compression level.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Largest stream decompression may produce under the standard configuration (1 GiB).
pub const DEFAULT_MAX_OUTPUT_SIZE: usize = 1 << 30;

/// Tunable parameters of a [`crate::DualPasswordCipher`].
///
/// The KDF iteration count is not stored in the ciphertext, so encrypt and
/// decrypt sides must agree on it. The compression level only affects output
/// size. `max_output_size` bounds each decompression step on decrypt, before
/// and after authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CipherConfig {
    /// Key derivation parameters.
    pub kdf: KdfParams,
    /// zlib compression level, 0 to 9.
    pub compression_level: u32,
    /// Upper bound in bytes on any decompressed stream.
    pub max_output_size: usize,
}

impl CipherConfig {
    /// The standard configuration: 100,000 PBKDF2 iterations, zlib level 6,
    /// 1 GiB decompression ceiling.
    pub fn standard() -> Self {
        Self {
            kdf: KdfParams::standard(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_output_size: DEFAULT_MAX_OUTPUT_SIZE,
        }
    }

    /// Replace the KDF parameters.
    pub fn with_kdf(mut self, kdf: KdfParams) -> Self {
        self.kdf = kdf;
        self
    }

    /// Replace the compression level.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Replace the decompression ceiling.
    pub fn with_max_output_size(mut self, bytes: usize) -> Self {
        self.max_output_size = bytes;
        self
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<()> {
        self.kdf.validate()?;
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(Error::InvalidInput(format!(
                "Compression level must be between 0 and {}, got {}",
                MAX_COMPRESSION_LEVEL, self.compression_level
            )));
        }
        Ok(())
    }

    /// Parse a JSON configuration. Missing fields take standard values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidInput(format!("Invalid cipher config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self::standard()
    }
}
