//! Dual-password encrypt and decrypt.
//!
//! Sessions are not kept: every call derives fresh keys, draws fresh salts and
//! nonces, and drops all key material before returning.

use rand::Rng;
use tracing::debug;

use crate::compress::{compress, decompress};
use crate::config::CipherConfig;
use crate::encoding::{decode, encode};
use crate::frame::{Block, Payload, MAX_BLOCK_SIZE, MIN_BLOCK_SIZE};
use crate::order::shuffle;
use dualpass_common::{Error, Password, Result, Slot};
use dualpass_crypto::{derive_key, open, seal, Nonce, Salt};

/// Data recovered by [`DualPasswordCipher::unlock`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unlocked {
    /// Slot whose block opened.
    pub slot: Slot,
    /// Decrypted data.
    pub data: Vec<u8>,
}

/// Encrypts data so either of two passwords can decrypt it.
///
/// Holds only immutable configuration; a single instance may be shared
/// between threads.
#[derive(Debug, Clone, Default)]
pub struct DualPasswordCipher {
    config: CipherConfig,
}

impl DualPasswordCipher {
    /// Create a cipher with the standard configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cipher with a custom configuration.
    ///
    /// # Errors
    /// - Returns error if the configuration is invalid
    pub fn with_config(config: CipherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Encrypt `data` for two passwords.
    ///
    /// Block order is drawn from the thread-local generator.
    ///
    /// # Postconditions
    /// - Returns padded Base32 text
    /// - Either password alone decrypts it
    pub fn encrypt(
        &self,
        password_a: impl Into<Password>,
        password_b: impl Into<Password>,
        data: &[u8],
    ) -> Result<String> {
        self.encrypt_with_rng(password_a, password_b, data, &mut rand::thread_rng())
    }

    /// Encrypt `data` for two passwords, drawing block order from `rng`.
    ///
    /// Salts and nonces always come from the OS CSPRNG regardless of `rng`.
    ///
    /// # Errors
    /// - Returns `Error::InvalidInput` if the compressed data does not fit a block
    pub fn encrypt_with_rng<R: Rng + ?Sized>(
        &self,
        password_a: impl Into<Password>,
        password_b: impl Into<Password>,
        data: &[u8],
        rng: &mut R,
    ) -> Result<String> {
        let password_a = password_a.into();
        let password_b = password_b.into();

        let inner = compress(data, self.config.compression_level)?;
        if inner.len() > MAX_BLOCK_SIZE - MIN_BLOCK_SIZE {
            return Err(Error::InvalidInput(format!(
                "Data too large: {} bytes after compression",
                inner.len()
            )));
        }

        let salt_a = Salt::generate();
        let salt_b = Salt::generate();

        let block_a = self.seal_block(Slot::A, &password_a, &salt_a, &inner)?;
        let block_b = self.seal_block(Slot::B, &password_b, &salt_b, &inner)?;

        let payload = Payload::new(salt_a, salt_b, shuffle(rng, block_a, block_b));
        let framed = payload.serialize();
        let outer = compress(&framed, self.config.compression_level)?;

        debug!(
            plaintext = data.len(),
            inner = inner.len(),
            framed = framed.len(),
            outer = outer.len(),
            "Encrypted data for two slots"
        );

        Ok(encode(&outer))
    }

    /// Decrypt `text` with either password.
    ///
    /// # Errors
    /// - Returns `Error::DecryptionFailed` for a wrong password and for any
    ///   corrupted or malformed input alike
    pub fn decrypt(&self, password: impl Into<Password>, text: &str) -> Result<Vec<u8>> {
        self.unlock(password, text).map(|unlocked| unlocked.data)
    }

    /// Decrypt `text` and report which slot the password belongs to.
    ///
    /// # Errors
    /// - Returns `Error::DecryptionFailed` exactly when [`Self::decrypt`] would
    pub fn unlock(&self, password: impl Into<Password>, text: &str) -> Result<Unlocked> {
        let password = password.into();
        self.try_unlock(&password, text).map_err(|e| {
            debug!(error = %e, "Decryption failed");
            match e {
                Error::DecryptionFailed(_) => e,
                other => Error::DecryptionFailed(other.to_string()),
            }
        })
    }

    fn try_unlock(&self, password: &Password, text: &str) -> Result<Unlocked> {
        let outer = decode(text)?;
        let framed = decompress(&outer, self.config.max_output_size)?;
        let payload = Payload::parse(&framed)?;

        debug!(blocks = payload.blocks.len(), "Parsed payload");

        for block in &payload.blocks {
            let Some(slot) = block.slot() else {
                debug!(
                    identifier = %String::from_utf8_lossy(block.identifier()),
                    "Skipping block with unknown identifier"
                );
                continue;
            };

            let key = derive_key(password, payload.salt_for(slot), &self.config.kdf)?;
            match open(&key, block.nonce(), block.ciphertext(), block.tag()) {
                Ok(inner) => {
                    debug!(slot = slot.label(), "Block opened");
                    let data = decompress(&inner, self.config.max_output_size)?;
                    return Ok(Unlocked { slot, data });
                }
                Err(Error::Authentication) => {
                    debug!(slot = slot.label(), "Block did not open");
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::DecryptionFailed(
            "no block opened with the supplied password".to_string(),
        ))
    }

    fn seal_block(
        &self,
        slot: Slot,
        password: &Password,
        salt: &Salt,
        inner: &[u8],
    ) -> Result<Block> {
        let key = derive_key(password, salt, &self.config.kdf)?;
        let nonce = Nonce::generate();
        let sealed = seal(&key, &nonce, inner)?;
        Ok(Block::new(slot, nonce, sealed))
    }
}
