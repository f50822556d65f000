//! Authenticated encryption using AES-256-GCM.
//!
//! Tags are kept detached from the ciphertext so the framing layer can place
//! them after the ciphertext, independently of the nonce.

use aes_gcm::{
    aead::{generic_array::GenericArray, AeadInPlace, KeyInit},
    Aes256Gcm,
};

use crate::keys::{DerivedKey, Nonce};
use dualpass_common::{Error, Result};

/// Authentication tag size (16 bytes).
pub const TAG_SIZE: usize = 16;

/// Output of [`seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Encrypted bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// Detached authentication tag.
    pub tag: [u8; TAG_SIZE],
}

/// Encrypt plaintext under `key` and `nonce`.
///
/// # Preconditions
/// - `nonce` must never have been used with `key` before
///
/// # Postconditions
/// - The ciphertext length equals the plaintext length
/// - The tag authenticates the ciphertext
///
/// # Errors
/// - Returns error if the plaintext exceeds the AES-GCM length limit
pub fn seal(key: &DerivedKey, nonce: &Nonce, plaintext: &[u8]) -> Result<Sealed> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(GenericArray::from_slice(nonce.as_bytes()), b"", &mut buffer)
        .map_err(|e| Error::Crypto(format!("Encryption failed: {}", e)))?;

    let mut tag_bytes = [0u8; TAG_SIZE];
    tag_bytes.copy_from_slice(&tag);

    Ok(Sealed {
        ciphertext: buffer,
        tag: tag_bytes,
    })
}

/// Decrypt and verify ciphertext.
///
/// # Postconditions
/// - Returns the original plaintext only if the tag verifies
///
/// # Errors
/// - Returns `Error::Authentication` on wrong key, wrong nonce, or any
///   modification of ciphertext or tag
pub fn open(
    key: &DerivedKey,
    nonce: &Nonce,
    ciphertext: &[u8],
    tag: &[u8; TAG_SIZE],
) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            GenericArray::from_slice(nonce.as_bytes()),
            b"",
            &mut buffer,
            GenericArray::from_slice(tag),
        )
        .map_err(|_| Error::Authentication)?;

    Ok(buffer)
}
