//! Key derivation using PBKDF2-HMAC-SHA256.
//!
//! The iteration count is fixed per configuration and high enough to slow
//! brute force while staying usable interactively.

use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::keys::{DerivedKey, Salt, KEY_LENGTH};
use dualpass_common::{Error, Password, Result};

/// Iteration count used by the standard configuration.
pub const DEFAULT_ITERATIONS: u32 = 100_000;

/// Parameters for PBKDF2 key derivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Number of HMAC-SHA256 iterations.
    pub iterations: u32,
}

impl KdfParams {
    /// Create parameters with a custom iteration count.
    ///
    /// # Errors
    /// - Returns error if `iterations` is zero
    pub fn new(iterations: u32) -> Result<Self> {
        let params = Self { iterations };
        params.validate()?;
        Ok(params)
    }

    /// Parameters compatible with every ciphertext produced by the standard tool.
    pub fn standard() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
        }
    }

    /// Cheap parameters for tests and throwaway local data.
    ///
    /// Ciphertexts produced with these parameters can only be decrypted by a
    /// cipher configured with the same iteration count.
    pub fn fast() -> Self {
        Self { iterations: 1_000 }
    }

    /// Check that the parameters can be used for derivation.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::InvalidInput(
                "KDF iteration count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::standard()
    }
}

/// Derive a key from a password and salt.
///
/// # Postconditions
/// - Returns a 32-byte key
/// - The derived key is deterministic given the same inputs
///
/// # Errors
/// - Returns error if `params` is invalid
///
/// # Security
/// - Password is not stored or logged
pub fn derive_key(password: &Password, salt: &Salt, params: &KdfParams) -> Result<DerivedKey> {
    params.validate()?;

    let mut key_bytes = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(
        password.as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut key_bytes,
    );

    Ok(DerivedKey::from_bytes(key_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key_deterministic() {
        let password = Password::from("test-password-123");
        let salt = Salt::from_bytes([42u8; 16]);
        let params = KdfParams::fast();

        let key1 = derive_key(&password, &salt, &params).unwrap();
        let key2 = derive_key(&password, &salt, &params).unwrap();

        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_salt() {
        let password = Password::from("test-password-123");
        let salt1 = Salt::from_bytes([1u8; 16]);
        let salt2 = Salt::from_bytes([2u8; 16]);
        let params = KdfParams::fast();

        let key1 = derive_key(&password, &salt1, &params).unwrap();
        let key2 = derive_key(&password, &salt2, &params).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_derive_key_different_password() {
        let salt = Salt::from_bytes([42u8; 16]);
        let params = KdfParams::fast();

        let key1 = derive_key(&Password::from("password1"), &salt, &params).unwrap();
        let key2 = derive_key(&Password::from("password2"), &salt, &params).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_iteration_count_changes_key() {
        let password = Password::from("same");
        let salt = Salt::from_bytes([9u8; 16]);

        let key1 = derive_key(&password, &salt, &KdfParams::new(1).unwrap()).unwrap();
        let key2 = derive_key(&password, &salt, &KdfParams::new(2).unwrap()).unwrap();

        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_known_answer_single_iteration() {
        // PBKDF2-HMAC-SHA256, P="password", S="saltSALTsaltSALT", c=1, dkLen=32.
        let salt = Salt::from_bytes(*b"saltSALTsaltSALT");
        let params = KdfParams::new(1).unwrap();

        let key = derive_key(&Password::from("password"), &salt, &params).unwrap();
        assert_eq!(
            key.as_bytes(),
            &[
                0xf2, 0xe3, 0x4b, 0xd9, 0x50, 0xe9, 0x1c, 0xf3, 0x7d, 0x22, 0xe1, 0x13, 0x5a, 0x39,
                0x9b, 0x02, 0xa1, 0x7c, 0xb1, 0x93, 0x75, 0x54, 0xa9, 0x53, 0x19, 0x09, 0x37, 0x92,
                0x76, 0x9f, 0x89, 0x75,
            ]
        );
    }

    #[test]
    fn test_known_answer_standard_iterations() {
        let salt = Salt::from_bytes(*b"saltSALTsaltSALT");

        let key = derive_key(&Password::from("alice123"), &salt, &KdfParams::standard()).unwrap();
        assert_eq!(
            key.as_bytes(),
            &[
                0xc8, 0x1a, 0x04, 0x2f, 0x0d, 0x77, 0xbb, 0xf8, 0xac, 0xe7, 0x46, 0xd5, 0x3e, 0x4d,
                0x6c, 0x8c, 0x08, 0x6b, 0xc4, 0xd2, 0xae, 0x1f, 0x4c, 0x51, 0xb8, 0xf7, 0x5e, 0x89,
                0x9f, 0x48, 0x41, 0xfa,
            ]
        );
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(KdfParams::new(0).is_err());

        let params = KdfParams { iterations: 0 };
        let result = derive_key(&Password::from("pw"), &Salt::generate(), &params);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_default_is_standard() {
        assert_eq!(KdfParams::default().iterations, DEFAULT_ITERATIONS);
    }
}
