//! Cryptographic primitives for DualPass.
//!
//! This module provides:
//! - Key derivation using PBKDF2-HMAC-SHA256
//! - Authenticated encryption using AES-256-GCM with detached tags
//! - Key, salt and nonce types with automatic zeroization of key material
//!
//! # Security Guarantees
//! - Derived keys are zeroized on drop and never logged
//! - `open` fails closed: tampering never yields partial plaintext
//! - Salts and nonces are drawn from the operating system CSPRNG

pub mod aead;
pub mod kdf;
pub mod keys;

pub use aead::{open, seal, Sealed, TAG_SIZE};
pub use kdf::{derive_key, KdfParams};
pub use keys::{DerivedKey, Nonce, Salt, KEY_LENGTH, NONCE_SIZE, SALT_SIZE};
