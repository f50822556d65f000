//! Dual-password authenticated encryption.
//!
//! A message is sealed once per password into two independent blocks. Either
//! password alone recovers the data:
//!
//! ```text
//! data -> zlib -> [PBKDF2(A) -> AES-GCM] + [PBKDF2(B) -> AES-GCM]
//!      -> shuffle -> frame -> zlib -> Base32
//! ```
//!
//! Each block carries a cleartext slot identifier, so an observer of the
//! framed payload can tell which block belongs to which slot. Shuffling only
//! changes storage order.

pub mod cipher;
pub mod compress;
pub mod config;
pub mod encoding;
pub mod frame;
pub mod order;

pub use cipher::{DualPasswordCipher, Unlocked};
pub use config::CipherConfig;
pub use frame::{Block, Payload};
pub use order::BlockOrder;
