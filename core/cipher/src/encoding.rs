//! RFC 4648 Base32 text encoding.
//!
//! Output uses the uppercase alphabet `A-Z2-7` with `=` padding, so it is safe
//! in filenames and URLs. Decoding is strict: lowercase letters, whitespace and
//! any other byte outside the alphabet are rejected.

use data_encoding::BASE32;

use dualpass_common::{Error, Result};

/// Encode bytes as padded Base32.
pub fn encode(data: &[u8]) -> String {
    BASE32.encode(data)
}

/// Decode padded Base32 text.
///
/// # Errors
/// - Returns `Error::Encoding` for characters outside the alphabet (including
///   lowercase and whitespace), bad padding, or non-canonical trailing bits
pub fn decode(text: &str) -> Result<Vec<u8>> {
    BASE32
        .decode(text.as_bytes())
        .map_err(|e| Error::Encoding(format!("Invalid Base32 input: {}", e)))
}
