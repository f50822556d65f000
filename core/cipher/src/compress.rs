//! zlib compression, applied to the plaintext and to the framed payload.

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};
use std::io::Write;

use dualpass_common::{Error, Result};

/// Compress bytes into a zlib stream at `level` (0 to 9).
pub fn compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(
        Vec::with_capacity(data.len() / 2 + 16),
        Compression::new(level),
    );
    encoder
        .write_all(data)
        .map_err(|e| Error::Compression(format!("Compression failed: {}", e)))?;
    encoder
        .finish()
        .map_err(|e| Error::Compression(format!("Compression failed: {}", e)))
}

/// Decompress a zlib stream that inflates to at most `max_output` bytes.
///
/// The stream must be complete: input that ends before the final deflate
/// block and the Adler-32 trailer is rejected rather than returned partially.
///
/// # Errors
/// - Returns `Error::Compression` on a malformed or truncated stream,
///   including an Adler-32 checksum mismatch
/// - Returns `Error::Compression` once the output grows past `max_output`
pub fn decompress(data: &[u8], max_output: usize) -> Result<Vec<u8>> {
    let mut inflater = Decompress::new(true);
    // One byte of headroom lets a stream of exactly `max_output` bytes finish.
    let ceiling = max_output.saturating_add(1);
    let mut out = Vec::with_capacity(data.len().saturating_mul(2).max(64).min(ceiling));

    loop {
        let in_before = inflater.total_in();
        let out_before = inflater.total_out();

        let status = inflater
            .decompress_vec(&data[in_before as usize..], &mut out, FlushDecompress::None)
            .map_err(|e| Error::Compression(format!("Decompression failed: {}", e)))?;

        if out.len() > max_output {
            return Err(Error::Compression(format!(
                "Decompression failed: output exceeds {} bytes",
                max_output
            )));
        }

        match status {
            Status::StreamEnd => return Ok(out),
            _ if out.len() == out.capacity() => {
                out.reserve_exact(out.capacity().min(ceiling - out.len()));
            }
            _ if inflater.total_in() == in_before && inflater.total_out() == out_before => {
                return Err(Error::Compression(
                    "Decompression failed: truncated stream".to_string(),
                ));
            }
            _ => {}
        }
    }
}
