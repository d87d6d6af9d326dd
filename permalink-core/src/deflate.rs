//! Raw DEFLATE compression for URL payloads.
//!
//! Streams carry no zlib/gzip header and no checksum trailer, keeping the
//! encoded token as short as possible.

use std::io::Write;

use flate2::write::DeflateEncoder;
use flate2::{Compression, Decompress, DecompressError, FlushDecompress, Status};
use thiserror::Error;
use tracing::debug;

/// Compression level used when none is configured (zlib's default).
pub const DEFAULT_LEVEL: u32 = 6;

#[derive(Error, Debug)]
pub enum CorruptStreamError {
    #[error("invalid deflate data: {0}")]
    Invalid(#[from] DecompressError),
    #[error("deflate stream ended before its final block")]
    Truncated,
}

/// Compress `data` as a raw DEFLATE stream at the default level.
pub fn compress(data: &[u8]) -> Vec<u8> {
    compress_with_level(data, DEFAULT_LEVEL)
}

/// Compress `data` as a raw DEFLATE stream. `level` is clamped to 0..=9.
pub fn compress_with_level(data: &[u8], level: u32) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder
        .write_all(data)
        .expect("writing into a Vec cannot fail");
    let compressed = encoder.finish().expect("writing into a Vec cannot fail");

    debug!(
        "deflate: {} bytes -> {} bytes",
        data.len(),
        compressed.len()
    );
    compressed
}

/// Inflate a raw DEFLATE stream.
///
/// Fails if the stream is malformed or ends before its final block. Bytes
/// following the final block are ignored.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>, CorruptStreamError> {
    let mut inflater = Decompress::new(false);
    let mut out = Vec::with_capacity(data.len().saturating_mul(4).max(64));

    loop {
        if out.len() == out.capacity() {
            out.reserve(out.capacity());
        }

        let consumed = inflater.total_in();
        let produced = inflater.total_out();
        let status =
            inflater.decompress_vec(&data[consumed as usize..], &mut out, FlushDecompress::None)?;

        if status == Status::StreamEnd {
            break;
        }

        let progressed = inflater.total_in() != consumed || inflater.total_out() != produced;
        if !progressed && out.len() < out.capacity() {
            return Err(CorruptStreamError::Truncated);
        }
    }

    debug!("inflate: {} bytes -> {} bytes", data.len(), out.len());
    Ok(out)
}
