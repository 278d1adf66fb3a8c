//! TMS57070 memory image parsers.
//!
//! Program dumps store one 32-bit instruction word per 4 bytes, big-endian.
//! Coefficient dumps store one 24-bit word per 3 bytes, big-endian.
//! Images longer than the target bank are truncated to the bank size, the
//! way the uploader tooling writes them.

use std::fmt;

/// Bytes per program memory word.
pub const PMEM_WORD_BYTES: usize = 4;
/// Bytes per coefficient memory word.
pub const CMEM_WORD_BYTES: usize = 3;
/// Program memory bank size in words.
pub const PMEM_MAX_WORDS: usize = 512;
/// Coefficient memory bank size in words.
pub const CMEM_MAX_WORDS: usize = 512;

#[derive(Debug, PartialEq, Eq)]
pub enum ImageError {
    /// Image length is not a whole number of words.
    TruncatedWord { len: usize, word_bytes: usize },
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TruncatedWord { len, word_bytes } => write!(
                f,
                "image length {len} is not a multiple of the {word_bytes}-byte word size",
            ),
        }
    }
}

impl std::error::Error for ImageError {}

/// Parse a program memory image into instruction words.
pub fn parse_pmem(data: &[u8]) -> Result<Vec<u32>, ImageError> {
    if !data.len().is_multiple_of(PMEM_WORD_BYTES) {
        return Err(ImageError::TruncatedWord {
            len: data.len(),
            word_bytes: PMEM_WORD_BYTES,
        });
    }
    Ok(data
        .chunks_exact(PMEM_WORD_BYTES)
        .take(PMEM_MAX_WORDS)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Parse a coefficient memory image into sign-extended 24-bit words.
pub fn parse_cmem(data: &[u8]) -> Result<Vec<i32>, ImageError> {
    if !data.len().is_multiple_of(CMEM_WORD_BYTES) {
        return Err(ImageError::TruncatedWord {
            len: data.len(),
            word_bytes: CMEM_WORD_BYTES,
        });
    }
    Ok(data
        .chunks_exact(CMEM_WORD_BYTES)
        .take(CMEM_MAX_WORDS)
        .map(|b| {
            let raw = u32::from(b[0]) << 16 | u32::from(b[1]) << 8 | u32::from(b[2]);
            ((raw << 8) as i32) >> 8
        })
        .collect())
}
