//! Size-hiding padding
//!
//! A payload is laid out as `entries || BOUNDARY || random fill`, filled out to
//! a fixed minimum so every repository file is the same size no matter how
//! many passwords it holds.

use rand::RngCore;

use crate::error::{Result, StoreError};

/// Separator between real data and random fill. Fixed for compatibility with
/// existing repository files.
pub const BOUNDARY: &[u8] = "私のホバークラフトは鰻でいっぱいです".as_bytes();

/// Default padded payload size in bytes
pub const MIN_SIZE: usize = 5_000_000;

/// Largest payload that still fits in a container of `min_size`
pub fn capacity(min_size: usize) -> usize {
    min_size.saturating_sub(BOUNDARY.len())
}

/// Pad `data` out to exactly `min_size` bytes
pub fn pad(data: &[u8], min_size: usize) -> Result<Vec<u8>> {
    let limit = capacity(min_size);
    if data.len() + BOUNDARY.len() > min_size {
        return Err(StoreError::RepositoryTooLarge {
            size: data.len(),
            limit,
        });
    }

    let fill_len = min_size - BOUNDARY.len() - data.len();

    let mut padded = Vec::with_capacity(min_size);
    padded.extend_from_slice(data);
    padded.extend_from_slice(BOUNDARY);
    padded.resize(min_size, 0);
    rand::thread_rng().fill_bytes(&mut padded[min_size - fill_len..]);

    Ok(padded)
}

/// Strip padding, keeping everything before the last boundary
pub fn unpad(padded: &[u8]) -> Result<&[u8]> {
    let at = rfind(padded, BOUNDARY).ok_or(StoreError::BoundaryNotFound)?;
    Ok(&padded[..at])
}

fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).rposition(|w| w == needle)
}
