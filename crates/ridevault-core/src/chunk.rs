//! Transfer chunk-size planning.
//!
//! Pure policy table mapping file size to chunk size: small files get small
//! chunks for a fast first byte, huge files get large chunks to keep the
//! request count down. Thresholds are tunable but chunk size must stay
//! monotonically non-decreasing in file size.

use crate::constants::MAX_PART_COUNT;
use crate::error::AppError;

/// Files below this get the small chunk size.
pub const SMALL_FILE_THRESHOLD: u64 = 50 * 1024 * 1024;
/// Files above this get the large chunk size.
pub const LARGE_FILE_THRESHOLD: u64 = 1024 * 1024 * 1024;

pub const SMALL_CHUNK_SIZE: u64 = 1024 * 1024;
pub const DEFAULT_CHUNK_SIZE: u64 = 5 * 1024 * 1024;
pub const LARGE_CHUNK_SIZE: u64 = 10 * 1024 * 1024;

/// Pick the transfer chunk size for a file of the given size.
pub fn plan_chunk_size(file_size: u64) -> u64 {
    if file_size < SMALL_FILE_THRESHOLD {
        SMALL_CHUNK_SIZE
    } else if file_size > LARGE_FILE_THRESHOLD {
        LARGE_CHUNK_SIZE
    } else {
        DEFAULT_CHUNK_SIZE
    }
}

/// Number of parts needed to transfer `file_size` bytes in `chunk_size` chunks.
///
/// Fails when the resulting part count exceeds the per-upload ceiling, which
/// cannot happen for sizes the validator accepts but guards against policy
/// drift between the size bound and the chunk table.
pub fn part_count(file_size: u64, chunk_size: u64) -> Result<u32, AppError> {
    if chunk_size == 0 {
        return Err(AppError::Internal("chunk size must be non-zero".to_string()));
    }
    let count = file_size.div_ceil(chunk_size);
    if count > MAX_PART_COUNT as u64 {
        return Err(AppError::InvalidInput(format!(
            "Upload would require {} parts; maximum is {}",
            count, MAX_PART_COUNT
        )));
    }
    Ok(count.max(1) as u32)
}
