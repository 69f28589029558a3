//! Bounds policy for byte and word accesses within a segment.

use crate::{Address, IndexOutOfRange};

/// Byte width of an architectural word access.
pub const WORD_ACCESS_BYTES: u32 = 4;

/// Validates a single-byte access against a segment of `segment_len` bytes.
///
/// # Errors
///
/// Returns [`IndexOutOfRange::Address`] when `address.offset >= segment_len`.
pub fn validate_byte_access(address: Address, segment_len: usize) -> Result<usize, IndexOutOfRange> {
    usize::try_from(address.offset)
        .ok()
        .filter(|&offset| offset < segment_len)
        .ok_or(IndexOutOfRange::Address(address))
}

/// Validates a 4-byte access covering `[offset, offset + 3]`.
///
/// Alignment is not required.
///
/// # Errors
///
/// Returns [`IndexOutOfRange::Address`] when any of the four bytes falls
/// outside the segment.
pub fn validate_word_access(address: Address, segment_len: usize) -> Result<usize, IndexOutOfRange> {
    usize::try_from(address.offset)
        .ok()
        .filter(|&offset| {
            offset
                .checked_add(WORD_ACCESS_BYTES as usize)
                .is_some_and(|end| end <= segment_len)
        })
        .ok_or(IndexOutOfRange::Address(address))
}
