//! Fixed-length byte buffer backing one segment.

use crate::memory::access::{validate_byte_access, validate_word_access};
use crate::{Address, IndexOutOfRange, SegmentKind};

/// Byte region whose length is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Segment {
    kind: SegmentKind,
    bytes: Box<[u8]>,
}

impl Segment {
    /// Allocates a zero-filled segment of `len` bytes.
    #[must_use]
    pub fn zeroed(kind: SegmentKind, len: usize) -> Self {
        Self {
            kind,
            bytes: vec![0; len].into_boxed_slice(),
        }
    }

    /// Wraps an existing byte image; the segment takes its exact length.
    #[must_use]
    pub fn from_bytes(kind: SegmentKind, bytes: &[u8]) -> Self {
        Self {
            kind,
            bytes: bytes.into(),
        }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` for a zero-length segment.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Read-only view of the whole segment.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Flat address one past the last byte.
    #[must_use]
    pub fn end(&self) -> u32 {
        let len = u32::try_from(self.len()).unwrap_or(u32::MAX);
        self.kind.base().saturating_add(len)
    }

    /// Reads the byte at `address.offset`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Address`] when the offset is past the end.
    pub fn byte(&self, address: Address) -> Result<u8, IndexOutOfRange> {
        let offset = validate_byte_access(address, self.len())?;
        Ok(self.bytes[offset])
    }

    /// Writes the byte at `address.offset`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Address`] when the offset is past the end.
    pub fn set_byte(&mut self, address: Address, value: u8) -> Result<(), IndexOutOfRange> {
        let offset = validate_byte_access(address, self.len())?;
        self.bytes[offset] = value;
        Ok(())
    }

    /// Reads a big-endian word starting at `address.offset`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Address`] unless all four bytes are in bounds.
    pub fn word(&self, address: Address) -> Result<u32, IndexOutOfRange> {
        let offset = validate_word_access(address, self.len())?;
        let mut raw = [0; 4];
        raw.copy_from_slice(&self.bytes[offset..offset + 4]);
        Ok(u32::from_be_bytes(raw))
    }

    /// Writes a big-endian word starting at `address.offset`.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Address`] unless all four bytes are in bounds;
    /// nothing is written in that case.
    pub fn set_word(&mut self, address: Address, value: u32) -> Result<(), IndexOutOfRange> {
        let offset = validate_word_access(address, self.len())?;
        self.bytes[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
        Ok(())
    }

    /// Copies `min(bytes.len(), self.len())` bytes from the start of `bytes`.
    pub fn load(&mut self, bytes: &[u8]) {
        let count = bytes.len().min(self.len());
        self.bytes[..count].copy_from_slice(&bytes[..count]);
    }
}
