//! Segment tags, base constants, and flat-address normalization.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Flat base address of the text (instruction) segment.
pub const TEXT_BASE: u32 = 0x0040_0000;
/// Flat base address of the data segment.
pub const DATA_BASE: u32 = 0x1000_0000;

/// Segment tag selecting one of the two byte regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum SegmentKind {
    /// Instruction segment based at [`TEXT_BASE`].
    Text,
    /// Data segment based at [`DATA_BASE`].
    Data,
}

impl SegmentKind {
    /// Returns the flat base constant for this segment.
    #[must_use]
    pub const fn base(self) -> u32 {
        match self {
            Self::Text => TEXT_BASE,
            Self::Data => DATA_BASE,
        }
    }

    /// Segment that a flat 32-bit value routes to.
    #[must_use]
    pub const fn of_flat(value: u32) -> Self {
        if value >= DATA_BASE {
            Self::Data
        } else {
            Self::Text
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Data => f.write_str("data"),
        }
    }
}

/// Canonical (segment, offset) address.
///
/// Values below [`TEXT_BASE`] normalize to huge text offsets through
/// wrapping subtraction, so they always fail the segment bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Address {
    /// Segment the offset is relative to.
    pub segment: SegmentKind,
    /// Byte offset from the segment base.
    pub offset: u32,
}

impl Address {
    /// Builds an address from its parts.
    #[must_use]
    pub const fn new(segment: SegmentKind, offset: u32) -> Self {
        Self { segment, offset }
    }

    /// Text-segment address at `offset`.
    #[must_use]
    pub const fn text(offset: u32) -> Self {
        Self::new(SegmentKind::Text, offset)
    }

    /// Data-segment address at `offset`.
    #[must_use]
    pub const fn data(offset: u32) -> Self {
        Self::new(SegmentKind::Data, offset)
    }

    /// Resolves a flat value to whichever segment its magnitude falls into.
    #[must_use]
    pub const fn from_flat(value: u32) -> Self {
        let segment = SegmentKind::of_flat(value);
        Self::new(segment, value.wrapping_sub(segment.base()))
    }

    /// Flattens back to a single 32-bit value.
    #[must_use]
    pub const fn to_flat(self) -> u32 {
        self.segment.base().wrapping_add(self.offset)
    }

    /// Same segment, offset moved forward by `delta` bytes.
    #[must_use]
    pub const fn offset_by(self, delta: u32) -> Self {
        Self::new(self.segment, self.offset.wrapping_add(delta))
    }
}

impl From<u32> for Address {
    fn from(value: u32) -> Self {
        Self::from_flat(value)
    }
}

impl From<Address> for u32 {
    fn from(address: Address) -> Self {
        address.to_flat()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.to_flat())
    }
}

/// Rejection reasons for address literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AddressParseError {
    /// Literal does not start with `0x`.
    #[error("address must start with 0x")]
    MissingPrefix,
    /// Literal has no digits or contains a non-hex character.
    #[error("address contains invalid hexadecimal digits")]
    InvalidDigits,
    /// Literal does not fit in 32 bits.
    #[error("address does not fit in 32 bits")]
    Overflow,
}

/// Parses `0x` followed by hexadecimal digits into a 32-bit value.
///
/// # Errors
///
/// Returns [`AddressParseError`] for a missing prefix, empty or non-hex
/// digits, or a value wider than 32 bits.
pub fn parse_hex_u32(literal: &str) -> Result<u32, AddressParseError> {
    let digits = literal
        .strip_prefix("0x")
        .ok_or(AddressParseError::MissingPrefix)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(AddressParseError::InvalidDigits);
    }

    u32::from_str_radix(digits, 16).map_err(|_| AddressParseError::Overflow)
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_u32(s).map(Self::from_flat)
    }
}
