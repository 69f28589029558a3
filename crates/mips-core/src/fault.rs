use thiserror::Error;

use crate::Address;

/// Rejection kinds reported by a single [`tick`](crate::tick).
///
/// A tick that returns any of these leaves the address space untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[repr(u8)]
pub enum TickError {
    /// The program counter already reached the end of the text segment.
    #[error("program already terminated")]
    AlreadyTerminated = 0x01,
    /// No instruction format recognized the fetched word.
    #[error("unrecognized instruction word")]
    InvalidInstruction = 0x02,
    /// A fetch or operand address fell outside its segment.
    #[error("memory access out of range")]
    MemoryOutOfRange = 0x03,
    /// A sign-extended offset cannot be represented in the address arithmetic.
    #[error("offset is too small")]
    OffsetIsTooSmall = 0x04,
}

impl TickError {
    /// Converts the error to its stable numeric code (`0` is reserved for success).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Converts a stable numeric code back into an error kind.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            0x01 => Some(Self::AlreadyTerminated),
            0x02 => Some(Self::InvalidInstruction),
            0x03 => Some(Self::MemoryOutOfRange),
            0x04 => Some(Self::OffsetIsTooSmall),
            _ => None,
        }
    }

    /// Precondition violations are caller mistakes rather than program faults.
    #[must_use]
    pub const fn is_precondition(self) -> bool {
        matches!(self, Self::AlreadyTerminated)
    }
}

/// Bounds violation raised by the [`AddressSpace`](crate::AddressSpace) accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum IndexOutOfRange {
    /// Register index outside `0..=32`.
    #[error("register index {0} is outside 0..=32")]
    Register(usize),
    /// Byte or word access that does not fit its segment.
    #[error("address {0} is outside its segment")]
    Address(Address),
}

impl From<IndexOutOfRange> for TickError {
    fn from(_: IndexOutOfRange) -> Self {
        Self::MemoryOutOfRange
    }
}
