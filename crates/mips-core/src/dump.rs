//! Human-readable register and memory dumps.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::memory::{validate_word_access, AddressParseError};
use crate::{Address, AddressSpace, GENERAL_REGISTER_COUNT};

const RULE: &str = "------------------------------------";

/// Inclusive address range written as `BEGIN:END`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    /// First address dumped.
    pub start: Address,
    /// Last address whose word may be dumped.
    pub end: Address,
}

/// Rejection reasons for `BEGIN:END` literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum AddressRangeParseError {
    /// No `:` separator.
    #[error("address range must be written as BEGIN:END")]
    MissingSeparator,
    /// The part before `:` is not an address.
    #[error("invalid range start: {0}")]
    Start(AddressParseError),
    /// The part after `:` is not an address.
    #[error("invalid range end: {0}")]
    End(AddressParseError),
}

impl FromStr for AddressRange {
    type Err = AddressRangeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or(AddressRangeParseError::MissingSeparator)?;

        Ok(Self {
            start: start.parse().map_err(AddressRangeParseError::Start)?,
            end: end.parse().map_err(AddressRangeParseError::End)?,
        })
    }
}

/// Reasons a memory range cannot be dumped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DumpError {
    /// Start and end lie in different segments.
    #[error("invalid memory range: start and end are in different segments")]
    SegmentMismatch,
    /// Start is past end.
    #[error("invalid memory range: start is after end")]
    ReversedRange,
    /// A word in the range is outside its segment.
    #[error("memory range reaches {0}, outside its segment")]
    OutOfRange(Address),
}

/// Display adapter for the program counter and all general registers.
#[derive(Debug, Clone, Copy)]
pub struct RegisterDump<'a>(pub &'a AddressSpace);

impl fmt::Display for RegisterDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registers = self.0.registers();

        writeln!(f, "Current register values:")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "PC: {:#x}", registers.pc())?;
        writeln!(f, "Registers:")?;
        for index in 0..GENERAL_REGISTER_COUNT {
            let value = registers.get(index).map_err(|_| fmt::Error)?;
            writeln!(f, "R{index}: {value:#x}")?;
        }
        Ok(())
    }
}

/// Display adapter for a validated memory range.
#[derive(Debug, Clone, Copy)]
pub struct MemoryDump<'a> {
    state: &'a AddressSpace,
    range: AddressRange,
}

impl<'a> MemoryDump<'a> {
    /// Validates `range` against `state`.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError`] when the range spans segments, is reversed, or
    /// its last word does not fit in the segment.
    pub fn new(state: &'a AddressSpace, range: AddressRange) -> Result<Self, DumpError> {
        let AddressRange { start, end } = range;

        if start.segment != end.segment {
            return Err(DumpError::SegmentMismatch);
        }
        if start.offset > end.offset {
            return Err(DumpError::ReversedRange);
        }

        let last = start.offset_by((end.offset - start.offset) & !3);
        let segment_len = state.segment(start.segment).len();
        validate_word_access(last, segment_len).map_err(|_| DumpError::OutOfRange(last))?;

        Ok(Self { state, range })
    }

    fn words(&self) -> impl Iterator<Item = Address> + '_ {
        let AddressRange { start, end } = self.range;
        let next = |current: &Address| {
            current
                .offset
                .checked_add(4)
                .map(|offset| Address::new(current.segment, offset))
        };
        std::iter::successors(Some(start), next)
            .take_while(move |current| current.offset <= end.offset)
    }
}

impl fmt::Display for MemoryDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Memory content [{}..{}]:", self.range.start, self.range.end)?;
        writeln!(f, "{RULE}")?;
        for address in self.words() {
            let word = self.state.word(address).map_err(|_| fmt::Error)?;
            writeln!(f, "{address}: {word:#x}")?;
        }
        Ok(())
    }
}

/// Renders the program counter followed by `R0..R31` in hexadecimal.
#[must_use]
pub fn dump_registers(state: &AddressSpace) -> String {
    RegisterDump(state).to_string()
}

/// Renders the words at `start, start + 4, ...` up to and including `end`.
///
/// # Errors
///
/// See [`MemoryDump::new`].
pub fn dump_memory(state: &AddressSpace, range: AddressRange) -> Result<String, DumpError> {
    MemoryDump::new(state, range).map(|dump| dump.to_string())
}
