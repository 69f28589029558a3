//! Complete emulated machine state: register file plus both segments.

use crate::memory::segment::Segment;
use crate::state::{Register, RegisterFile, RunState};
use crate::{Address, IndexOutOfRange, SegmentKind, TEXT_BASE};

/// Register file and the two memory segments of one emulated run.
///
/// Segment sizes are fixed when the space is built. Every accessor is
/// bounds-checked and reports [`IndexOutOfRange`] instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct AddressSpace {
    registers: RegisterFile,
    text: Segment,
    data: Segment,
}

impl AddressSpace {
    /// Builds a space whose segments are copies of `text` and `data`.
    ///
    /// All registers start at zero and the program counter points at the
    /// first byte of the text segment.
    #[must_use]
    pub fn new(text: &[u8], data: &[u8]) -> Self {
        let mut registers = RegisterFile::default();
        registers.set_pc(TEXT_BASE);

        Self {
            registers,
            text: Segment::from_bytes(SegmentKind::Text, text),
            data: Segment::from_bytes(SegmentKind::Data, data),
        }
    }

    /// Builds a zero-filled space with the given segment sizes.
    #[must_use]
    pub fn with_sizes(text_size: usize, data_size: usize) -> Self {
        let mut registers = RegisterFile::default();
        registers.set_pc(TEXT_BASE);

        Self {
            registers,
            text: Segment::zeroed(SegmentKind::Text, text_size),
            data: Segment::zeroed(SegmentKind::Data, data_size),
        }
    }

    /// Read-only view of the register file.
    #[must_use]
    pub const fn registers(&self) -> &RegisterFile {
        &self.registers
    }

    /// Reads register slot `index` (`32` is the program counter).
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Register`] when `index > 32`.
    pub fn register(&self, index: usize) -> Result<u32, IndexOutOfRange> {
        self.registers.get(index)
    }

    /// Writes register slot `index`; writing slot 0 is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Register`] when `index > 32`.
    pub fn set_register(&mut self, index: usize, value: u32) -> Result<(), IndexOutOfRange> {
        self.registers.set(index, value)
    }

    /// Reads a decoded general-purpose register.
    #[must_use]
    pub const fn gpr(&self, reg: Register) -> u32 {
        self.registers.gpr(reg)
    }

    /// Writes a decoded general-purpose register.
    pub fn set_gpr(&mut self, reg: Register, value: u32) {
        self.registers.set_gpr(reg, value);
    }

    /// Flat program counter.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.registers.pc()
    }

    /// Sets the flat program counter.
    pub fn set_pc(&mut self, value: u32) {
        self.registers.set_pc(value);
    }

    /// Moves the program counter to the next instruction.
    pub fn advance_pc(&mut self) {
        self.registers.set_pc(self.pc().wrapping_add(4));
    }

    /// Segment selected by `kind`.
    #[must_use]
    pub const fn segment(&self, kind: SegmentKind) -> &Segment {
        match kind {
            SegmentKind::Text => &self.text,
            SegmentKind::Data => &self.data,
        }
    }

    fn segment_mut(&mut self, kind: SegmentKind) -> &mut Segment {
        match kind {
            SegmentKind::Text => &mut self.text,
            SegmentKind::Data => &mut self.data,
        }
    }

    /// Text segment length in bytes.
    #[must_use]
    pub const fn text_size(&self) -> usize {
        self.text.len()
    }

    /// Data segment length in bytes.
    #[must_use]
    pub const fn data_size(&self) -> usize {
        self.data.len()
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Address`] when the offset is past the segment end.
    pub fn byte(&self, address: Address) -> Result<u8, IndexOutOfRange> {
        self.segment(address.segment).byte(address)
    }

    /// Writes one byte.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Address`] when the offset is past the segment end.
    pub fn set_byte(&mut self, address: Address, value: u8) -> Result<(), IndexOutOfRange> {
        self.segment_mut(address.segment).set_byte(address, value)
    }

    /// Reads a big-endian word.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Address`] unless `offset + 3` is in bounds.
    pub fn word(&self, address: Address) -> Result<u32, IndexOutOfRange> {
        self.segment(address.segment).word(address)
    }

    /// Writes a big-endian word.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Address`] unless `offset + 3` is in bounds.
    pub fn set_word(&mut self, address: Address, value: u32) -> Result<(), IndexOutOfRange> {
        self.segment_mut(address.segment).set_word(address, value)
    }

    /// Bulk-initializes a segment from the start of `bytes`.
    pub fn load(&mut self, kind: SegmentKind, bytes: &[u8]) {
        self.segment_mut(kind).load(bytes);
    }

    /// Returns `true` once the program counter reached the end of the text segment.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.pc() >= self.text.end()
    }

    /// Running/terminated view of [`Self::is_terminated`].
    #[must_use]
    pub fn run_state(&self) -> RunState {
        if self.is_terminated() {
            RunState::Terminated
        } else {
            RunState::Running
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AddressSpace;
    use crate::{Address, IndexOutOfRange, RunState, SegmentKind, PC_INDEX, TEXT_BASE};

    #[test]
    fn construction_sizes_segments_and_resets_registers() {
        let space = AddressSpace::with_sizes(7, 9);

        for index in 0..32 {
            assert_eq!(space.register(index), Ok(0));
        }
        assert_eq!(space.register(PC_INDEX), Ok(TEXT_BASE));

        assert_eq!(space.text_size(), 7);
        for offset in 0..7 {
            assert_eq!(space.byte(Address::text(offset)), Ok(0));
        }
        assert!(space.byte(Address::text(7)).is_err());
        assert!(space.word(Address::text(4)).is_err());

        assert_eq!(space.data_size(), 9);
        for offset in 0..9 {
            assert_eq!(space.byte(Address::data(offset)), Ok(0));
        }
        assert!(space.byte(Address::data(9)).is_err());
        assert!(space.word(Address::data(6)).is_err());
    }

    #[test]
    fn load_fills_segments_from_buffers() {
        let mut space = AddressSpace::with_sizes(5, 10);
        space.load(SegmentKind::Text, &[1, 2, 3, 4, 5]);
        space.load(SegmentKind::Data, &[10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);

        assert_eq!(space.word(Address::text(1)), Ok(0x0203_0405));
        assert_eq!(space.word(Address::data(2)), Ok(0x0807_0605));
    }

    #[test]
    fn register_index_33_is_out_of_range() {
        let mut space = AddressSpace::with_sizes(0, 0);
        assert_eq!(space.register(33), Err(IndexOutOfRange::Register(33)));

        space.set_register(18, 0x1234).expect("in range");
        assert_eq!(space.register(18), Ok(0x1234));
    }

    #[test]
    fn empty_text_segment_is_terminated_immediately() {
        let space = AddressSpace::new(&[], &[0; 4]);
        assert!(space.is_terminated());
        assert_eq!(space.run_state(), RunState::Terminated);
    }

    #[test]
    fn termination_tracks_the_program_counter() {
        let mut space = AddressSpace::new(&[0; 8], &[]);
        assert_eq!(space.run_state(), RunState::Running);

        space.advance_pc();
        assert!(!space.is_terminated());
        space.advance_pc();
        assert!(space.is_terminated());

        space.set_pc(TEXT_BASE + 0x100);
        assert!(space.is_terminated());
    }

    #[test]
    fn byte_writes_route_by_segment_tag() {
        let mut space = AddressSpace::with_sizes(4, 4);
        space.set_byte(Address::data(3), 0xAB).expect("in bounds");

        assert_eq!(space.byte(Address::data(3)), Ok(0xAB));
        assert_eq!(space.byte(Address::text(3)), Ok(0));
        assert_eq!(
            space.set_byte(Address::data(4), 1),
            Err(IndexOutOfRange::Address(Address::data(4)))
        );
    }
}
