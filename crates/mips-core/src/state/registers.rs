use std::fmt;

use crate::IndexOutOfRange;

/// Number of general-purpose registers (`$0..$31`).
pub const GENERAL_REGISTER_COUNT: usize = 32;
/// Slot index that addresses the program counter through the indexed accessors.
pub const PC_INDEX: usize = GENERAL_REGISTER_COUNT;

/// General-purpose register identifier decoded from a 5-bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Register(u8);

impl Register {
    /// Hard-wired zero register.
    pub const ZERO: Self = Self(0);
    /// Return-value register by calling convention.
    pub const V0: Self = Self(2);
    /// Stack pointer by calling convention.
    pub const SP: Self = Self(29);
    /// Link register written by `JAL`.
    pub const RA: Self = Self(31);

    /// Builds a register from an index in `0..32`.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < GENERAL_REGISTER_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Extracts the register selected by the low five bits of `bits`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn from_u5(bits: u32) -> Self {
        Self((bits & 0x1F) as u8)
    }

    /// Array index for this register.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Register file: 32 general-purpose registers plus the program counter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RegisterFile {
    gpr: [u32; GENERAL_REGISTER_COUNT],
    pc: u32,
}

impl RegisterFile {
    /// Reads a general-purpose register. `$0` always reads zero.
    #[must_use]
    pub const fn gpr(&self, reg: Register) -> u32 {
        self.gpr[reg.index()]
    }

    /// Writes a general-purpose register. Writes to `$0` are dropped.
    pub fn set_gpr(&mut self, reg: Register, value: u32) {
        if reg != Register::ZERO {
            self.gpr[reg.index()] = value;
        }
    }

    /// Reads the program counter.
    #[must_use]
    pub const fn pc(&self) -> u32 {
        self.pc
    }

    /// Writes the program counter.
    pub fn set_pc(&mut self, value: u32) {
        self.pc = value;
    }

    /// Reads slot `index`, where [`PC_INDEX`] selects the program counter.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Register`] when `index > 32`.
    pub fn get(&self, index: usize) -> Result<u32, IndexOutOfRange> {
        match index {
            PC_INDEX => Ok(self.pc),
            _ => self
                .gpr
                .get(index)
                .copied()
                .ok_or(IndexOutOfRange::Register(index)),
        }
    }

    /// Writes slot `index`; index 0 is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns [`IndexOutOfRange::Register`] when `index > 32`.
    pub fn set(&mut self, index: usize, value: u32) -> Result<(), IndexOutOfRange> {
        match index {
            0 => Ok(()),
            PC_INDEX => {
                self.pc = value;
                Ok(())
            }
            _ => {
                let slot = self
                    .gpr
                    .get_mut(index)
                    .ok_or(IndexOutOfRange::Register(index))?;
                *slot = value;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Register, RegisterFile, GENERAL_REGISTER_COUNT, PC_INDEX};
    use crate::IndexOutOfRange;

    #[test]
    fn register_fields_decode_from_low_five_bits() {
        for bits in 0_u32..32 {
            assert_eq!(Register::from_u5(bits).index(), bits as usize);
        }
        assert_eq!(Register::from_u5(0xFFFF_FFE3), Register::from_u5(3));
        assert!(Register::new(32).is_none());
        assert_eq!(Register::new(31), Some(Register::RA));
    }

    #[test]
    fn general_register_file_tracks_each_register_independently() {
        let mut regs = RegisterFile::default();

        for index in 1..GENERAL_REGISTER_COUNT {
            regs.set(index, 0x1000 + index as u32).expect("in range");
        }

        for index in 1..GENERAL_REGISTER_COUNT {
            assert_eq!(regs.get(index), Ok(0x1000 + index as u32));
        }
    }

    #[test]
    fn zero_register_ignores_every_write_path() {
        let mut regs = RegisterFile::default();
        regs.set(0, 0xDEAD_BEEF).expect("index 0 is in range");
        regs.set_gpr(Register::ZERO, 0xDEAD_BEEF);

        assert_eq!(regs.get(0), Ok(0));
        assert_eq!(regs.gpr(Register::ZERO), 0);
    }

    #[test]
    fn pc_is_reachable_through_slot_32() {
        let mut regs = RegisterFile::default();
        regs.set(PC_INDEX, 0x0040_0010).expect("pc slot");

        assert_eq!(regs.pc(), 0x0040_0010);
        assert_eq!(regs.get(PC_INDEX), Ok(0x0040_0010));
    }

    #[test]
    fn out_of_range_slots_are_rejected() {
        let mut regs = RegisterFile::default();

        assert_eq!(regs.get(33), Err(IndexOutOfRange::Register(33)));
        assert_eq!(regs.set(33, 1), Err(IndexOutOfRange::Register(33)));
        assert_eq!(regs, RegisterFile::default());
    }

    #[test]
    fn register_display_uses_dollar_prefix() {
        assert_eq!(Register::SP.to_string(), "$29");
    }
}
