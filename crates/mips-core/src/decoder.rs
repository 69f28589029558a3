//! Instruction decoder for the reduced MIPS instruction set.
//!
//! A raw word is offered to the R, I, and J format families in that order.
//! The first family that recognizes its opcode (and, for R-format, its
//! function field) produces the decoded [`Instruction`].

use std::fmt;

use crate::encoding::{
    classify_i_opcode, classify_j_opcode, classify_r_function, fields, IOpcode, IShape, JOpcode,
    RFunction, R_FORMAT_OPCODE,
};
use crate::state::Register;
use crate::TickError;

/// Instruction format family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Register operands and a function field.
    Register,
    /// Two registers and a 16-bit immediate.
    Immediate,
    /// 26-bit absolute target index.
    Jump,
}

/// Fully decoded instruction with every field extracted.
///
/// Unused fields are retained so that [`Instruction::encode`] reproduces
/// the original word exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// R-format word.
    Register {
        /// Operation selected by the function field.
        function: RFunction,
        /// First source register.
        rs: Register,
        /// Second source register (shift source for `SLL`/`SRL`).
        rt: Register,
        /// Destination register.
        rd: Register,
        /// Shift amount.
        shamt: u8,
    },
    /// I-format word.
    Immediate {
        /// Operation selected by the primary opcode.
        opcode: IOpcode,
        /// Source or base register.
        rs: Register,
        /// Destination register, or second comparand and store source.
        rt: Register,
        /// Raw 16-bit immediate before any extension.
        immediate: u16,
    },
    /// J-format word.
    Jump {
        /// Operation selected by the primary opcode.
        opcode: JOpcode,
        /// Raw 26-bit target index.
        target: u32,
    },
}

impl Instruction {
    /// Format family this instruction was decoded from.
    #[must_use]
    pub const fn format(&self) -> Format {
        match self {
            Self::Register { .. } => Format::Register,
            Self::Immediate { .. } => Format::Immediate,
            Self::Jump { .. } => Format::Jump,
        }
    }

    /// Re-encodes the instruction into its 32-bit word.
    #[must_use]
    pub fn encode(self) -> u32 {
        match self {
            Self::Register {
                function,
                rs,
                rt,
                rd,
                shamt,
            } => {
                (u32::from(R_FORMAT_OPCODE) << 26)
                    | (reg_bits(rs) << 21)
                    | (reg_bits(rt) << 16)
                    | (reg_bits(rd) << 11)
                    | (u32::from(shamt & 0x1F) << 6)
                    | u32::from(function as u8)
            }
            Self::Immediate {
                opcode,
                rs,
                rt,
                immediate,
            } => {
                (u32::from(opcode as u8) << 26)
                    | (reg_bits(rs) << 21)
                    | (reg_bits(rt) << 16)
                    | u32::from(immediate)
            }
            Self::Jump { opcode, target } => {
                (u32::from(opcode as u8) << 26) | (target & 0x03FF_FFFF)
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn reg_bits(reg: Register) -> u32 {
    reg.index() as u32
}

#[allow(clippy::cast_possible_wrap)]
const fn signed(immediate: u16) -> i16 {
    immediate as i16
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Register {
                function,
                rs,
                rt,
                rd,
                shamt,
            } => {
                let name = function.mnemonic();
                match function {
                    RFunction::Jr => write!(f, "{name} {rs}"),
                    RFunction::Sll | RFunction::Srl => write!(f, "{name} {rd}, {rt}, {shamt}"),
                    _ => write!(f, "{name} {rd}, {rs}, {rt}"),
                }
            }
            Self::Immediate {
                opcode,
                rs,
                rt,
                immediate,
            } => {
                let name = opcode.mnemonic();
                match opcode.shape() {
                    IShape::ArithmeticImmediate => match opcode {
                        IOpcode::Andi | IOpcode::Ori => {
                            write!(f, "{name} {rt}, {rs}, {immediate:#x}")
                        }
                        _ => write!(f, "{name} {rt}, {rs}, {}", signed(immediate)),
                    },
                    IShape::Branch => write!(f, "{name} {rs}, {rt}, {}", signed(immediate)),
                    IShape::LoadUpper => write!(f, "{name} {rt}, {immediate:#x}"),
                    IShape::Memory => write!(f, "{name} {rt}, {}({rs})", signed(immediate)),
                }
            }
            Self::Jump { opcode, target } => write!(f, "{} {:#x}", opcode.mnemonic(), target << 2),
        }
    }
}

/// Instruction decoder for the reduced MIPS instruction set.
pub struct Decoder;

impl Decoder {
    /// Decodes a 32-bit word, trying R, then I, then J format.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::InvalidInstruction`] when no family recognizes
    /// the word.
    pub fn decode(word: u32) -> Result<Instruction, TickError> {
        Self::decode_register(word)
            .or_else(|| Self::decode_immediate(word))
            .or_else(|| Self::decode_jump(word))
            .ok_or(TickError::InvalidInstruction)
    }

    /// Recognizes R-format words: opcode zero and an assigned function field.
    #[must_use]
    pub fn decode_register(word: u32) -> Option<Instruction> {
        if fields::opcode(word) != R_FORMAT_OPCODE {
            return None;
        }

        let function = classify_r_function(fields::funct(word))?;
        Some(Instruction::Register {
            function,
            rs: Register::from_u5(fields::rs(word)),
            rt: Register::from_u5(fields::rt(word)),
            rd: Register::from_u5(fields::rd(word)),
            shamt: fields::shamt(word),
        })
    }

    /// Recognizes I-format words by primary opcode.
    #[must_use]
    pub fn decode_immediate(word: u32) -> Option<Instruction> {
        let opcode = classify_i_opcode(fields::opcode(word))?;
        Some(Instruction::Immediate {
            opcode,
            rs: Register::from_u5(fields::rs(word)),
            rt: Register::from_u5(fields::rt(word)),
            immediate: fields::immediate(word),
        })
    }

    /// Recognizes J-format words by primary opcode.
    #[must_use]
    pub fn decode_jump(word: u32) -> Option<Instruction> {
        let opcode = classify_j_opcode(fields::opcode(word))?;
        Some(Instruction::Jump {
            opcode,
            target: fields::target(word),
        })
    }
}
