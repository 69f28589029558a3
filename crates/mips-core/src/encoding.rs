/// Primary opcode shared by every R-format word (bits 31..26).
pub const R_FORMAT_OPCODE: u8 = 0x00;

/// R-format operations selected by the function field (bits 5..0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum RFunction {
    Sll = 0x00,
    Srl = 0x02,
    Jr = 0x08,
    Addu = 0x21,
    Subu = 0x23,
    And = 0x24,
    Or = 0x25,
    Nor = 0x27,
    Sltu = 0x2B,
}

/// I-format operations selected by the primary opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum IOpcode {
    Beq = 0x04,
    Bne = 0x05,
    Addiu = 0x09,
    Sltiu = 0x0B,
    Andi = 0x0C,
    Ori = 0x0D,
    Lui = 0x0F,
    Lb = 0x20,
    Lw = 0x23,
    Sb = 0x28,
    Sw = 0x2B,
}

/// J-format operations selected by the primary opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum JOpcode {
    J = 0x02,
    Jal = 0x03,
}

/// The four disjoint I-format operand shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IShape {
    /// `rt = rs op imm` with a sign- or zero-extended immediate.
    ArithmeticImmediate,
    /// Conditional PC-relative branch comparing `rs` and `rt`.
    Branch,
    /// `rt = imm << 16`.
    LoadUpper,
    /// Load or store at `rs + sext(imm)`.
    Memory,
}

/// Single source-of-truth R-format function table.
pub const R_FUNCTION_TABLE: &[(u8, RFunction)] = &[
    (0x00, RFunction::Sll),
    (0x02, RFunction::Srl),
    (0x08, RFunction::Jr),
    (0x21, RFunction::Addu),
    (0x23, RFunction::Subu),
    (0x24, RFunction::And),
    (0x25, RFunction::Or),
    (0x27, RFunction::Nor),
    (0x2B, RFunction::Sltu),
];

/// Single source-of-truth I-format opcode table.
pub const I_OPCODE_TABLE: &[(u8, IOpcode)] = &[
    (0x04, IOpcode::Beq),
    (0x05, IOpcode::Bne),
    (0x09, IOpcode::Addiu),
    (0x0B, IOpcode::Sltiu),
    (0x0C, IOpcode::Andi),
    (0x0D, IOpcode::Ori),
    (0x0F, IOpcode::Lui),
    (0x20, IOpcode::Lb),
    (0x23, IOpcode::Lw),
    (0x28, IOpcode::Sb),
    (0x2B, IOpcode::Sw),
];

/// Single source-of-truth J-format opcode table.
pub const J_OPCODE_TABLE: &[(u8, JOpcode)] = &[(0x02, JOpcode::J), (0x03, JOpcode::Jal)];

impl IOpcode {
    /// Operand shape handled by this opcode.
    #[must_use]
    pub const fn shape(self) -> IShape {
        match self {
            Self::Addiu | Self::Sltiu | Self::Andi | Self::Ori => IShape::ArithmeticImmediate,
            Self::Beq | Self::Bne => IShape::Branch,
            Self::Lui => IShape::LoadUpper,
            Self::Lb | Self::Lw | Self::Sb | Self::Sw => IShape::Memory,
        }
    }

    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Addiu => "addiu",
            Self::Sltiu => "sltiu",
            Self::Andi => "andi",
            Self::Ori => "ori",
            Self::Lui => "lui",
            Self::Lb => "lb",
            Self::Lw => "lw",
            Self::Sb => "sb",
            Self::Sw => "sw",
        }
    }
}

impl RFunction {
    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Sll => "sll",
            Self::Srl => "srl",
            Self::Jr => "jr",
            Self::Addu => "addu",
            Self::Subu => "subu",
            Self::And => "and",
            Self::Or => "or",
            Self::Nor => "nor",
            Self::Sltu => "sltu",
        }
    }
}

impl JOpcode {
    /// Assembly mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::J => "j",
            Self::Jal => "jal",
        }
    }
}

/// Returns the R-format operation for a function field value.
#[must_use]
pub fn classify_r_function(funct: u8) -> Option<RFunction> {
    R_FUNCTION_TABLE
        .iter()
        .find_map(|(code, function)| (*code == funct).then_some(*function))
}

/// Returns the I-format operation for a primary opcode value.
#[must_use]
pub fn classify_i_opcode(opcode: u8) -> Option<IOpcode> {
    I_OPCODE_TABLE
        .iter()
        .find_map(|(code, op)| (*code == opcode).then_some(*op))
}

/// Returns the J-format operation for a primary opcode value.
#[must_use]
pub fn classify_j_opcode(opcode: u8) -> Option<JOpcode> {
    J_OPCODE_TABLE
        .iter()
        .find_map(|(code, op)| (*code == opcode).then_some(*op))
}

/// Bit-field accessors for a raw 32-bit instruction word.
#[allow(clippy::cast_possible_truncation)]
pub mod fields {
    /// Primary opcode, bits 31..26.
    #[must_use]
    pub const fn opcode(word: u32) -> u8 {
        (word >> 26) as u8
    }

    /// First source register field, bits 25..21.
    #[must_use]
    pub const fn rs(word: u32) -> u32 {
        (word >> 21) & 0x1F
    }

    /// Second source (or I-format destination) field, bits 20..16.
    #[must_use]
    pub const fn rt(word: u32) -> u32 {
        (word >> 16) & 0x1F
    }

    /// R-format destination field, bits 15..11.
    #[must_use]
    pub const fn rd(word: u32) -> u32 {
        (word >> 11) & 0x1F
    }

    /// Shift amount, bits 10..6.
    #[must_use]
    pub const fn shamt(word: u32) -> u8 {
        ((word >> 6) & 0x1F) as u8
    }

    /// Function field, bits 5..0.
    #[must_use]
    pub const fn funct(word: u32) -> u8 {
        (word & 0x3F) as u8
    }

    /// 16-bit immediate, bits 15..0.
    #[must_use]
    pub const fn immediate(word: u32) -> u16 {
        (word & 0xFFFF) as u16
    }

    /// 26-bit jump target index, bits 25..0.
    #[must_use]
    pub const fn target(word: u32) -> u32 {
        word & 0x03FF_FFFF
    }
}
