//! Instruction execution pipeline.
//!
//! A tick follows a fixed sequence:
//! 1. Reject a terminated state
//! 2. Fetch the word at the program counter
//! 3. Decode it (R, then I, then J)
//! 4. Read operands and validate every address the instruction touches
//! 5. Commit the staged store, destination register, and program counter
//!
//! Steps 1 through 4 only read the address space. A failing tick therefore
//! leaves it exactly as it was.

mod helpers;

pub use helpers::{
    branch_target, checked_displacement, effective_address, jump_target, sign_extend16,
    sign_extend8, zero_extend16, MIN_DISPLACEMENT,
};

use tracing::{debug, trace};

use crate::decoder::{Decoder, Instruction};
use crate::encoding::{IOpcode, JOpcode, RFunction};
use crate::memory::{validate_byte_access, validate_word_access};
use crate::state::Register;
use crate::{Address, AddressSpace, TickError, TEXT_BASE};

/// Memory write staged by an executed instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingStore {
    /// Single byte write (`SB`).
    Byte {
        /// Validated target address.
        address: Address,
        /// Byte to store.
        value: u8,
    },
    /// Big-endian word write (`SW`).
    Word {
        /// Validated target address.
        address: Address,
        /// Word to store.
        value: u32,
    },
}

/// Side effects accumulated while executing one instruction.
///
/// Nothing here touches the address space until [`commit_execution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecuteState {
    /// Destination register and its new value.
    pub dest: Option<(Register, u32)>,
    /// Memory write, already bounds-checked.
    pub store: Option<PendingStore>,
    /// Program counter after the instruction.
    pub next_pc: u32,
}

impl ExecuteState {
    /// Side-effect-free state that falls through to `pc + 4`.
    #[must_use]
    pub const fn fall_through(pc: u32) -> Self {
        Self {
            dest: None,
            store: None,
            next_pc: pc.wrapping_add(4),
        }
    }

    const fn with_dest(mut self, reg: Register, value: u32) -> Self {
        self.dest = Some((reg, value));
        self
    }
}

/// Instruction that a successful tick retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Retired {
    /// Program counter the word was fetched from.
    pub pc: u32,
    /// Raw fetched word.
    pub word: u32,
    /// Decoded form of `word`.
    pub instruction: Instruction,
}

/// Executes a decoded instruction against a read-only view of the state.
///
/// # Errors
///
/// Returns [`TickError::MemoryOutOfRange`] when a load or store address
/// falls outside its segment, or [`TickError::OffsetIsTooSmall`] when a
/// displacement is rejected.
pub fn execute_instruction(
    instr: &Instruction,
    state: &AddressSpace,
) -> Result<ExecuteState, TickError> {
    let pc = state.pc();

    match *instr {
        Instruction::Register {
            function,
            rs,
            rt,
            rd,
            shamt,
        } => Ok(execute_register(function, state.gpr(rs), state.gpr(rt), rd, shamt, pc)),
        Instruction::Immediate {
            opcode,
            rs,
            rt,
            immediate,
        } => execute_immediate(opcode, rs, rt, immediate, state),
        Instruction::Jump { opcode, target } => Ok(execute_jump(opcode, target, pc)),
    }
}

fn execute_register(
    function: RFunction,
    rs: u32,
    rt: u32,
    rd: Register,
    shamt: u8,
    pc: u32,
) -> ExecuteState {
    let exec = ExecuteState::fall_through(pc);
    let shamt = u32::from(shamt & 0x1F);

    let value = match function {
        RFunction::Addu => rs.wrapping_add(rt),
        RFunction::Subu => rs.wrapping_sub(rt),
        RFunction::And => rs & rt,
        RFunction::Or => rs | rt,
        RFunction::Nor => !(rs | rt),
        RFunction::Sltu => u32::from(rs < rt),
        RFunction::Sll => rt << shamt,
        RFunction::Srl => rt >> shamt,
        RFunction::Jr => {
            return ExecuteState {
                next_pc: rs,
                ..exec
            };
        }
    };

    exec.with_dest(rd, value)
}

#[allow(clippy::cast_possible_wrap)]
fn execute_immediate(
    opcode: IOpcode,
    rs: Register,
    rt: Register,
    immediate: u16,
    state: &AddressSpace,
) -> Result<ExecuteState, TickError> {
    let pc = state.pc();
    let exec = ExecuteState::fall_through(pc);
    let source = state.gpr(rs);

    let exec = match opcode {
        IOpcode::Addiu => {
            exec.with_dest(rt, source.wrapping_add(checked_displacement(immediate)?))
        }
        IOpcode::Andi => exec.with_dest(rt, source & zero_extend16(immediate)),
        IOpcode::Ori => exec.with_dest(rt, source | zero_extend16(immediate)),
        // Signed comparison despite the mnemonic.
        IOpcode::Sltiu => {
            let less = (source as i32) < (sign_extend16(immediate) as i32);
            exec.with_dest(rt, u32::from(less))
        }
        IOpcode::Lui => exec.with_dest(rt, zero_extend16(immediate) << 16),
        IOpcode::Beq | IOpcode::Bne => {
            let equal = source == state.gpr(rt);
            let taken = equal == matches!(opcode, IOpcode::Beq);
            if taken {
                ExecuteState {
                    next_pc: branch_target(pc, immediate)?,
                    ..exec
                }
            } else {
                exec
            }
        }
        IOpcode::Lb => {
            let address = effective_address(source, immediate)?;
            exec.with_dest(rt, sign_extend8(state.byte(address)?))
        }
        IOpcode::Lw => {
            let address = effective_address(source, immediate)?;
            exec.with_dest(rt, state.word(address)?)
        }
        IOpcode::Sb => {
            let address = effective_address(source, immediate)?;
            validate_byte_access(address, state.segment(address.segment).len())?;
            ExecuteState {
                store: Some(PendingStore::Byte {
                    address,
                    value: state.gpr(rt).to_be_bytes()[3],
                }),
                ..exec
            }
        }
        IOpcode::Sw => {
            let address = effective_address(source, immediate)?;
            validate_word_access(address, state.segment(address.segment).len())?;
            ExecuteState {
                store: Some(PendingStore::Word {
                    address,
                    value: state.gpr(rt),
                }),
                ..exec
            }
        }
    };

    Ok(exec)
}

const fn execute_jump(opcode: JOpcode, target: u32, pc: u32) -> ExecuteState {
    let exec = ExecuteState {
        next_pc: jump_target(pc, target),
        ..ExecuteState::fall_through(pc)
    };

    match opcode {
        JOpcode::J => exec,
        JOpcode::Jal => exec.with_dest(Register::RA, pc.wrapping_add(4)),
    }
}

/// Applies staged side effects: store first, then register, then PC.
///
/// # Errors
///
/// Returns [`TickError::MemoryOutOfRange`] if the staged store does not fit,
/// in which case nothing is applied. Stores produced by
/// [`execute_instruction`] are already validated.
pub fn commit_execution(state: &mut AddressSpace, exec: &ExecuteState) -> Result<(), TickError> {
    match exec.store {
        Some(PendingStore::Byte { address, value }) => state.set_byte(address, value)?,
        Some(PendingStore::Word { address, value }) => state.set_word(address, value)?,
        None => {}
    }

    if let Some((reg, value)) = exec.dest {
        state.set_gpr(reg, value);
    }

    state.set_pc(exec.next_pc);
    Ok(())
}

/// Reads the instruction word at the program counter.
///
/// # Errors
///
/// Returns [`TickError::MemoryOutOfRange`] when the word does not lie
/// entirely inside the text segment.
pub fn fetch(state: &AddressSpace) -> Result<u32, TickError> {
    let address = Address::text(state.pc().wrapping_sub(TEXT_BASE));
    Ok(state.word(address)?)
}

/// Runs one fetch-decode-execute cycle and reports what retired.
///
/// # Errors
///
/// Same as [`tick`]. The state is unchanged on error.
pub fn step(state: &mut AddressSpace) -> Result<Retired, TickError> {
    let pc = state.pc();
    let result = retire(state);

    match &result {
        Ok(retired) => trace!(
            pc = format_args!("{pc:#x}"),
            word = format_args!("{:#010x}", retired.word),
            instruction = %retired.instruction,
            "instruction retired"
        ),
        Err(error) => debug!(pc = format_args!("{pc:#x}"), %error, "tick rejected"),
    }

    result
}

fn retire(state: &mut AddressSpace) -> Result<Retired, TickError> {
    if state.is_terminated() {
        return Err(TickError::AlreadyTerminated);
    }

    let pc = state.pc();
    let word = fetch(state)?;
    let instruction = Decoder::decode(word)?;
    let exec = execute_instruction(&instruction, state)?;
    commit_execution(state, &exec)?;

    Ok(Retired {
        pc,
        word,
        instruction,
    })
}

/// Executes exactly one instruction.
///
/// On success every register write, memory write, and the program counter
/// update are applied together. On error nothing is applied.
///
/// # Errors
///
/// - [`TickError::AlreadyTerminated`] when the program counter is at or past
///   the end of the text segment
/// - [`TickError::MemoryOutOfRange`] when the fetch or an operand address is
///   out of bounds
/// - [`TickError::InvalidInstruction`] when no format recognizes the word
pub fn tick(state: &mut AddressSpace) -> Result<(), TickError> {
    step(state).map(|_| ())
}
