//! Core interpreter crate for a reduced 32-bit MIPS instruction set.
//!
//! The crate owns the two-segment [`AddressSpace`], the R/I/J
//! [`Decoder`], and the [`tick`] execution step, plus the object loader,
//! run loop, and dump formatting used by the command-line driver.

/// Memory model primitives: segment map, bounds policy, and the address space.
pub mod memory;
pub use memory::{
    parse_hex_u32, validate_byte_access, validate_word_access, Address, AddressParseError,
    AddressSpace, Segment, SegmentKind, DATA_BASE, TEXT_BASE, WORD_ACCESS_BYTES,
};

/// Architectural CPU state model primitives.
pub mod state;
pub use state::{Register, RegisterFile, RunState, GENERAL_REGISTER_COUNT, PC_INDEX};

/// Tick result taxonomy and accessor errors.
pub mod fault;
pub use fault::{IndexOutOfRange, TickError};

/// Deterministic opcode and function-code tables.
pub mod encoding;
pub use encoding::{
    classify_i_opcode, classify_j_opcode, classify_r_function, IOpcode, IShape, JOpcode,
    RFunction, I_OPCODE_TABLE, J_OPCODE_TABLE, R_FUNCTION_TABLE,
};

/// Instruction decode with R, I, J format priority.
pub mod decoder;
pub use decoder::{Decoder, Format, Instruction};

/// Instruction execution pipeline.
pub mod execute;
pub use execute::{
    commit_execution, execute_instruction, fetch, step, tick, ExecuteState, PendingStore,
    Retired,
};

/// Run loop, configuration, and trace hooks.
pub mod api;
pub use api::{
    run, run_inspect, NoopTraceSink, RunConfig, RunOutcome, StopReason, TraceEvent, TraceSink,
    DEFAULT_INSTRUCTION_LIMIT,
};

/// Text object-file loader.
pub mod object;
pub use object::{parse_word, ObjectError, ObjectImage};

/// Register and memory dump formatting.
pub mod dump;
pub use dump::{
    dump_memory, dump_registers, AddressRange, AddressRangeParseError, DumpError, MemoryDump,
    RegisterDump,
};

#[cfg(test)]
use proptest as _;
#[cfg(test)]
use rstest as _;
