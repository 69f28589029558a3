//! Architectural CPU state model primitives.

/// Register file types and storage model.
pub mod registers;
/// Running/terminated state machine.
pub mod run_state;

pub use registers::{Register, RegisterFile, GENERAL_REGISTER_COUNT, PC_INDEX};
pub use run_state::RunState;
