//! This crate provides the core of a binary, single-tape Turing machine interpreter.
//! It includes modules for parsing instructions and tape input, the lazily grown tape and
//! its head, the validated instruction set, the step-by-step machine with its execution
//! log, and loading of program definitions.

pub mod instruction;
pub mod loader;
pub mod logger;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the instruction types.
pub use instruction::{Instruction, InstructionSet};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the execution history types.
pub use logger::{LogEntry, Logger};
/// Re-exports the `Machine` struct from the machine module.
pub use machine::Machine;
/// Re-exports `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{ProgramInfo, ProgramManager, PROGRAMS};
/// Re-exports the tape and head.
pub use tape::{Head, Tape};
/// Re-exports various types related to machine definition and execution from the types module.
pub use types::{
    Action, Direction, MachineError, Program, StateId, Status, Step, Symbol,
    MAX_EXECUTION_STEPS,
};
