//! This module defines the core data structures and types shared by the interpreter:
//! tape symbols, instruction actions, execution status, program definitions and error types.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

use crate::instruction::Instruction;

/// The separator used between instructions when none is configured.
pub const DEFAULT_SEPARATOR: &str = "\n";
/// The single-line separator accepted as an alternative encoding of an instruction set.
pub const CUSTOM_SEPARATOR: &str = ";";
/// The tape content accepted as a synonym for an empty tape.
pub const EMPTY_TAPE_INPUT: &str = " ";
/// The maximum number of steps `run_to_completion` executes by default.
pub const MAX_EXECUTION_STEPS: usize = 10000;
/// The maximum allowed size for a program file in bytes.
pub const MAX_PROGRAM_SIZE: usize = 65536; // 64KB

/// A symbol stored in a tape cell. The machine only knows two of them.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Symbol {
    /// The blank symbol, `0`.
    #[default]
    Zero,
    /// The marked symbol, `1`.
    One,
}

impl Symbol {
    /// Returns the character used for this symbol in textual encodings.
    pub fn as_char(self) -> char {
        match self {
            Symbol::Zero => '0',
            Symbol::One => '1',
        }
    }
}

impl TryFrom<char> for Symbol {
    type Error = MachineError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '0' => Ok(Symbol::Zero),
            '1' => Ok(Symbol::One),
            _ => Err(MachineError::InvalidSymbol(c)),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// An instruction id: a non-empty string of decimal digits of any length.
///
/// The digits are kept as written so an instruction prints back exactly as it was
/// parsed. Ids compare by numeric value, so `01` and `1` name the same state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StateIdRepr", into = "String")]
pub struct StateId(String);

impl StateId {
    /// Validates `digits` as an id.
    ///
    /// # Returns
    ///
    /// * `Err(MachineError::InvalidStateId)` if `digits` is empty or contains a non-digit.
    pub fn parse(digits: &str) -> Result<Self, MachineError> {
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(digits.to_string()))
        } else {
            Err(MachineError::InvalidStateId(digits.to_string()))
        }
    }

    /// The digits as written.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digits without leading zeros. `0` for an all-zero id.
    pub fn canonical(&self) -> &str {
        match self.0.trim_start_matches('0') {
            "" => "0",
            digits => digits,
        }
    }

    /// The numeric value, if it fits in a `u64`.
    pub fn to_u64(&self) -> Option<u64> {
        self.canonical().parse().ok()
    }
}

impl From<u64> for StateId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl From<StateId> for String {
    fn from(id: StateId) -> Self {
        id.0
    }
}

impl FromStr for StateId {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for StateId {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for StateId {}

impl Hash for StateId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl Ord for StateId {
    fn cmp(&self, other: &Self) -> Ordering {
        let (a, b) = (self.canonical(), other.canonical());
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

impl PartialOrd for StateId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Program files may give ids as JSON numbers or as digit strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum StateIdRepr {
    Number(u64),
    Text(String),
}

impl TryFrom<StateIdRepr> for StateId {
    type Error = MachineError;

    fn try_from(repr: StateIdRepr) -> Result<Self, Self::Error> {
        match repr {
            StateIdRepr::Number(id) => Ok(Self::from(id)),
            StateIdRepr::Text(digits) => Self::parse(&digits),
        }
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

/// What an instruction does to the tape in a single step.
///
/// A step either writes or moves, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Overwrite the symbol under the head.
    Write(Symbol),
    /// Move the head one cell.
    Move(Direction),
}

impl TryFrom<char> for Action {
    type Error = MachineError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c {
            '0' => Ok(Action::Write(Symbol::Zero)),
            '1' => Ok(Action::Write(Symbol::One)),
            'L' => Ok(Action::Move(Direction::Left)),
            'R' => Ok(Action::Move(Direction::Right)),
            _ => Err(MachineError::InvalidAction(c)),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Write(symbol) => write!(f, "{symbol}"),
            Action::Move(Direction::Left) => write!(f, "L"),
            Action::Move(Direction::Right) => write!(f, "R"),
        }
    }
}

/// The execution status of a machine. `Halted` is terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Running,
    Halted,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Running => write!(f, "running"),
            Status::Halted => write!(f, "halted"),
        }
    }
}

/// Represents the outcome of a successful execution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a step and a next instruction was found.
    Continue,
    /// The step left the machine halted.
    Halt,
}

/// A complete machine definition as stored in program files.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Program {
    /// The name of the program.
    pub name: String,
    /// Initial tape content, written left to right starting at the root cell.
    #[serde(default)]
    pub tape: String,
    /// The instruction set text, one instruction per `separator`-delimited segment.
    pub instructions: String,
    /// The id of the first instruction to look up.
    pub initial_id: StateId,
    /// Delimiter between instructions in `instructions`.
    #[serde(default = "default_separator")]
    pub separator: String,
}

fn default_separator() -> String {
    DEFAULT_SEPARATOR.to_string()
}

/// Represents the errors that can occur while building or running a machine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// Instruction text does not match `id,condition,action,next_id`.
    #[error("Instruction \"{0}\" is not valid")]
    InvalidInstructionFormat(String),
    /// Two instructions share the same `(id, condition)` key.
    #[error("Collision between instructions: \"{0}\" and \"{1}\"")]
    DuplicateTransition(Instruction, Instruction),
    /// No instruction carries the requested initial id.
    #[error("Initial instruction id {0} is not contained in the instruction set")]
    UnknownInitialState(StateId),
    /// An id that is not a string of decimal digits.
    #[error("\"{0}\" is not a valid instruction id")]
    InvalidStateId(String),
    /// Initial tape content contains characters other than `0` and `1`.
    #[error("Tape input \"{0}\" is not valid")]
    InvalidTapeContent(String),
    /// A write was attempted with a symbol outside the alphabet.
    #[error("Cannot write the symbol '{0}' to the tape")]
    InvalidSymbol(char),
    /// An action character outside `0`, `1`, `L`, `R`.
    #[error("'{0}' is not an acceptable action")]
    InvalidAction(char),
    /// `step` was called on a machine that has already halted.
    #[error("Machine has already halted")]
    MachineHalted,
    /// The instruction separator is empty.
    #[error("Instruction separator must not be empty")]
    InvalidSeparator,
    /// Indicates an error related to file system operations or program file content.
    #[error("File error: {0}")]
    FileError(String),
    /// Indicates a lookup or consistency failure outside the machine itself.
    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_from_char() {
        assert_eq!(Symbol::try_from('0'), Ok(Symbol::Zero));
        assert_eq!(Symbol::try_from('1'), Ok(Symbol::One));
        assert_eq!(Symbol::try_from('2'), Err(MachineError::InvalidSymbol('2')));
        assert_eq!(Symbol::default(), Symbol::Zero);
    }

    #[test]
    fn test_action_from_char() {
        assert_eq!(Action::try_from('1'), Ok(Action::Write(Symbol::One)));
        assert_eq!(Action::try_from('L'), Ok(Action::Move(Direction::Left)));
        assert_eq!(Action::try_from('R'), Ok(Action::Move(Direction::Right)));
        assert_eq!(Action::try_from('S'), Err(MachineError::InvalidAction('S')));
    }

    #[test]
    fn test_action_display() {
        let actions = ['0', '1', 'L', 'R'];
        for c in actions {
            assert_eq!(Action::try_from(c).unwrap().to_string(), c.to_string());
        }
    }

    #[test]
    fn test_direction_serialization() {
        let left_json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(left_json, "\"Left\"");

        let left: Direction = serde_json::from_str(&left_json).unwrap();
        assert_eq!(left, Direction::Left);
    }

    #[test]
    fn test_program_default_separator() {
        let program: Program = serde_json::from_str(
            r#"{ "name": "p", "tape": "1", "instructions": "1,1,R,1", "initial_id": 1 }"#,
        )
        .unwrap();
        assert_eq!(program.separator, DEFAULT_SEPARATOR);
        assert_eq!(program.initial_id, StateId::from(1));
    }

    #[test]
    fn test_program_initial_id_as_digit_string() {
        let program: Program = serde_json::from_str(
            r#"{ "name": "p", "instructions": "0018446744073709551616,1,R,1", "initial_id": "18446744073709551616" }"#,
        )
        .unwrap();
        assert_eq!(program.initial_id.as_str(), "18446744073709551616");
        assert_eq!(program.initial_id.to_u64(), None);

        let result: Result<Program, _> = serde_json::from_str(
            r#"{ "name": "p", "instructions": "1,1,R,1", "initial_id": "1a" }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_state_id_compares_by_value() {
        let padded = StateId::parse("007").unwrap();

        assert_eq!(padded, StateId::from(7));
        assert_eq!(padded.to_string(), "007");
        assert_eq!(padded.canonical(), "7");
        assert_eq!(StateId::parse("000").unwrap().canonical(), "0");
        assert!(StateId::from(9) < StateId::from(10));
        assert!(StateId::parse("18446744073709551616").unwrap() > StateId::from(u64::MAX));
    }

    #[test]
    fn test_state_id_rejects_non_digits() {
        for input in ["", "-1", "1a", " 1"] {
            assert_eq!(
                StateId::parse(input),
                Err(MachineError::InvalidStateId(input.to_string()))
            );
        }
    }

    #[test]
    fn test_error_display() {
        let error = MachineError::UnknownInitialState(StateId::from(7));

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("Initial instruction id 7"));
    }
}
