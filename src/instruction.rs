//! Instructions and the validated instruction set the machine looks transitions up in.

use crate::parser::{parse_instruction, parse_instructions};
use crate::types::{Action, MachineError, StateId, Symbol, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A single transition rule: when in state `id` reading `condition`, perform `action`
/// and continue with `next_id`.
///
/// Instructions are immutable once constructed. Their textual form is
/// `id,condition,action,next_id`, e.g. `1,0,R,2`; ids print exactly as they were parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instruction {
    id: StateId,
    condition: Symbol,
    action: Action,
    next_id: StateId,
}

impl Instruction {
    pub fn new(id: StateId, condition: Symbol, action: Action, next_id: StateId) -> Self {
        Self {
            id,
            condition,
            action,
            next_id,
        }
    }

    /// The state this instruction applies from.
    pub fn id(&self) -> &StateId {
        &self.id
    }

    /// The symbol the head must be reading for this instruction to apply.
    pub fn condition(&self) -> Symbol {
        self.condition
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// The id looked up after this instruction executes.
    pub fn next_id(&self) -> &StateId {
        &self.next_id
    }

    /// The `(id, condition)` pair this instruction is keyed by.
    pub fn key(&self) -> (StateId, Symbol) {
        (self.id.clone(), self.condition)
    }

    /// Returns true if both instructions apply to the same `(id, condition)` pair.
    pub fn collides_with(&self, other: &Instruction) -> bool {
        self.id == other.id && self.condition == other.condition
    }
}

impl FromStr for Instruction {
    type Err = MachineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_instruction(s)
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.id, self.condition, self.action, self.next_id
        )
    }
}

/// A validated collection of instructions with at most one instruction per
/// `(id, condition)` pair.
///
/// Validation happens once, in the constructor; the set is immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct InstructionSet {
    instructions: Vec<Instruction>,
    index: HashMap<(StateId, Symbol), usize>,
}

impl InstructionSet {
    /// Builds a set from a list of instructions, rejecting the whole list on any collision.
    ///
    /// When several pairs collide, the reported pair is the one a pairwise scan in input
    /// order finds first: the smallest first index, then the smallest second index.
    ///
    /// # Returns
    ///
    /// * `Ok(InstructionSet)` if no two instructions share `(id, condition)`.
    /// * `Err(MachineError::DuplicateTransition)` naming the first colliding pair.
    pub fn new(instructions: Vec<Instruction>) -> Result<Self, MachineError> {
        let mut occurrences: HashMap<(StateId, Symbol), Vec<usize>> = HashMap::new();
        for (i, instruction) in instructions.iter().enumerate() {
            occurrences.entry(instruction.key()).or_default().push(i);
        }

        let collision = occurrences
            .values()
            .filter(|positions| positions.len() > 1)
            .map(|positions| (positions[0], positions[1]))
            .min();

        if let Some((first, second)) = collision {
            return Err(MachineError::DuplicateTransition(
                instructions[first].clone(),
                instructions[second].clone(),
            ));
        }

        let index = occurrences
            .into_iter()
            .map(|(key, positions)| (key, positions[0]))
            .collect();

        Ok(Self {
            instructions,
            index,
        })
    }

    /// Parses and validates an instruction set whose instructions are delimited by
    /// `separator`.
    pub fn parse(input: &str, separator: &str) -> Result<Self, MachineError> {
        Self::new(parse_instructions(input, separator)?)
    }

    /// Returns the instruction keyed by `(id, condition)`, if any.
    ///
    /// A miss is not an error: it is how the machine detects that it must halt.
    pub fn find_instruction(&self, id: &StateId, condition: Symbol) -> Option<&Instruction> {
        self.index
            .get(&(id.clone(), condition))
            .map(|&position| &self.instructions[position])
    }

    /// Returns true if any instruction carries `id`, regardless of its condition.
    pub fn instruction_with_id_exists(&self, id: &StateId) -> bool {
        self.instructions.iter().any(|instruction| instruction.id() == id)
    }

    /// Iterates over the instructions in input order.
    pub fn iter(&self) -> impl Iterator<Item = &Instruction> {
        self.instructions.iter()
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl FromStr for InstructionSet {
    type Err = MachineError;

    /// Parses a newline separated instruction set.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, DEFAULT_SEPARATOR)
    }
}

impl fmt::Display for InstructionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, instruction) in self.instructions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{instruction}")?;
        }
        Ok(())
    }
}
