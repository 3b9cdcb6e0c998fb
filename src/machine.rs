//! This module defines the `Machine` struct, which executes a binary single-tape Turing
//! machine one step at a time and records every state it passes through in a `Logger`.

use crate::instruction::{Instruction, InstructionSet};
use crate::logger::{LogEntry, Logger};
use crate::tape::{Head, Tape};
use crate::types::{Action, MachineError, Program, StateId, Status, Step, DEFAULT_SEPARATOR};

/// The execution context of a single run.
///
/// A step executes the action of the current instruction, logs the resulting state and
/// then looks up the next instruction by its `next_id` and the symbol now under the
/// head. If there is none, the machine halts and keeps the last executed instruction as
/// its current one.
#[derive(Debug, Clone)]
pub struct Machine {
    tape: Tape,
    head: Head,
    instructions: InstructionSet,
    initial_id: StateId,
    current_instruction: Option<Instruction>,
    status: Status,
    logger: Logger,
    step_count: usize,
}

impl Machine {
    /// Creates a machine from initial tape content, a newline separated instruction set
    /// and the id of the first instruction.
    ///
    /// # Returns
    ///
    /// * `Err(MachineError::InvalidTapeContent)` if `input` is not a string of `0`/`1`.
    /// * `Err(MachineError::InvalidInstructionFormat)` if an instruction is malformed.
    /// * `Err(MachineError::DuplicateTransition)` if two instructions share `(id, condition)`.
    /// * `Err(MachineError::UnknownInitialState)` if no instruction carries `initial_id`.
    pub fn new(input: &str, instructions: &str, initial_id: u64) -> Result<Self, MachineError> {
        Self::with_separator(input, instructions, initial_id, DEFAULT_SEPARATOR)
    }

    /// Like `new`, with instructions delimited by `separator` instead of newlines.
    pub fn with_separator(
        input: &str,
        instructions: &str,
        initial_id: u64,
        separator: &str,
    ) -> Result<Self, MachineError> {
        let tape = Tape::from_input(input)?;
        let instructions = InstructionSet::parse(instructions, separator)?;
        Self::from_parts(tape, instructions, StateId::from(initial_id))
    }

    /// Creates a machine from a program definition. Its initial id may be any length.
    pub fn from_program(program: &Program) -> Result<Self, MachineError> {
        let tape = Tape::from_input(&program.tape)?;
        let instructions = InstructionSet::parse(&program.instructions, &program.separator)?;
        Self::from_parts(tape, instructions, program.initial_id.clone())
    }

    /// Creates a machine from an already built tape and instruction set.
    ///
    /// The initial state is logged before the first instruction is resolved, so the
    /// first log entry carries no instruction. A missing transition for the initial
    /// symbol does not fail construction; the machine halts on its first step instead.
    pub fn from_parts(
        tape: Tape,
        instructions: InstructionSet,
        initial_id: StateId,
    ) -> Result<Self, MachineError> {
        if !instructions.instruction_with_id_exists(&initial_id) {
            return Err(MachineError::UnknownInitialState(initial_id));
        }

        let head = Head::new(&tape);
        let mut machine = Self {
            tape,
            head,
            instructions,
            initial_id,
            current_instruction: None,
            status: Status::Running,
            logger: Logger::new(),
            step_count: 0,
        };

        machine.log();
        machine.current_instruction = machine
            .instructions
            .find_instruction(&machine.initial_id, machine.head.read(&machine.tape))
            .cloned();

        tracing::debug!(
            initial_id = %machine.initial_id,
            instructions = machine.instructions.len(),
            tape = %machine.tape,
            "machine created"
        );

        Ok(machine)
    }

    /// Executes a single step of the machine.
    ///
    /// # Returns
    ///
    /// * `Ok(Step::Continue)` if an instruction was executed and a next one was found.
    /// * `Ok(Step::Halt)` if the step left the machine halted.
    /// * `Err(MachineError::MachineHalted)` if the machine was already halted. Nothing
    ///   changes in that case.
    pub fn step(&mut self) -> Result<Step, MachineError> {
        if self.is_halted() {
            return Err(MachineError::MachineHalted);
        }

        let Some(instruction) = self.current_instruction.clone() else {
            // The initial lookup missed: nothing executes, but the halt is still logged.
            self.log();
            self.halt();
            return Ok(Step::Halt);
        };

        self.execute(instruction.action());
        self.step_count += 1;
        self.log();

        let symbol = self.head.read(&self.tape);
        tracing::trace!(
            step = self.step_count,
            instruction = %instruction,
            tape = %self.tape,
            "executed instruction"
        );

        match self.instructions.find_instruction(instruction.next_id(), symbol) {
            Some(next) => {
                self.current_instruction = Some(next.clone());
                Ok(Step::Continue)
            }
            None => {
                self.halt();
                Ok(Step::Halt)
            }
        }
    }

    /// Steps the machine until it halts or `max_steps` steps have been executed.
    ///
    /// Returns `Step::Continue` if the step bound stopped the run.
    pub fn run_to_completion(&mut self, max_steps: usize) -> Step {
        for _ in 0..max_steps {
            match self.step() {
                Ok(Step::Continue) => continue,
                Ok(Step::Halt) | Err(_) => return Step::Halt,
            }
        }

        if self.is_halted() {
            Step::Halt
        } else {
            Step::Continue
        }
    }

    fn execute(&mut self, action: Action) {
        match action {
            Action::Write(symbol) => self.head.write(&mut self.tape, symbol),
            Action::Move(direction) => self.head.shift(&mut self.tape, direction),
        }
    }

    fn halt(&mut self) {
        self.status = Status::Halted;
        tracing::debug!(
            steps = self.step_count,
            tape = %self.tape,
            "machine halted"
        );
    }

    fn log(&mut self) {
        let entry = LogEntry::new(
            self.tape.print(),
            self.current_instruction.clone(),
            self.head_index(),
        );
        self.logger.log(entry);
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_halted(&self) -> bool {
        self.status == Status::Halted
    }

    /// The instruction about to execute, or the last executed one once halted.
    pub fn current_instruction(&self) -> Option<&Instruction> {
        self.current_instruction.as_ref()
    }

    /// The current instruction in its textual form, or an empty string if there is none.
    pub fn current_instruction_text(&self) -> String {
        self.current_instruction
            .as_ref()
            .map(|instruction| instruction.to_string())
            .unwrap_or_default()
    }

    pub fn current_tape_text(&self) -> String {
        self.tape.print()
    }

    /// 0-based head position counted from the left end of the tape.
    pub fn head_index(&self) -> usize {
        self.head.index(&self.tape)
    }

    pub fn initial_id(&self) -> &StateId {
        &self.initial_id
    }

    /// Returns the number of steps executed so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn head(&self) -> &Head {
        &self.head
    }

    pub fn instructions(&self) -> &InstructionSet {
        &self.instructions
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}
