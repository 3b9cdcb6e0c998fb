//! This module provides the parser for the textual encodings the interpreter accepts,
//! utilizing the `pest` crate. The grammar in `grammar.pest` covers single instructions
//! and initial tape content; instruction sets are split on a configurable separator and
//! each segment is parsed on its own.

use crate::{
    instruction::Instruction,
    types::{Action, MachineError, StateId, Symbol},
};
use pest::{
    iterators::{Pair, Pairs},
    Parser as PestParser,
};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct InstructionParser;

/// Parses a single instruction of the form `id,condition,action,next_id`.
///
/// The text must match exactly: no surrounding whitespace and no signs. Ids may have
/// any number of digits, including leading zeros, and are kept as written.
///
/// # Returns
///
/// * `Ok(Instruction)` if the text is a valid instruction.
/// * `Err(MachineError::InvalidInstructionFormat)` otherwise.
pub fn parse_instruction(input: &str) -> Result<Instruction, MachineError> {
    let invalid = || MachineError::InvalidInstructionFormat(input.to_string());

    let root = InstructionParser::parse(Rule::instruction, input)
        .map_err(|_| invalid())?
        .next()
        .ok_or_else(invalid)?;

    let mut pairs = root.into_inner();
    let id = parse_number(&mut pairs).ok_or_else(invalid)?;
    let condition = parse_symbol(&mut pairs).ok_or_else(invalid)?;
    let action = parse_action(&mut pairs).ok_or_else(invalid)??;
    let next_id = parse_number(&mut pairs).ok_or_else(invalid)?;

    Ok(Instruction::new(id, condition, action, next_id))
}

/// Splits an instruction set text on `separator` and parses every segment.
///
/// Each segment is validated independently, so an empty segment (for example one
/// produced by a trailing separator) is rejected like any other malformed instruction.
/// With the newline separator a trailing `\r` is stripped from each line.
pub fn parse_instructions(input: &str, separator: &str) -> Result<Vec<Instruction>, MachineError> {
    if separator.is_empty() {
        return Err(MachineError::InvalidSeparator);
    }

    input
        .split(separator)
        .map(|segment| {
            let segment = if separator == "\n" {
                segment.strip_suffix('\r').unwrap_or(segment)
            } else {
                segment
            };
            parse_instruction(segment)
        })
        .collect()
}

/// Parses initial tape content into symbols, left to right.
///
/// Accepts any string of `0` and `1`, including the empty string. A single space is
/// accepted as a synonym for the empty tape.
pub fn parse_tape(input: &str) -> Result<Vec<Symbol>, MachineError> {
    let root = InstructionParser::parse(Rule::tape, input)
        .map_err(|_| MachineError::InvalidTapeContent(input.to_string()))?
        .next()
        .ok_or_else(|| MachineError::InvalidTapeContent(input.to_string()))?;

    root.into_inner()
        .filter(|pair| pair.as_rule() == Rule::symbol)
        .map(|pair| symbol_of(&pair))
        .collect()
}

fn parse_number(pairs: &mut Pairs<Rule>) -> Option<StateId> {
    StateId::parse(pairs.next()?.as_str()).ok()
}

fn parse_symbol(pairs: &mut Pairs<Rule>) -> Option<Symbol> {
    pairs.next().and_then(|pair| symbol_of(&pair).ok())
}

fn parse_action(pairs: &mut Pairs<Rule>) -> Option<Result<Action, MachineError>> {
    let pair = pairs.next()?;
    Some(Action::try_from(first_char(&pair)?))
}

fn symbol_of(pair: &Pair<Rule>) -> Result<Symbol, MachineError> {
    let c = first_char(pair).ok_or(MachineError::InvalidSymbol(' '))?;
    Symbol::try_from(c)
}

fn first_char(pair: &Pair<Rule>) -> Option<char> {
    pair.as_str().chars().next()
}
