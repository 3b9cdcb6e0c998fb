//! This module defines the unbounded, lazily grown tape and the `Head` cursor over it.
//!
//! Cells live in an arena owned by the `Tape` and refer to their neighbors by `CellId`.
//! A missing neighbor means the tape has not been extended in that direction yet.
//! Links are only ever filled in, never rewired, so walking left or right from any cell
//! visits cells in strictly monotonic serial order.

use crate::parser::parse_tape;
use crate::types::{Direction, MachineError, Symbol};
use std::fmt;

/// Index of a cell inside its tape's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellId(usize);

/// A single tape position.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    symbol: Symbol,
    left: Option<CellId>,
    right: Option<CellId>,
    serial_number: u64,
}

impl Cell {
    fn new(left: Option<CellId>, right: Option<CellId>, serial_number: u64) -> Self {
        Self {
            symbol: Symbol::default(),
            left,
            right,
            serial_number,
        }
    }

    pub fn symbol(&self) -> Symbol {
        self.symbol
    }

    pub fn left(&self) -> Option<CellId> {
        self.left
    }

    pub fn right(&self) -> Option<CellId> {
        self.right
    }

    /// Creation order of this cell on its tape. Never reused.
    pub fn serial_number(&self) -> u64 {
        self.serial_number
    }
}

/// An unbounded bidirectional sequence of cells grown from a single root.
#[derive(Debug, Clone, PartialEq)]
pub struct Tape {
    cells: Vec<Cell>,
    root: CellId,
    cell_count: u64,
}

impl Tape {
    /// Creates a tape holding a single blank root cell.
    pub fn new() -> Self {
        Self {
            cells: vec![Cell::new(None, None, 0)],
            root: CellId(0),
            cell_count: 1,
        }
    }

    /// Creates a tape and writes `input` left to right starting at the root cell.
    ///
    /// # Returns
    ///
    /// * `Ok(Tape)` if `input` only contains `0` and `1` (or is a single space).
    /// * `Err(MachineError::InvalidTapeContent)` otherwise.
    pub fn from_input(input: &str) -> Result<Self, MachineError> {
        let symbols = parse_tape(input)?;
        let mut tape = Self::new();
        let mut head = Head::new(&tape);

        for (i, &symbol) in symbols.iter().enumerate() {
            if i > 0 {
                head.move_right(&mut tape);
            }
            head.write(&mut tape, symbol);
        }

        Ok(tape)
    }

    /// The cell the tape was created with.
    pub fn root(&self) -> CellId {
        self.root
    }

    /// Returns the cell with the given id, or `None` if it does not belong to this tape.
    pub fn cell(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.0)
    }

    /// Number of materialized cells.
    pub fn width(&self) -> usize {
        self.cells.len()
    }

    /// Renders the full materialized content, left end to right end inclusive.
    pub fn print(&self) -> String {
        let mut head = Head::new(self);
        head.go_to_left_end(self);

        let mut content = String::with_capacity(self.width());
        content.push(head.read(self).as_char());
        while head.advance_right(self) {
            content.push(head.read(self).as_char());
        }

        content
    }

    // Heads only hold ids handed out by the tape they are used with.
    fn cell_at(&self, id: CellId) -> &Cell {
        &self.cells[id.0]
    }

    fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        &mut self.cells[id.0]
    }

    /// Materializes a new cell next to `from` and links it in both directions.
    fn extend(&mut self, from: CellId, direction: Direction) -> CellId {
        let id = CellId(self.cells.len());
        let serial_number = self.cell_count;
        self.cell_count += 1;

        let cell = match direction {
            Direction::Left => Cell::new(None, Some(from), serial_number),
            Direction::Right => Cell::new(Some(from), None, serial_number),
        };
        self.cells.push(cell);

        let from_cell = self.cell_mut(from);
        match direction {
            Direction::Left => from_cell.left = Some(id),
            Direction::Right => from_cell.right = Some(id),
        }

        tracing::trace!(serial_number, ?direction, "extended tape");
        id
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print())
    }
}

/// A cursor over one cell of a tape.
///
/// The head does not hold on to its tape; every operation takes the tape it was created
/// for. Reads and navigation along existing links only need `&Tape`, so any number of
/// heads can inspect a tape while the primary head stays put. Writes and moves that may
/// extend the tape take `&mut Tape`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Head {
    cell: CellId,
}

impl Head {
    /// Creates a head positioned on the tape's root cell.
    pub fn new(tape: &Tape) -> Self {
        Self { cell: tape.root() }
    }

    /// The cell currently under the head.
    pub fn cell(&self) -> CellId {
        self.cell
    }

    pub fn read(&self, tape: &Tape) -> Symbol {
        tape.cell_at(self.cell).symbol
    }

    /// Writes `symbol` to the current cell. No other cell or link is touched.
    pub fn write(&self, tape: &mut Tape, symbol: Symbol) {
        tape.cell_mut(self.cell).symbol = symbol;
    }

    /// Writes a symbol given as a character.
    ///
    /// # Returns
    ///
    /// * `Err(MachineError::InvalidSymbol)` if `symbol` is neither `0` nor `1`.
    pub fn write_char(&self, tape: &mut Tape, symbol: char) -> Result<(), MachineError> {
        self.write(tape, Symbol::try_from(symbol)?);
        Ok(())
    }

    pub fn is_at_left_end(&self, tape: &Tape) -> bool {
        tape.cell_at(self.cell).left.is_none()
    }

    pub fn is_at_right_end(&self, tape: &Tape) -> bool {
        tape.cell_at(self.cell).right.is_none()
    }

    /// Moves one cell to the left, extending the tape if needed.
    pub fn move_left(&mut self, tape: &mut Tape) {
        self.cell = match tape.cell_at(self.cell).left {
            Some(left) => left,
            None => tape.extend(self.cell, Direction::Left),
        };
    }

    /// Moves one cell to the right, extending the tape if needed.
    pub fn move_right(&mut self, tape: &mut Tape) {
        self.cell = match tape.cell_at(self.cell).right {
            Some(right) => right,
            None => tape.extend(self.cell, Direction::Right),
        };
    }

    pub fn shift(&mut self, tape: &mut Tape, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(tape),
            Direction::Right => self.move_right(tape),
        }
    }

    /// Follows the right link if it exists. Returns false at the right end.
    pub fn advance_right(&mut self, tape: &Tape) -> bool {
        match tape.cell_at(self.cell).right {
            Some(right) => {
                self.cell = right;
                true
            }
            None => false,
        }
    }

    /// Moves left until the left end of the materialized tape.
    pub fn go_to_left_end(&mut self, tape: &Tape) {
        while let Some(left) = tape.cell_at(self.cell).left {
            self.cell = left;
        }
    }

    pub fn serial_number(&self, tape: &Tape) -> u64 {
        tape.cell_at(self.cell).serial_number
    }

    /// The 0-based position of this head counted from the left end of the tape.
    ///
    /// Walks a second head from the left end until it reaches the same cell, so the
    /// cost is proportional to the materialized width.
    pub fn index(&self, tape: &Tape) -> usize {
        let target = self.serial_number(tape);
        let mut walker = Head::new(tape);
        walker.go_to_left_end(tape);

        let mut index = 0;
        while walker.serial_number(tape) != target {
            if !walker.advance_right(tape) {
                break;
            }
            index += 1;
        }

        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_new_tape_is_single_blank_cell() {
        let tape = Tape::new();
        let head = Head::new(&tape);

        assert_eq!(tape.print(), "0");
        assert_eq!(tape.width(), 1);
        assert!(head.is_at_left_end(&tape));
        assert!(head.is_at_right_end(&tape));
    }

    #[test]
    fn test_tape_from_input() {
        let tape = Tape::from_input("011011").unwrap();
        assert_eq!(tape.print(), "011011");
        assert_eq!(tape.to_string(), "011011");
    }

    #[test]
    fn test_tape_from_empty_input() {
        assert_eq!(Tape::from_input("").unwrap().print(), "0");
        assert_eq!(
            Tape::from_input(crate::types::EMPTY_TAPE_INPUT).unwrap().print(),
            "0"
        );
    }

    #[test]
    fn test_tape_from_invalid_input() {
        assert_eq!(
            Tape::from_input("0120"),
            Err(MachineError::InvalidTapeContent("0120".to_string()))
        );
    }

    #[test]
    fn test_head_moves_and_writes() {
        let mut tape = Tape::new();
        let mut head = Head::new(&tape);

        head.move_left(&mut tape);
        head.write(&mut tape, Symbol::One);
        head.move_right(&mut tape);
        head.move_right(&mut tape);
        head.write(&mut tape, Symbol::One);
        head.move_right(&mut tape);
        head.move_right(&mut tape);

        assert_eq!(tape.print(), "10100");
    }

    #[test]
    fn test_write_char_rejects_invalid_symbol() {
        let mut tape = Tape::new();
        let head = Head::new(&tape);

        assert_eq!(
            head.write_char(&mut tape, 'x'),
            Err(MachineError::InvalidSymbol('x'))
        );
        assert_eq!(head.write_char(&mut tape, '1'), Ok(()));
        assert_eq!(head.read(&tape), Symbol::One);
    }

    #[test]
    fn test_write_touches_only_current_cell() {
        let mut tape = Tape::from_input("000").unwrap();
        let mut head = Head::new(&tape);
        head.move_right(&mut tape);
        let before = tape.clone();

        head.write(&mut tape, Symbol::One);

        assert_eq!(tape.print(), "010");
        assert_eq!(tape.width(), before.width());
        for i in 0..tape.width() {
            let (a, b) = (&tape.cells[i], &before.cells[i]);
            assert_eq!((a.left, a.right), (b.left, b.right));
        }
    }

    #[test]
    fn test_moving_over_existing_cells_does_not_extend() {
        let mut tape = Tape::from_input("101").unwrap();
        let mut head = Head::new(&tape);

        head.move_right(&mut tape);
        head.move_right(&mut tape);
        head.move_left(&mut tape);
        assert_eq!(tape.width(), 3);

        head.move_right(&mut tape);
        head.move_right(&mut tape);
        assert_eq!(tape.width(), 4);
    }

    #[test]
    fn test_serial_numbers_are_monotonic() {
        let mut tape = Tape::new();
        let mut head = Head::new(&tape);

        head.move_left(&mut tape);
        head.move_left(&mut tape);
        head.move_right(&mut tape);
        head.move_right(&mut tape);
        head.move_right(&mut tape);

        let mut walker = Head::new(&tape);
        walker.go_to_left_end(&tape);
        let mut serials = vec![walker.serial_number(&tape)];
        while walker.advance_right(&tape) {
            serials.push(walker.serial_number(&tape));
        }

        assert_eq!(serials, vec![2, 1, 0, 3]);
    }

    #[test]
    fn test_head_index() {
        let mut tape = Tape::new();
        let mut head = Head::new(&tape);
        assert_eq!(head.index(&tape), 0);

        head.move_left(&mut tape);
        assert_eq!(head.index(&tape), 0);

        head.move_right(&mut tape);
        assert_eq!(head.index(&tape), 1);

        head.move_right(&mut tape);
        assert_eq!(head.index(&tape), 2);
    }

    #[test]
    fn test_cell_lookup() {
        let mut wide = Tape::new();
        let mut head = Head::new(&wide);
        head.move_right(&mut wide);
        head.write(&mut wide, Symbol::One);

        let cell = wide.cell(head.cell()).unwrap();
        assert_eq!(cell.symbol(), Symbol::One);
        assert_eq!(cell.left(), Some(wide.root()));
        assert_eq!(cell.serial_number(), 1);

        let narrow = Tape::new();
        assert!(narrow.cell(narrow.root()).is_some());
        assert_eq!(narrow.cell(head.cell()), None);
    }

    proptest! {
        #[test]
        fn head_index_matches_offset_from_leftmost_reach(
            moves in prop::collection::vec(prop::bool::ANY, 0..64)
        ) {
            let mut tape = Tape::new();
            let mut head = Head::new(&tape);

            // Offsets are relative to the root; the left end is the lowest one reached.
            let (mut offset, mut min_offset, mut max_offset) = (0i64, 0i64, 0i64);
            for right in moves {
                if right {
                    head.move_right(&mut tape);
                    offset += 1;
                } else {
                    head.move_left(&mut tape);
                    offset -= 1;
                }
                min_offset = min_offset.min(offset);
                max_offset = max_offset.max(offset);
            }

            prop_assert_eq!(head.index(&tape) as i64, offset - min_offset);
            prop_assert_eq!(tape.width() as i64, max_offset - min_offset + 1);
            prop_assert_eq!(tape.print().len(), tape.width());
        }
    }
}
