//! The machine's tape: a finite window over a conceptually infinite tape.
//!
//! The window grows by one blank cell whenever the head steps past either end and is
//! trimmed back after every move, so it only ever holds the non-blank extent plus the
//! cell under the head.

use std::fmt;

use crate::types::{Move, Symbol, BLANK};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: Vec<Symbol>,
    head: usize,
}

impl Tape {
    /// Creates a tape over `cells` with the head on `head`.
    ///
    /// An empty cell list collapses to a single blank, and an out of range head is
    /// clamped to the last cell.
    pub fn new(cells: Vec<Symbol>, head: usize) -> Self {
        let cells = if cells.is_empty() { vec![BLANK] } else { cells };
        let head = head.min(cells.len() - 1);
        Self { cells, head }
    }

    /// One cell per character of `input`, head on the first cell.
    pub fn from_input(input: &str) -> Self {
        Self::new(input.chars().map(Symbol::from).collect(), 0)
    }

    pub fn read(&self) -> Symbol {
        self.cells[self.head]
    }

    /// Overwrites the cell under the head. Whether `symbol` is legal is the caller's concern.
    pub fn write(&mut self, symbol: Symbol) {
        self.cells[self.head] = symbol;
    }

    /// Moves the head, growing the tape with a blank if it steps off either end, then trims.
    pub fn shift(&mut self, movement: Move) {
        match movement {
            Move::Left => {
                if self.head == 0 {
                    // Extend tape to the left
                    self.cells.insert(0, BLANK);
                } else {
                    self.head -= 1;
                }
            }
            Move::Right => {
                self.head += 1;
                if self.head >= self.cells.len() {
                    self.cells.push(BLANK);
                }
            }
            Move::Stay => {}
        }

        self.trim();
    }

    /// Strips blank runs from both ends, never past the head.
    fn trim(&mut self) {
        let leading = self.cells[..self.head]
            .iter()
            .take_while(|s| s.is_blank())
            .count();
        self.cells.drain(..leading);
        self.head -= leading;

        let trailing = self.cells[self.head + 1..]
            .iter()
            .rev()
            .take_while(|s| s.is_blank())
            .count();
        self.cells.truncate(self.cells.len() - trailing);
    }

    pub fn head(&self) -> usize {
        self.head
    }

    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false; a tape holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The tape contents as a plain string, blanks included.
    pub fn content(&self) -> String {
        self.cells.iter().map(|s| s.as_char()).collect()
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new(Vec::new(), 0)
    }
}

/// Renders `a [b] c`: the head cell bracketed, the others padded to the same width.
impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.cells.iter().enumerate() {
            if i == self.head {
                write!(f, "[{}]", symbol)?;
            } else {
                write!(f, " {} ", symbol)?;
            }
        }
        Ok(())
    }
}
