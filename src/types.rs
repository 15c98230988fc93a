//! This module defines the core data structures and types shared across the simulator:
//! tape symbols, head movements, execution outcomes and the error taxonomy.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::analyzer::ValidationError;

/// The reserved blank symbol. Never part of a declared alphabet, always legal on the tape.
pub const BLANK: Symbol = Symbol('□');
/// Name of the accepting state by convention.
pub const ACCEPT_STATE: &str = "Q_acc";
/// Name of the rejecting state by convention. Undefined transitions land here.
pub const REJECT_STATE: &str = "Q_rej";
/// The default number of steps `run_limit` executes before giving up.
pub const MAX_EXECUTION_STEPS: usize = 10000;

/// A machine state identifier.
pub type State = String;

/// A single tape symbol.
///
/// The one-character invariant is structural: a `Symbol` wraps exactly one `char`, and
/// the only fallible way in is [`Symbol::try_from`] on a string, which rejects anything
/// that is not exactly one character long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol(char);

impl Symbol {
    pub const fn new(c: char) -> Self {
        Self(c)
    }

    pub fn as_char(self) -> char {
        self.0
    }

    pub fn is_blank(self) -> bool {
        self == BLANK
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        Self(c)
    }
}

impl TryFrom<&str> for Symbol {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Self(c)),
            _ => Err(ValidationError::MultiCharacterSymbol(value.to_string())),
        }
    }
}

impl TryFrom<String> for Symbol {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.0.to_string()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Represents the possible directions the head can move.
///
/// Serialized as the integers `-1`, `0` and `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Move {
    /// Move the head one position to the left.
    Left,
    /// Keep the head in the same position.
    Stay,
    /// Move the head one position to the right.
    Right,
}

impl Move {
    pub fn delta(self) -> i64 {
        match self {
            Move::Left => -1,
            Move::Stay => 0,
            Move::Right => 1,
        }
    }

    /// The short form used on graph edge labels.
    pub fn label(self) -> &'static str {
        match self {
            Move::Left => "-",
            Move::Stay => "0",
            Move::Right => "+",
        }
    }
}

impl TryFrom<i64> for Move {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Move::Left),
            0 => Ok(Move::Stay),
            1 => Ok(Move::Right),
            other => Err(ValidationError::InvalidMove(other)),
        }
    }
}

impl From<Move> for i64 {
    fn from(movement: Move) -> Self {
        movement.delta()
    }
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A transition was applied.
    Continue,
    /// The machine did not apply a transition.
    Halt(Halt),
}

/// Why the machine stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum Halt {
    /// The current state is a final state. Stepping a final machine is a no-op.
    Final,
    /// No transition exists for `(state, symbol)`; the machine moved to [`REJECT_STATE`].
    Undefined { state: State, symbol: Symbol },
    /// Execution was cancelled or hit its step limit between two steps.
    Interrupted,
}

/// Coarse machine status for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    /// Not yet in a final state.
    Running,
    Accepted,
    Rejected,
    /// Final, but neither the accepting nor the rejecting state.
    Halted,
}

/// Represents the errors surfaced by the simulator's fallible operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// The serialized definition is structurally malformed (missing fields, wrong types).
    #[error("Format error: {0}")]
    FormatError(String),
    /// The definition is well formed but violates a machine invariant.
    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),
    /// Reading or writing a definition file failed.
    #[error("File error: {0}")]
    FileError(String),
    /// No built-in sample machine matches the requested name or index.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The background runner thread panicked.
    #[error("Runner thread panicked")]
    WorkerPanicked,
}

impl From<serde_json::Error> for TuringMachineError {
    fn from(error: serde_json::Error) -> Self {
        TuringMachineError::FormatError(error.to_string())
    }
}
