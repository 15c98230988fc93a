//! Static machine definitions.
//!
//! A [`Document`] is the serialized record exactly as it appears on disk: plain strings and
//! integers, nothing checked. A [`MachineDefinition`] is what a document becomes once
//! [`analyze`](crate::analyzer::analyze) has verified every cross reference. Only the latter
//! can drive a [`TuringMachine`](crate::TuringMachine).

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::analyzer::{analyze, ValidationError};
use crate::table::TransitionTable;
use crate::types::{State, Symbol};

/// The on-disk shape of a machine definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub description: String,
    pub states: Vec<String>,
    pub input_alphabet: Vec<String>,
    pub tape_alphabet: Vec<String>,
    pub init_state: String,
    pub final_states: Vec<String>,
    pub transition_function: Vec<TransitionRecord>,
}

/// One entry of `transition_function`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub state: String,
    pub symbol: String,
    pub new_state: String,
    pub new_symbol: String,
    /// Kept as a raw integer so an out of range value is a validation error, not a format one.
    #[serde(rename = "move")]
    pub movement: i64,
}

/// A validated, immutable machine definition.
///
/// Sets keep declaration order; equality ignores it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineDefinition {
    pub(crate) description: String,
    pub(crate) states: IndexSet<State>,
    pub(crate) input_alphabet: IndexSet<Symbol>,
    pub(crate) tape_alphabet: IndexSet<Symbol>,
    pub(crate) transitions: TransitionTable,
    pub(crate) initial_state: State,
    pub(crate) final_states: IndexSet<State>,
}

impl MachineDefinition {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn states(&self) -> &IndexSet<State> {
        &self.states
    }

    pub fn input_alphabet(&self) -> &IndexSet<Symbol> {
        &self.input_alphabet
    }

    pub fn tape_alphabet(&self) -> &IndexSet<Symbol> {
        &self.tape_alphabet
    }

    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    pub fn initial_state(&self) -> &str {
        &self.initial_state
    }

    pub fn final_states(&self) -> &IndexSet<State> {
        &self.final_states
    }

    pub fn is_final_state(&self, state: &str) -> bool {
        self.final_states.contains(state)
    }

    /// Legal on the tape: a tape alphabet symbol or the blank.
    pub fn is_tape_symbol(&self, symbol: Symbol) -> bool {
        symbol.is_blank() || self.tape_alphabet.contains(&symbol)
    }
}

impl TryFrom<&Document> for MachineDefinition {
    type Error = ValidationError;

    fn try_from(document: &Document) -> Result<Self, Self::Error> {
        analyze(document, "")
    }
}

impl From<&MachineDefinition> for Document {
    fn from(definition: &MachineDefinition) -> Self {
        Self {
            description: definition.description.clone(),
            states: definition.states.iter().cloned().collect(),
            input_alphabet: definition.input_alphabet.iter().map(|&s| String::from(s)).collect(),
            tape_alphabet: definition.tape_alphabet.iter().map(|&s| String::from(s)).collect(),
            init_state: definition.initial_state.clone(),
            final_states: definition.final_states.iter().cloned().collect(),
            transition_function: definition
                .transitions
                .iter()
                .map(|(state, symbol, action)| TransitionRecord {
                    state: state.clone(),
                    symbol: symbol.into(),
                    new_state: action.next_state.clone(),
                    new_symbol: action.write.into(),
                    movement: action.movement.into(),
                })
                .collect(),
        }
    }
}

fn join<T: fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Multi-line dump of the whole definition, one transition per line.
impl fmt::Display for MachineDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TuringMachine: {}", self.description)?;
        writeln!(f, "states: {{{}}}", join(&self.states))?;
        writeln!(f, "input alphabet: {{{}}}", join(&self.input_alphabet))?;
        writeln!(f, "tape alphabet: {{{}}}", join(&self.tape_alphabet))?;
        writeln!(f, "function:")?;
        for (state, symbol, action) in self.transitions.iter() {
            writeln!(
                f,
                "\t({} {}) -> ({} {} {:?})",
                state, symbol, action.next_state, action.write, action.movement
            )?;
        }
        writeln!(f, "init: {}", self.initial_state)?;
        write!(f, "final: {{{}}}", join(&self.final_states))
    }
}
