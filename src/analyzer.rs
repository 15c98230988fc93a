//! This module validates machine definitions before any machine is built from them.
//!
//! Checks run in a fixed order and stop at the first violation, so the error reported for a
//! definition with several problems is always the same one:
//!
//! 1. both alphabets are non-empty
//! 2. every alphabet symbol is exactly one character
//! 3. the input alphabet is a subset of the tape alphabet
//! 4. at least one state is declared
//! 5. the initial state is declared
//! 6. every final state is declared
//! 7. every seed tape symbol is in the tape alphabet or blank
//! 8. every transition references declared states, legal symbols and a legal move
//!
//! A `(state, symbol)` pair listed twice keeps its first position in the table and takes the
//! later action.

use indexmap::IndexSet;
use thiserror::Error;

use crate::definition::{Document, MachineDefinition, TransitionRecord};
use crate::table::{Action, TransitionTable};
use crate::types::{Move, State, Symbol, BLANK};

/// Identifies which invariant a machine definition violates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Input alphabet is empty")]
    EmptyInputAlphabet,
    #[error("Tape alphabet is empty")]
    EmptyTapeAlphabet,
    /// A symbol that is not exactly one character long.
    #[error("Symbol {0:?} is not exactly one character")]
    MultiCharacterSymbol(String),
    #[error("Input symbols missing from the tape alphabet: {0:?}")]
    InputNotInTapeAlphabet(Vec<Symbol>),
    #[error("No states declared")]
    EmptyStates,
    #[error("Initial state {0:?} is not declared")]
    UnknownInitialState(String),
    #[error("Final states are not declared: {0:?}")]
    UnknownFinalStates(Vec<String>),
    /// The seed tape holds a symbol outside the tape alphabet.
    #[error("Tape symbol {0:?} is not in the tape alphabet")]
    InvalidTapeSymbol(Symbol),
    /// A transition references a state that is not declared.
    #[error("Transition references undeclared state {0:?}")]
    UnknownTransitionState(String),
    /// A transition reads or writes a symbol outside the tape alphabet.
    #[error("Transition references symbol {0:?} outside the tape alphabet")]
    UnknownTransitionSymbol(Symbol),
    #[error("Invalid move {0}, expected -1, 0 or 1")]
    InvalidMove(i64),
}

/// Validates `document` together with the seed tape `input` and builds the definition.
///
/// # Returns
///
/// * `Ok(MachineDefinition)` if every check passes.
/// * `Err(ValidationError)` describing the first violated invariant.
pub fn analyze(document: &Document, input: &str) -> Result<MachineDefinition, ValidationError> {
    check_alphabets_not_empty(document)?;
    let input_alphabet = parse_alphabet(&document.input_alphabet)?;
    let tape_alphabet = parse_alphabet(&document.tape_alphabet)?;
    check_input_subset(&input_alphabet, &tape_alphabet)?;

    let states: IndexSet<State> = document.states.iter().cloned().collect();
    check_states(&states, document)?;
    let final_states: IndexSet<State> = document.final_states.iter().cloned().collect();

    check_symbols(input.chars().map(Symbol::from), &tape_alphabet)?;

    let mut transitions = TransitionTable::default();
    for record in &document.transition_function {
        let (state, symbol, action) = check_transition(record, &states, &tape_alphabet)?;
        if transitions.insert(state.clone(), symbol, action).is_some() {
            log::warn!(
                "Transition for state {} and symbol {} listed twice, keeping the later one",
                state,
                symbol
            );
        }
    }

    Ok(MachineDefinition {
        description: document.description.clone(),
        states,
        input_alphabet,
        tape_alphabet,
        transitions,
        initial_state: document.init_state.clone(),
        final_states,
    })
}

/// Checks that every symbol on a seed tape is legal for an already validated definition.
pub fn check_tape(definition: &MachineDefinition, input: &str) -> Result<(), ValidationError> {
    check_symbols(input.chars().map(Symbol::from), &definition.tape_alphabet)
}

fn check_alphabets_not_empty(document: &Document) -> Result<(), ValidationError> {
    if document.input_alphabet.is_empty() {
        return Err(ValidationError::EmptyInputAlphabet);
    }
    if document.tape_alphabet.is_empty() {
        return Err(ValidationError::EmptyTapeAlphabet);
    }
    Ok(())
}

fn parse_alphabet(symbols: &[String]) -> Result<IndexSet<Symbol>, ValidationError> {
    symbols.iter().map(|s| Symbol::try_from(s.as_str())).collect()
}

fn check_input_subset(
    input_alphabet: &IndexSet<Symbol>,
    tape_alphabet: &IndexSet<Symbol>,
) -> Result<(), ValidationError> {
    let missing: Vec<Symbol> = input_alphabet.difference(tape_alphabet).copied().collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InputNotInTapeAlphabet(missing))
    }
}

/// Checks the declared states and the initial and final states against them.
fn check_states(states: &IndexSet<State>, document: &Document) -> Result<(), ValidationError> {
    if states.is_empty() {
        return Err(ValidationError::EmptyStates);
    }

    if !states.contains(&document.init_state) {
        return Err(ValidationError::UnknownInitialState(
            document.init_state.clone(),
        ));
    }

    let unknown: Vec<String> = document
        .final_states
        .iter()
        .filter(|state| !states.contains(*state))
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(ValidationError::UnknownFinalStates(unknown));
    }

    Ok(())
}

fn check_symbols(
    mut symbols: impl Iterator<Item = Symbol>,
    tape_alphabet: &IndexSet<Symbol>,
) -> Result<(), ValidationError> {
    match symbols.find(|s| *s != BLANK && !tape_alphabet.contains(s)) {
        Some(symbol) => Err(ValidationError::InvalidTapeSymbol(symbol)),
        None => Ok(()),
    }
}

fn check_transition(
    record: &TransitionRecord,
    states: &IndexSet<State>,
    tape_alphabet: &IndexSet<Symbol>,
) -> Result<(State, Symbol, Action), ValidationError> {
    let known_state = |state: &String| -> Result<State, ValidationError> {
        if states.contains(state) {
            Ok(state.clone())
        } else {
            Err(ValidationError::UnknownTransitionState(state.clone()))
        }
    };
    let known_symbol = |symbol: &str| -> Result<Symbol, ValidationError> {
        let symbol = Symbol::try_from(symbol)?;
        if symbol == BLANK || tape_alphabet.contains(&symbol) {
            Ok(symbol)
        } else {
            Err(ValidationError::UnknownTransitionSymbol(symbol))
        }
    };

    let state = known_state(&record.state)?;
    let symbol = known_symbol(&record.symbol)?;
    let next_state = known_state(&record.new_state)?;
    let write = known_symbol(&record.new_symbol)?;
    let movement = Move::try_from(record.movement)?;

    Ok((
        state,
        symbol,
        Action {
            next_state,
            write,
            movement,
        },
    ))
}
