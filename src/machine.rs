//! This module defines the `TuringMachine` struct, which executes a validated
//! [`MachineDefinition`] against a single tape. It owns the live execution state (current
//! state, tape, step count) and exposes stepping, running, resetting and status queries.

use crate::analyzer::{analyze, check_tape, ValidationError};
use crate::definition::{Document, MachineDefinition};
use crate::runner::CancellationToken;
use crate::table::Action;
use crate::tape::Tape;
use crate::types::{Halt, State, Status, Step, Symbol, ACCEPT_STATE, REJECT_STATE};

/// A single-tape deterministic Turing machine.
///
/// The machine can only be built from a validated definition, and the tape can only be
/// replaced with content that passes [`check_tape`], so the machine never holds a symbol
/// its definition doesn't allow.
#[derive(Debug, Clone)]
pub struct TuringMachine {
    definition: MachineDefinition,
    state: State,
    tape: Tape,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a machine in its initial state with `input` on the tape.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` if every symbol of `input` is legal on the tape.
    /// * `Err(ValidationError::InvalidTapeSymbol)` otherwise.
    pub fn new(definition: MachineDefinition, input: &str) -> Result<Self, ValidationError> {
        check_tape(&definition, input)?;
        Ok(Self::with_tape(definition, Tape::from_input(input)))
    }

    /// Validates `document` and the seed tape together, then builds the machine.
    pub fn from_document(document: &Document, input: &str) -> Result<Self, ValidationError> {
        let definition = analyze(document, input)?;
        Ok(Self::with_tape(definition, Tape::from_input(input)))
    }

    fn with_tape(definition: MachineDefinition, tape: Tape) -> Self {
        Self {
            state: definition.initial_state.clone(),
            definition,
            tape,
            step_count: 0,
        }
    }

    /// Executes a single step.
    ///
    /// Stepping a machine that is already in a final state does nothing and returns
    /// `Step::Halt(Halt::Final)`. When no transition matches the current state and symbol,
    /// the machine moves to [`REJECT_STATE`] and returns `Step::Halt(Halt::Undefined)`;
    /// the tape is left untouched.
    pub fn step(&mut self) -> Step {
        if self.is_final() {
            return Step::Halt(Halt::Final);
        }

        let symbol = self.tape.read();
        let Some(action) = self.definition.transitions.get(&self.state, symbol) else {
            log::info!(
                "Invalid transition from ({}, {}), rejecting",
                self.state,
                symbol
            );
            let state = std::mem::replace(&mut self.state, REJECT_STATE.to_string());
            return Step::Halt(Halt::Undefined { state, symbol });
        };

        log::trace!(
            "({} {}) -> ({} {} {:?})",
            self.state,
            symbol,
            action.next_state,
            action.write,
            action.movement
        );

        self.tape.write(action.write);
        self.tape.shift(action.movement);
        self.state.clone_from(&action.next_state);
        self.step_count += 1;

        Step::Continue
    }

    /// Runs until the machine halts or `token` is cancelled.
    ///
    /// The token is checked between steps, never during one, so an interrupted machine is
    /// left exactly as its last completed step made it and can be resumed.
    pub fn run(&mut self, token: &CancellationToken) -> Halt {
        self.run_until(|| token.is_cancelled())
    }

    /// Replaces the tape with `input` (head on the first cell) and runs from the current state.
    pub fn run_on(&mut self, input: &str, token: &CancellationToken) -> Result<Halt, ValidationError> {
        self.set_tape(input)?;
        Ok(self.run(token))
    }

    /// Runs for at most `max_steps` steps.
    pub fn run_limit(&mut self, max_steps: usize) -> Halt {
        let mut remaining = max_steps;
        self.run_until(move || {
            if remaining == 0 {
                return true;
            }
            remaining -= 1;
            false
        })
    }

    fn run_until(&mut self, mut interrupted: impl FnMut() -> bool) -> Halt {
        loop {
            if self.is_final() {
                return Halt::Final;
            }
            if interrupted() {
                return Halt::Interrupted;
            }
            if let Step::Halt(halt) = self.step() {
                return halt;
            }
        }
    }

    /// Returns to the initial state with a fresh tape holding `input`.
    ///
    /// The definition is untouched. Nothing changes if `input` is rejected.
    pub fn reset(&mut self, input: &str) -> Result<(), ValidationError> {
        self.set_tape(input)?;
        self.state.clone_from(&self.definition.initial_state);
        self.step_count = 0;
        Ok(())
    }

    /// Replaces the tape, leaving the current state alone.
    pub fn set_tape(&mut self, input: &str) -> Result<(), ValidationError> {
        check_tape(&self.definition, input)?;
        self.tape = Tape::from_input(input);
        Ok(())
    }

    /// Keeps only the characters of `raw` that belong to the input alphabet.
    pub fn filter_input(&self, raw: &str) -> String {
        raw.chars()
            .filter(|&c| self.definition.input_alphabet.contains(&Symbol::from(c)))
            .collect()
    }

    pub fn is_final(&self) -> bool {
        self.definition.is_final_state(&self.state)
    }

    /// True in the final accepting state.
    pub fn is_accepted(&self) -> bool {
        self.is_final() && self.state == ACCEPT_STATE
    }

    /// True in the final rejecting state, and in every state that is not final.
    pub fn is_rejected(&self) -> bool {
        (self.is_final() && self.state == REJECT_STATE) || !self.is_final()
    }

    pub fn status(&self) -> Status {
        if !self.is_final() {
            Status::Running
        } else if self.is_accepted() {
            Status::Accepted
        } else if self.is_rejected() {
            Status::Rejected
        } else {
            Status::Halted
        }
    }

    /// Returns the transition that would fire on the next step, if any.
    pub fn transition(&self) -> Option<&Action> {
        self.definition.transitions.get(&self.state, self.tape.read())
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn definition(&self) -> &MachineDefinition {
        &self.definition
    }

    /// Returns the number of transitions applied since construction or the last reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }
}
