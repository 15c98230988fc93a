//! This crate provides the core of a single-tape Turing machine simulator.
//! It includes modules for loading and validating machine definitions, executing them step by
//! step or in the background, and projecting their transition function onto a directed graph
//! for rendering.

pub mod analyzer;
pub mod definition;
pub mod graph;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod runner;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` function and `ValidationError` enum from the analyzer module.
pub use analyzer::{analyze, ValidationError};
/// Re-exports the definition types.
pub use definition::{Document, MachineDefinition, TransitionRecord};
/// Re-exports the graph projection.
pub use graph::{project, Edge, Graph, Node, Roles};
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::MachineLoader;
/// Re-exports the `TuringMachine` struct from the machine module.
pub use machine::TuringMachine;
/// Re-exports `ProgramManager` and `PROGRAMS` from the programs module.
pub use programs::{ProgramManager, PROGRAMS};
/// Re-exports the background execution types.
pub use runner::{CancellationToken, Runner, RunnerConfig, Snapshot};
pub use table::{Action, TransitionTable};
pub use tape::Tape;
/// Re-exports various types related to machine execution from the types module.
pub use types::{
    Halt, Move, State, Status, Step, Symbol, TuringMachineError, ACCEPT_STATE, BLANK,
    MAX_EXECUTION_STEPS, REJECT_STATE,
};
