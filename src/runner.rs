//! Background execution.
//!
//! A [`Runner`] moves a [`TuringMachine`] onto a worker thread that owns it exclusively.
//! The worker steps it at a fixed interval and publishes an immutable [`Snapshot`] after
//! every step, so observers never see a machine mid-step and never share it. Stopping the
//! runner hands the machine back in whatever consistent state its last step left it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::graph::{project, Graph};
use crate::machine::TuringMachine;
use crate::types::{Halt, Status, Step, Symbol};

/// A cloneable flag for interrupting a run between steps.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Pacing for a [`Runner`].
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Pause between two steps.
    pub interval: Duration,
    /// Stop after this many steps even if the machine hasn't halted.
    pub max_steps: Option<usize>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            max_steps: None,
        }
    }
}

/// An immutable picture of the machine between two steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub state: String,
    pub cells: Vec<Symbol>,
    pub head: usize,
    pub step_count: usize,
    pub status: Status,
    pub graph: Graph,
    /// Set on the last snapshot the worker publishes.
    pub halt: Option<Halt>,
}

impl Snapshot {
    pub fn capture(machine: &TuringMachine) -> Self {
        Self {
            state: machine.state().to_string(),
            cells: machine.tape().cells().to_vec(),
            head: machine.tape().head(),
            step_count: machine.step_count(),
            status: machine.status(),
            graph: project(machine),
            halt: None,
        }
    }
}

pub struct Runner {
    token: CancellationToken,
    snapshots: Receiver<Snapshot>,
    handle: JoinHandle<TuringMachine>,
}

impl Runner {
    /// Starts stepping `machine` on a new thread.
    ///
    /// The first snapshot is the machine as handed over, before any step.
    pub fn spawn(machine: TuringMachine, config: RunnerConfig) -> Self {
        let token = CancellationToken::new();
        let (sender, snapshots) = mpsc::channel();

        let worker_token = token.clone();
        let handle = thread::spawn(move || work(machine, config, worker_token, sender));

        Self {
            token,
            snapshots,
            handle,
        }
    }

    /// A handle for cancelling this runner from elsewhere.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }

    pub fn snapshots(&self) -> &Receiver<Snapshot> {
        &self.snapshots
    }

    /// Drains pending snapshots and returns the newest, without blocking.
    pub fn latest(&self) -> Option<Snapshot> {
        self.snapshots.try_iter().last()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancels the run and takes the machine back.
    pub fn stop(self) -> Result<TuringMachine, crate::TuringMachineError> {
        self.token.cancel();
        self.join()
    }

    /// Waits for the run to end on its own and takes the machine back.
    pub fn join(self) -> Result<TuringMachine, crate::TuringMachineError> {
        self.handle
            .join()
            .map_err(|_| crate::TuringMachineError::WorkerPanicked)
    }
}

fn work(
    mut machine: TuringMachine,
    config: RunnerConfig,
    token: CancellationToken,
    sender: Sender<Snapshot>,
) -> TuringMachine {
    log::debug!("Runner started in state {}", machine.state());

    if sender.send(Snapshot::capture(&machine)).is_err() {
        return machine;
    }

    let mut steps = 0;
    let halt = loop {
        if machine.is_final() {
            break Halt::Final;
        }
        if token.is_cancelled() || config.max_steps.is_some_and(|max| steps >= max) {
            break Halt::Interrupted;
        }

        let step = machine.step();
        steps += 1;

        if let Step::Halt(halt) = step {
            break halt;
        }
        // Observers hung up; nobody is watching this run anymore.
        if sender.send(Snapshot::capture(&machine)).is_err() {
            break Halt::Interrupted;
        }

        if !config.interval.is_zero() {
            thread::sleep(config.interval);
        }
    };

    log::debug!(
        "Runner stopped in state {} after {} steps: {:?}",
        machine.state(),
        steps,
        halt
    );

    let mut last = Snapshot::capture(&machine);
    last.halt = Some(halt);
    let _ = sender.send(last);

    machine
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::Document;

    fn create_machine(input: &str) -> TuringMachine {
        let document: Document = serde_json::from_str(
            r#"{
                "description": "walk right",
                "states": ["q0", "Q_acc", "Q_rej"],
                "input_alphabet": ["1"],
                "tape_alphabet": ["1"],
                "init_state": "q0",
                "final_states": ["Q_acc", "Q_rej"],
                "transition_function": [
                    {"state": "q0", "symbol": "1", "new_state": "q0", "new_symbol": "1", "move": 1},
                    {"state": "q0", "symbol": "□", "new_state": "Q_acc", "new_symbol": "□", "move": 0}
                ]
            }"#,
        )
        .unwrap();
        TuringMachine::from_document(&document, input).unwrap()
    }

    fn create_looping_machine() -> TuringMachine {
        let document: Document = serde_json::from_str(
            r#"{
                "description": "never halts",
                "states": ["q0", "Q_acc"],
                "input_alphabet": ["1"],
                "tape_alphabet": ["1"],
                "init_state": "q0",
                "final_states": ["Q_acc"],
                "transition_function": [
                    {"state": "q0", "symbol": "□", "new_state": "q0", "new_symbol": "□", "move": 1}
                ]
            }"#,
        )
        .unwrap();
        TuringMachine::from_document(&document, "").unwrap()
    }

    fn quick() -> RunnerConfig {
        RunnerConfig {
            interval: Duration::ZERO,
            max_steps: None,
        }
    }

    #[test]
    fn test_token() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());

        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_runs_to_completion() {
        let runner = Runner::spawn(create_machine("111"), quick());
        let machine = runner.join().unwrap();

        assert!(machine.is_accepted());
        assert_eq!(machine.step_count(), 4);
    }

    #[test]
    fn test_publishes_every_step() {
        let runner = Runner::spawn(create_machine("11"), quick());
        let snapshots: Vec<Snapshot> = runner.snapshots().iter().collect();

        // initial, three steps, final
        assert_eq!(snapshots.len(), 5);
        assert_eq!(snapshots[0].step_count, 0);
        assert_eq!(snapshots[0].status, Status::Running);
        assert!(snapshots[0].graph.node("q0").unwrap().roles.current);

        let counts: Vec<_> = snapshots.iter().map(|s| s.step_count).collect();
        assert_eq!(counts, vec![0, 1, 2, 3, 3]);

        let last = snapshots.last().unwrap();
        assert_eq!(last.status, Status::Accepted);
        assert_eq!(last.halt, Some(Halt::Final));
        assert!(runner.join().is_ok());
    }

    #[test]
    fn test_stop_interrupts_endless_run() {
        let config = RunnerConfig {
            interval: Duration::from_millis(1),
            max_steps: None,
        };
        let runner = Runner::spawn(create_looping_machine(), config);
        thread::sleep(Duration::from_millis(20));

        let machine = runner.stop().unwrap();
        assert_eq!(machine.state(), "q0");
        assert!(!machine.is_final());
    }

    #[test]
    fn test_max_steps() {
        let config = RunnerConfig {
            interval: Duration::ZERO,
            max_steps: Some(7),
        };
        let machine = Runner::spawn(create_looping_machine(), config)
            .join()
            .unwrap();

        assert_eq!(machine.step_count(), 7);
    }

    #[test]
    fn test_latest_snapshot() {
        let runner = Runner::spawn(create_machine("1"), quick());
        while !runner.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }

        let latest = runner.latest().unwrap();
        assert_eq!(latest.halt, Some(Halt::Final));
        assert_eq!(latest.state, "Q_acc");
        assert!(runner.latest().is_none());
    }
}
