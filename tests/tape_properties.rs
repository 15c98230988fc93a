//! Property-based tests for the tape and machine status invariants.

use proptest::prelude::*;
use tmviz::{CancellationToken, Move, ProgramManager, Symbol, Tape, TuringMachine, BLANK};

fn movement() -> impl Strategy<Value = Move> {
    prop_oneof![Just(Move::Left), Just(Move::Stay), Just(Move::Right)]
}

fn cell() -> impl Strategy<Value = Symbol> {
    prop_oneof![Just(BLANK), Just(Symbol::new('a')), Just(Symbol::new('b'))]
}

proptest! {
    /// The tape is never empty and the head never leaves it.
    #[test]
    fn prop_head_stays_in_bounds(
        start in proptest::collection::vec(cell(), 0..8),
        ops in proptest::collection::vec((proptest::option::of(cell()), movement()), 0..64),
    ) {
        let mut tape = Tape::new(start, 0);
        for (write, movement) in ops {
            if let Some(symbol) = write {
                tape.write(symbol);
            }
            tape.shift(movement);
            prop_assert!(tape.len() >= 1);
            prop_assert!(tape.head() < tape.len());
        }
    }

    /// After a move, blanks survive only under the head or between non-blank cells.
    #[test]
    fn prop_trim_leaves_no_padding(
        start in proptest::collection::vec(cell(), 0..8),
        ops in proptest::collection::vec((cell(), movement()), 1..64),
    ) {
        let mut tape = Tape::new(start, 0);
        for (symbol, movement) in ops {
            tape.write(symbol);
            tape.shift(movement);

            let cells = tape.cells();
            let last = cells.len() - 1;
            prop_assert!(!cells[0].is_blank() || tape.head() == 0);
            prop_assert!(!cells[last].is_blank() || tape.head() == last);
        }
    }

    /// Staying put never changes the tape.
    #[test]
    fn prop_stay_is_idempotent(start in proptest::collection::vec(cell(), 0..8), times in 1usize..5) {
        let mut tape = Tape::new(start, 0);
        tape.shift(Move::Stay);
        let once = tape.clone();
        for _ in 0..times {
            tape.shift(Move::Stay);
        }
        prop_assert_eq!(tape, once);
    }

    /// A machine is never accepted and rejected at the same time, at any step.
    #[test]
    fn prop_accept_and_reject_are_exclusive(input in "[ab]{0,8}") {
        let definition = ProgramManager::get_program_by_name("palindrome").unwrap();
        let mut machine = TuringMachine::new(definition, &input).unwrap();

        loop {
            prop_assert!(!(machine.is_accepted() && machine.is_rejected()));
            if machine.is_final() {
                break;
            }
            machine.step();
        }

        let reversed: String = input.chars().rev().collect();
        prop_assert_eq!(machine.is_accepted(), reversed == input);
    }

    /// Running twice from the same seed ends in the same place.
    #[test]
    fn prop_runs_are_deterministic(input in "[01]{0,10}") {
        let definition = ProgramManager::get_program_by_name("binary-increment").unwrap();
        let run = || {
            let mut machine = TuringMachine::new(definition.clone(), &input).unwrap();
            machine.run(&CancellationToken::new());
            (machine.state().to_string(), machine.tape().clone(), machine.step_count())
        };
        prop_assert_eq!(run(), run());
    }
}
