//! The transition table: a deterministic partial function from `(state, symbol)` to the
//! action the machine takes.
//!
//! Entries keep their insertion order so graph projections and saved files come out in
//! the same order the definition listed them.

use indexmap::{Equivalent, IndexMap};
use serde::{Deserialize, Serialize};

use crate::types::{Move, State, Symbol};

/// What the machine does when a transition fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The state the machine transitions to.
    pub next_state: State,
    /// The symbol written under the head before moving.
    pub write: Symbol,
    /// Where the head goes after writing.
    pub movement: Move,
}

/// Borrowed lookup key, so stepping doesn't allocate a `String` per lookup.
#[derive(Hash)]
struct Key<'a>(&'a str, Symbol);

impl Equivalent<(State, Symbol)> for Key<'_> {
    fn equivalent(&self, key: &(State, Symbol)) -> bool {
        self.0 == key.0 && self.1 == key.1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionTable {
    rules: IndexMap<(State, Symbol), Action>,
}

impl TransitionTable {
    /// Adds a rule and hands back the action it displaced, if any.
    pub(crate) fn insert(&mut self, state: State, symbol: Symbol, action: Action) -> Option<Action> {
        self.rules.insert((state, symbol), action)
    }

    /// Finds the action for the given state and symbol under the head.
    pub fn get(&self, state: &str, symbol: Symbol) -> Option<&Action> {
        self.rules.get(&Key(state, symbol))
    }

    /// Iterates `(state, symbol, action)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&State, Symbol, &Action)> {
        self.rules
            .iter()
            .map(|((state, symbol), action)| (state, *symbol, action))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(next_state: &str, write: char, movement: Move) -> Action {
        Action {
            next_state: next_state.to_string(),
            write: Symbol::new(write),
            movement,
        }
    }

    #[test]
    fn test_lookup_by_borrowed_state() {
        let mut table = TransitionTable::default();
        table.insert("q0".to_string(), Symbol::new('a'), action("q1", 'b', Move::Right));

        let found = table.get("q0", Symbol::new('a')).unwrap();
        assert_eq!(found.next_state, "q1");
        assert_eq!(found.write, Symbol::new('b'));

        assert!(table.get("q0", Symbol::new('b')).is_none());
        assert!(table.get("q1", Symbol::new('a')).is_none());
    }

    #[test]
    fn test_insert_reports_displaced_action() {
        let mut table = TransitionTable::default();
        let first = table.insert("q0".to_string(), Symbol::new('a'), action("q1", 'a', Move::Stay));
        let second = table.insert("q0".to_string(), Symbol::new('a'), action("q2", 'a', Move::Stay));

        assert!(first.is_none());
        assert_eq!(second, Some(action("q1", 'a', Move::Stay)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_iteration_keeps_insertion_order() {
        let mut table = TransitionTable::default();
        table.insert("q1".to_string(), Symbol::new('b'), action("q0", 'b', Move::Left));
        table.insert("q0".to_string(), Symbol::new('a'), action("q1", 'a', Move::Right));
        table.insert("q1".to_string(), Symbol::new('a'), action("q1", 'a', Move::Right));

        let keys: Vec<_> = table
            .iter()
            .map(|(state, symbol, _)| (state.as_str(), symbol.as_char()))
            .collect();
        assert_eq!(keys, vec![("q1", 'b'), ("q0", 'a'), ("q1", 'a')]);
    }
}
