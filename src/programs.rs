//! Built-in sample machines, embedded at compile time.

use crate::loader::MachineLoader;
use crate::types::TuringMachineError;
use crate::MachineDefinition;

use std::sync::RwLock;

// Default embedded machines
const PROGRAM_TEXTS: [(&str, &str); 3] = [
    (
        "unary-increment",
        include_str!("../machines/unary-increment.json"),
    ),
    ("palindrome", include_str!("../machines/palindrome.json")),
    (
        "binary-increment",
        include_str!("../machines/binary-increment.json"),
    ),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<(String, MachineDefinition)>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parses the embedded machines into the registry, once.
    pub fn load() -> Result<(), TuringMachineError> {
        let mut write_guard = PROGRAMS.write().map_err(|_| {
            TuringMachineError::FileError("Failed to acquire write lock".to_string())
        })?;

        if !write_guard.is_empty() {
            return Ok(());
        }

        for (name, text) in PROGRAM_TEXTS {
            match MachineLoader::parse(text) {
                Ok(definition) => write_guard.push((name.to_string(), definition)),
                Err(e) => log::warn!("Failed to parse embedded machine {}: {}", name, e),
            }
        }

        Ok(())
    }

    /// Get the number of available machines
    pub fn count() -> usize {
        let _ = Self::load();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    pub fn get_program_by_index(index: usize) -> Result<MachineDefinition, TuringMachineError> {
        let _ = Self::load();

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .map(|(_, definition)| definition.clone())
            .ok_or_else(|| TuringMachineError::NotFound(format!("Machine index {} out of range", index)))
    }

    pub fn get_program_by_name(name: &str) -> Result<MachineDefinition, TuringMachineError> {
        let _ = Self::load();

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|(program_name, _)| program_name == name)
            .map(|(_, definition)| definition.clone())
            .ok_or_else(|| TuringMachineError::NotFound(format!("Machine '{}' not found", name)))
    }

    /// List all machine names
    pub fn list_program_names() -> Vec<String> {
        let _ = Self::load();

        PROGRAMS
            .read()
            .map(|programs| programs.iter().map(|(name, _)| name.clone()).collect())
            .unwrap_or_else(|_| Vec::new())
    }

    /// Get the original JSON text of a machine by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, TuringMachineError> {
        PROGRAM_TEXTS
            .get(index)
            .map(|(_, text)| *text)
            .ok_or_else(|| {
                TuringMachineError::NotFound(format!(
                    "Machine text index {} out of range",
                    index
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::TuringMachine;
    use crate::runner::CancellationToken;

    fn run(name: &str, input: &str) -> TuringMachine {
        let definition = ProgramManager::get_program_by_name(name).unwrap();
        let mut machine = TuringMachine::new(definition, input).unwrap();
        machine.run(&CancellationToken::new());
        machine
    }

    #[test]
    fn test_all_programs_are_loaded() {
        assert!(ProgramManager::load().is_ok());
        assert_eq!(ProgramManager::count(), PROGRAM_TEXTS.len());
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names();
        assert_eq!(
            names,
            vec!["unary-increment", "palindrome", "binary-increment"]
        );
    }

    #[test]
    fn test_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(matches!(
            ProgramManager::get_program_by_index(999),
            Err(TuringMachineError::NotFound(_))
        ));
        assert!(matches!(
            ProgramManager::get_program_text_by_index(999),
            Err(TuringMachineError::NotFound(_))
        ));

        let text = ProgramManager::get_program_text_by_index(1).unwrap();
        assert!(text.contains("Palindrome"));
    }

    #[test]
    fn test_get_program_by_name() {
        let definition = ProgramManager::get_program_by_name("binary-increment").unwrap();
        assert_eq!(definition.initial_state(), "seek");

        assert_eq!(
            ProgramManager::get_program_by_name("Nonexistent"),
            Err(TuringMachineError::NotFound(
                "Machine 'Nonexistent' not found".to_string()
            ))
        );
    }

    #[test]
    fn test_unary_increment() {
        let machine = run("unary-increment", "111");
        assert!(machine.is_accepted());
        assert_eq!(machine.tape().content(), "1111");
    }

    #[test]
    fn test_palindromes() {
        for input in ["", "a", "aba", "abba", "babbab"] {
            assert!(run("palindrome", input).is_accepted(), "{:?}", input);
        }
        for input in ["ab", "abb", "aab", "babba"] {
            assert!(run("palindrome", input).is_rejected(), "{:?}", input);
        }
    }

    #[test]
    fn test_binary_increment() {
        for (input, expected) in [("0", "1"), ("1011", "1100"), ("111", "1000"), ("", "1")] {
            let machine = run("binary-increment", input);
            assert!(machine.is_accepted());
            assert_eq!(machine.tape().content(), expected, "{:?}", input);
        }
    }
}
