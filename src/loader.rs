//! This module provides the `MachineLoader` struct, responsible for reading machine
//! definitions from JSON files or strings and writing them back out.
//!
//! Only the static definition is stored. A loaded machine always starts in its initial
//! state on a single blank cell; seeding the tape is up to the caller.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::definition::{Document, MachineDefinition};
use crate::machine::TuringMachine;
use crate::types::TuringMachineError;

/// `MachineLoader` is a utility struct for loading and saving machine definitions.
pub struct MachineLoader;

impl MachineLoader {
    /// Loads a machine from the JSON file at `path`.
    ///
    /// # Returns
    ///
    /// * `Ok(TuringMachine)` on a blank tape if the file parses and validates.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::FormatError)` if a field is missing or mistyped.
    /// * `Err(TuringMachineError::ValidationError)` if the definition is inconsistent.
    pub fn load(path: &Path) -> Result<TuringMachine, TuringMachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        log::debug!("Loading machine from {}", path.display());
        Self::load_from_str(&content)
    }

    /// Loads a machine from JSON text.
    pub fn load_from_str(content: &str) -> Result<TuringMachine, TuringMachineError> {
        let definition = Self::parse(content)?;
        Ok(TuringMachine::new(definition, "")?)
    }

    /// Parses and validates a definition without building a machine.
    pub fn parse(content: &str) -> Result<MachineDefinition, TuringMachineError> {
        let document: Document = serde_json::from_str(content)?;
        Ok(MachineDefinition::try_from(&document)?)
    }

    /// Serializes the definition as pretty JSON with four-space indentation.
    pub fn to_string(definition: &MachineDefinition) -> Result<String, TuringMachineError> {
        let mut buffer = Vec::new();
        write_document(&mut buffer, definition)?;
        String::from_utf8(buffer).map_err(|e| TuringMachineError::FormatError(e.to_string()))
    }

    /// Writes `machine`'s definition to `path`, creating parent directories as needed.
    ///
    /// The current state and tape are not saved.
    pub fn save(machine: &TuringMachine, path: &Path) -> Result<(), TuringMachineError> {
        let file_error = |e: std::io::Error| {
            TuringMachineError::FileError(format!(
                "Failed to write file {}: {}",
                path.display(),
                e
            ))
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(file_error)?;
        }

        let mut writer = BufWriter::new(File::create(path).map_err(file_error)?);
        write_document(&mut writer, machine.definition())?;
        writer.flush().map_err(file_error)?;

        log::debug!("Saved machine to {}", path.display());
        Ok(())
    }

    /// Loads every `.json` file in `directory`.
    ///
    /// Subdirectories and other files are skipped. Each element is either the path and its
    /// machine or the error that file produced.
    pub fn load_all(directory: &Path) -> Vec<Result<(PathBuf, TuringMachine), TuringMachineError>> {
        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(TuringMachineError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(TuringMachineError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and non-.json files
                if path.is_dir() || path.extension().is_none_or(|ext| ext != "json") {
                    return None;
                }

                Some(Self::load(&path).map(|machine| (path, machine)))
            })
            .collect()
    }
}

fn write_document<W: Write>(
    writer: W,
    definition: &MachineDefinition,
) -> Result<(), TuringMachineError> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
    Document::from(definition).serialize(&mut serializer)?;
    Ok(())
}
