//! This module provides the `ProgramLoader` struct, responsible for loading machine
//! definitions from JSON files and strings.

use crate::machine::Machine;
use crate::types::{MachineError, Program, MAX_PROGRAM_SIZE};
use std::fs;
use std::path::{Path, PathBuf};

/// `ProgramLoader` is a utility struct for loading programs.
/// It provides methods to load programs from individual files, from string content,
/// and to discover and load all `.json` files within a specified directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads a single program from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(Program)` if the file is read, parsed and describes a constructible machine.
    /// * `Err(MachineError::FileError)` if the file cannot be read, is too large or is not
    ///   valid program JSON.
    /// * Any construction error of `Machine` if the definition itself is invalid.
    pub fn load_program(path: &Path) -> Result<Program, MachineError> {
        let content = fs::read_to_string(path).map_err(|e| {
            MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
        })?;

        Self::load_program_from_string(&content)
    }

    /// Loads a single program from JSON content.
    ///
    /// The program is validated by building a machine from it, so a loaded program is
    /// always runnable.
    pub fn load_program_from_string(content: &str) -> Result<Program, MachineError> {
        if content.len() > MAX_PROGRAM_SIZE {
            return Err(MachineError::FileError(format!(
                "Program is {} bytes, the limit is {} bytes",
                content.len(),
                MAX_PROGRAM_SIZE
            )));
        }

        let program: Program = serde_json::from_str(content)
            .map_err(|e| MachineError::FileError(format!("Invalid program: {}", e)))?;

        Machine::from_program(&program)?;

        Ok(program)
    }

    /// Loads all program files (`.json` extension) from a given directory.
    ///
    /// Directories and non-`.json` files are skipped. Each element of the result is
    /// either the path and program that was loaded, or the error for that file.
    pub fn load_programs(directory: &Path) -> Vec<Result<(PathBuf, Program), MachineError>> {
        if !directory.exists() {
            return vec![Err(MachineError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(MachineError::FileError(format!(
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
                        return Some(Err(MachineError::FileError(format!(
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

                match Self::load_program(&path) {
                    Ok(program) => Some(Ok((path, program))),
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "skipping program");
                        Some(Err(MachineError::FileError(format!(
                            "Failed to load program from {}: {}",
                            path.display(),
                            e
                        ))))
                    }
                }
            })
            .collect()
    }
}
