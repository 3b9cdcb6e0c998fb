use crate::loader::ProgramLoader;
use crate::types::{MachineError, Program, StateId};

// Default embedded programs
const PROGRAM_TEXTS: [&str; 4] = [
    include_str!("../programs/unary-counter.json"),
    include_str!("../programs/unary-successor.json"),
    include_str!("../programs/unary-addition.json"),
    include_str!("../programs/unary-prepend.json"),
];

lazy_static::lazy_static! {
    /// The embedded programs, parsed on first access.
    pub static ref PROGRAMS: Result<Vec<Program>, MachineError> = ProgramManager::load();
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parses and validates every embedded program.
    ///
    /// The shared `PROGRAMS` registry calls this once; the first program that fails to
    /// load makes the whole catalogue unavailable.
    pub fn load() -> Result<Vec<Program>, MachineError> {
        PROGRAM_TEXTS
            .iter()
            .map(|text| {
                ProgramLoader::load_program_from_string(text).map_err(|e| {
                    tracing::error!(error = %e, "failed to parse embedded program");
                    e
                })
            })
            .collect()
    }

    fn programs() -> Result<&'static [Program], MachineError> {
        PROGRAMS.as_deref().map_err(Clone::clone)
    }

    /// Get the number of available programs
    pub fn get_program_count() -> Result<usize, MachineError> {
        Ok(Self::programs()?.len())
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, MachineError> {
        Self::programs()?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                MachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name, ignoring case
    pub fn get_program_by_name(name: &str) -> Result<Program, MachineError> {
        Self::programs()?
            .iter()
            .find(|program| program.name.eq_ignore_ascii_case(name))
            .cloned()
            .ok_or_else(|| MachineError::ValidationError(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_program_names() -> Result<Vec<String>, MachineError> {
        Ok(Self::programs()?
            .iter()
            .map(|program| program.name.clone())
            .collect())
    }

    /// Get information about a program by its index
    pub fn get_program_info(index: usize) -> Result<ProgramInfo, MachineError> {
        let program = Self::get_program_by_index(index)?;
        let machine = crate::machine::Machine::from_program(&program)?;
        let instructions = machine.instructions();

        let mut states: Vec<&StateId> = instructions.iter().map(|i| i.id()).collect();
        states.sort_unstable();
        states.dedup();

        Ok(ProgramInfo {
            index,
            name: program.name,
            initial_id: program.initial_id,
            initial_tape: program.tape,
            state_count: states.len(),
            instruction_count: instructions.len(),
        })
    }

    /// Get the embedded JSON text of a program by its index
    pub fn get_program_text_by_index(index: usize) -> Result<&'static str, MachineError> {
        PROGRAM_TEXTS.get(index).copied().ok_or_else(|| {
            MachineError::ValidationError(format!("Program text index {} out of range", index))
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_id: StateId,
    pub initial_tape: String,
    pub state_count: usize,
    pub instruction_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::Machine;
    use crate::types::{Status, Step};

    #[test]
    fn test_program_manager_initialization() {
        assert_eq!(ProgramManager::load().unwrap().len(), PROGRAM_TEXTS.len());
        assert_eq!(ProgramManager::get_program_count(), Ok(PROGRAM_TEXTS.len()));
    }

    #[test]
    fn test_registry_is_parsed_once() {
        let first = ProgramManager::programs().unwrap();
        let second = ProgramManager::programs().unwrap();
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn test_program_names() {
        let names = ProgramManager::list_program_names().unwrap();
        assert!(names.contains(&"Unary Counter".to_string()));
        assert!(names.contains(&"Unary Successor".to_string()));
        assert!(names.contains(&"Unary Addition".to_string()));
        assert!(names.contains(&"Unary Prepend".to_string()));
    }

    #[test]
    fn test_program_manager_get_program_by_index() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
        assert!(ProgramManager::get_program_text_by_index(0).is_ok());
        assert!(ProgramManager::get_program_text_by_index(999).is_err());
    }

    #[test]
    fn test_program_manager_get_program_by_name() {
        let program = ProgramManager::get_program_by_name("unary addition").unwrap();
        assert_eq!(program.tape, "11011");

        assert!(ProgramManager::get_program_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_program_manager_get_program_info() {
        let info = ProgramManager::get_program_info(0).unwrap();

        assert_eq!(info.index, 0);
        assert_eq!(info.name, "Unary Counter");
        assert_eq!(info.initial_id, StateId::from(1));
        assert_eq!(info.initial_tape, "1");
        assert_eq!(info.state_count, 1);
        assert_eq!(info.instruction_count, 2);

        assert!(ProgramManager::get_program_info(999).is_err());
    }

    #[test]
    fn test_programs_can_be_executed() {
        for i in 0..ProgramManager::get_program_count().unwrap() {
            let program = ProgramManager::get_program_by_index(i).unwrap();
            let mut machine = Machine::from_program(&program).unwrap();
            assert!(
                machine.step().is_ok(),
                "Program '{}' failed on first step",
                program.name
            );
        }
    }

    #[test]
    fn test_halting_programs_results() {
        let expected = [
            ("Unary Successor", "1111"),
            ("Unary Addition", "111100"),
            ("Unary Prepend", "111"),
        ];

        for (name, tape) in expected {
            let program = ProgramManager::get_program_by_name(name).unwrap();
            let mut machine = Machine::from_program(&program).unwrap();

            assert_eq!(machine.run_to_completion(100), Step::Halt, "{name}");
            assert_eq!(machine.status(), Status::Halted);
            assert_eq!(machine.current_tape_text(), tape, "{name}");
        }
    }
}
