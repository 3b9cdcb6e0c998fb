//! Append-only execution history.

use crate::instruction::Instruction;
use serde::Serialize;

/// A snapshot of the machine taken after construction or after a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEntry {
    tape: String,
    instruction: Option<Instruction>,
    head_index: usize,
}

impl LogEntry {
    pub fn new(tape: String, instruction: Option<Instruction>, head_index: usize) -> Self {
        Self {
            tape,
            instruction,
            head_index,
        }
    }

    /// Full tape content at the time of the snapshot.
    pub fn tape(&self) -> &str {
        &self.tape
    }

    /// The machine's current instruction at the time of the snapshot.
    pub fn instruction(&self) -> Option<&Instruction> {
        self.instruction.as_ref()
    }

    /// The instruction in its textual form, if there was one.
    pub fn instruction_text(&self) -> Option<String> {
        self.instruction
            .as_ref()
            .map(|instruction| instruction.to_string())
    }

    /// 0-based head position counted from the left end of the tape.
    pub fn head_index(&self) -> usize {
        self.head_index
    }
}

/// An ordered sequence of log entries. Entries are never changed or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Logger {
    entries: Vec<LogEntry>,
}

impl Logger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// The most recently appended entry, or `None` before anything was logged.
    pub fn last_entry(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_logger() {
        let logger = Logger::new();
        assert!(logger.is_empty());
        assert_eq!(logger.last_entry(), None);
    }

    #[test]
    fn test_log_appends_in_order() {
        let mut logger = Logger::new();
        let instruction: Instruction = "1,1,R,1".parse().unwrap();

        logger.log(LogEntry::new("1".into(), None, 0));
        logger.log(LogEntry::new("10".into(), Some(instruction), 1));

        assert_eq!(logger.len(), 2);
        assert_eq!(logger.entries()[0].tape(), "1");
        assert_eq!(logger.entries()[0].instruction_text(), None);

        let last = logger.last_entry().unwrap();
        assert_eq!(last.tape(), "10");
        assert_eq!(last.instruction_text().as_deref(), Some("1,1,R,1"));
        assert_eq!(last.head_index(), 1);
    }

    #[test]
    fn test_logger_serializes_as_array() {
        let mut logger = Logger::new();
        logger.log(LogEntry::new("0".into(), None, 0));

        let json = serde_json::to_value(&logger).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "tape": "0", "instruction": null, "head_index": 0 }])
        );
    }
}
