//! Durable history persistence.
//!
//! The history file is a flat table of `operation,a,b,result` rows with a
//! header line. Operation names are a closed set of lowercase identifiers
//! and the remaining columns are plain numbers, so no quoting or escaping
//! is ever needed. A missing file is not an error; it simply means no
//! history has been saved yet.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use im::Vector;

use crate::errors::CalcError;
use crate::history::HistoryEntry;

const HEADER: &str = "operation,a,b,result";

/// Destination for the durable history table.
pub trait HistorySink {
    fn save(&mut self, entries: &Vector<HistoryEntry>) -> Result<(), CalcError>;

    /// Loads the persisted history, or `Ok(None)` when nothing has been
    /// saved yet.
    fn load(&mut self) -> Result<Option<Vector<HistoryEntry>>, CalcError>;
}

/// Reads and writes the history table at a fixed path.
pub struct CsvHistoryFile {
    path: PathBuf,
}

impl CsvHistoryFile {
    pub fn new(path: PathBuf) -> Result<Self, CalcError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CalcError::HistoryPersist {
                message: format!("failed to create history directory for {:?}", path),
                source: Some(source),
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    fn parse_row(line: &str, line_number: usize) -> Result<HistoryEntry, CalcError> {
        let malformed = || CalcError::HistoryPersist {
            message: format!("malformed history row at line {}: '{}'", line_number, line),
            source: None,
        };
        let fields: Vec<&str> = line.split(',').collect();
        let [operation, a, b, result] = fields.as_slice() else {
            return Err(malformed());
        };
        Ok(HistoryEntry {
            operation: operation.to_string(),
            a: a.parse().map_err(|_| malformed())?,
            b: b.parse().map_err(|_| malformed())?,
            result: result.parse().map_err(|_| malformed())?,
        })
    }
}

impl HistorySink for CsvHistoryFile {
    fn save(&mut self, entries: &Vector<HistoryEntry>) -> Result<(), CalcError> {
        let mut table = String::from(HEADER);
        table.push('\n');
        for entry in entries {
            table.push_str(&format!(
                "{},{},{},{}\n",
                entry.operation, entry.a, entry.b, entry.result
            ));
        }
        fs::write(&self.path, table).map_err(|source| CalcError::HistoryPersist {
            message: format!("failed to save history to {:?}", self.path),
            source: Some(source),
        })
    }

    fn load(&mut self) -> Result<Option<Vector<HistoryEntry>>, CalcError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let table = fs::read_to_string(&self.path).map_err(|source| CalcError::HistoryPersist {
            message: format!("failed to load history from {:?}", self.path),
            source: Some(source),
        })?;

        let mut entries = Vector::new();
        for (index, line) in table.lines().enumerate() {
            // Header occupies line 1; blank trailing lines are harmless.
            if index == 0 || line.is_empty() {
                continue;
            }
            entries.push_back(Self::parse_row(line, index + 1)?);
        }
        Ok(Some(entries))
    }
}

/// In-memory sink for tests. Clones share state, so a handle kept by the
/// test sees saves made through a sink owned by the session or an observer.
#[derive(Debug, Clone, Default)]
pub struct MemoryHistorySink {
    state: Rc<RefCell<MemoryHistoryState>>,
}

#[derive(Debug, Default)]
struct MemoryHistoryState {
    saved: Vec<Vector<HistoryEntry>>,
    preload: Option<Vector<HistoryEntry>>,
}

impl MemoryHistorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose next `load` returns the given entries.
    pub fn with_preload(entries: Vector<HistoryEntry>) -> Self {
        let sink = Self::default();
        sink.state.borrow_mut().preload = Some(entries);
        sink
    }

    /// Number of times `save` has been called.
    pub fn save_count(&self) -> usize {
        self.state.borrow().saved.len()
    }

    /// The most recently saved sequence, if any.
    pub fn last_saved(&self) -> Option<Vector<HistoryEntry>> {
        self.state.borrow().saved.last().cloned()
    }
}

impl HistorySink for MemoryHistorySink {
    fn save(&mut self, entries: &Vector<HistoryEntry>) -> Result<(), CalcError> {
        self.state.borrow_mut().saved.push(entries.clone());
        Ok(())
    }

    fn load(&mut self) -> Result<Option<Vector<HistoryEntry>>, CalcError> {
        Ok(self.state.borrow().preload.clone())
    }
}
