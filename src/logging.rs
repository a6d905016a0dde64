//! Log sinks.
//!
//! The sink trait is the seam that makes logging injectable and testable:
//! production code appends to a file, tests capture lines in memory.

use std::cell::RefCell;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::rc::Rc;

use crate::errors::CalcError;

/// Destination for formatted log lines.
pub trait LogSink {
    fn append(&mut self, line: &str) -> Result<(), CalcError>;
}

/// Appends lines to a log file, creating it (and its parent directory) on
/// first use.
pub struct FileLog {
    path: PathBuf,
}

impl FileLog {
    pub fn new(path: PathBuf) -> Result<Self, CalcError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| CalcError::LogWrite {
                path: path.clone(),
                source,
            })?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl LogSink for FileLog {
    fn append(&mut self, line: &str) -> Result<(), CalcError> {
        let write = || -> std::io::Result<()> {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.path)?;
            writeln!(file, "{}", line)
        };
        write().map_err(|source| CalcError::LogWrite {
            path: self.path.clone(),
            source,
        })
    }
}

/// Collects lines in memory for tests or programmatic capture. Clones share
/// the same buffer, so a handle kept by the test observes appends made
/// through an observer that owns another clone.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl LogSink for MemoryLog {
    fn append(&mut self, line: &str) -> Result<(), CalcError> {
        self.lines.borrow_mut().push(line.to_string());
        Ok(())
    }
}
