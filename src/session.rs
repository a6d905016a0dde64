//! The calculator session: one owned context object per REPL or one-shot
//! invocation, with no ambient global state.
//!
//! A session owns the history store, the undo/redo checkpoints, the
//! registered observers, and the persistence sink. `compute` performs the
//! whole unit: resolve, validate, apply, append, snapshot, notify. Failures
//! before the append leave every piece of state untouched; an observer
//! failure happens strictly after the store and checkpoints have been
//! updated, and does not roll them back.

use im::Vector;

use crate::config::Config;
use crate::errors::CalcError;
use crate::history::{HistoryEntry, HistoryStore};
use crate::observer::{notify_all, Observer};
use crate::ops::Op;
use crate::persist::HistorySink;
use crate::undo::{Checkpoints, Snapshot};

pub struct Session {
    config: Config,
    history: HistoryStore,
    checkpoints: Checkpoints,
    observers: Vec<Box<dyn Observer>>,
    sink: Box<dyn HistorySink>,
}

impl Session {
    /// Creates a session with an empty history and a baseline snapshot
    /// already saved, so undoing the very first operation restores empty
    /// history rather than reporting nothing to undo.
    pub fn new(config: Config, sink: Box<dyn HistorySink>) -> Self {
        let history = HistoryStore::new();
        let mut checkpoints = Checkpoints::new();
        checkpoints.save(Snapshot::capture(&history.entries()));
        Self {
            config,
            history,
            checkpoints,
            observers: Vec::new(),
            sink,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Registers an observer; dispatch order is registration order.
    pub fn register_observer(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    /// Resolves and applies one operation, records it, snapshots the new
    /// history, and notifies observers. Returns the numeric result.
    pub fn compute(&mut self, name: &str, a: f64, b: f64) -> Result<f64, CalcError> {
        let op = Op::resolve(name)?;
        self.check_operand(a)?;
        self.check_operand(b)?;
        let result = op.apply(a, b)?;

        // State mutation starts here; everything above is fallible-but-pure.
        let entry = HistoryEntry::new(op.name(), a, b, result);
        self.history.append(entry.clone());
        self.history.trim_to(self.config.max_history_size);
        self.checkpoints.save(Snapshot::capture(&self.history.entries()));

        notify_all(&mut self.observers, &entry, &self.history)?;
        Ok(result)
    }

    /// Steps the history back one saved state. Returns the restored
    /// entries, or `None` when there is nothing to undo.
    pub fn undo(&mut self) -> Option<Vector<HistoryEntry>> {
        let entries = self.checkpoints.undo()?;
        self.history.replace_all(entries.clone());
        Some(entries)
    }

    /// Re-applies the most recently undone state. Returns the restored
    /// entries, or `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<Vector<HistoryEntry>> {
        let entries = self.checkpoints.redo()?;
        self.history.replace_all(entries.clone());
        Some(entries)
    }

    /// Current history contents for display. Presentation (numbering,
    /// precision) belongs to the caller.
    pub fn history_view(&self) -> Vector<HistoryEntry> {
        self.history.entries()
    }

    /// Empties the history. Recorded as a checkpoint, so it can be undone.
    pub fn clear_history(&mut self) {
        self.history.replace_all(Vector::new());
        self.checkpoints.save(Snapshot::capture(&self.history.entries()));
    }

    /// Writes the current history through the persistence sink.
    pub fn save_history(&mut self) -> Result<(), CalcError> {
        self.sink.save(&self.history.entries())
    }

    /// Replaces the history with the persisted table, if one exists.
    /// Returns whether anything was loaded. The loaded state is saved as a
    /// checkpoint so the load itself is undoable.
    pub fn load_history(&mut self) -> Result<bool, CalcError> {
        match self.sink.load()? {
            Some(entries) => {
                self.history.replace_all(entries);
                self.checkpoints.save(Snapshot::capture(&self.history.entries()));
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn check_operand(&self, value: f64) -> Result<(), CalcError> {
        if !value.is_finite() {
            return Err(CalcError::validation(format!(
                "operand {} is not a finite number",
                value
            )));
        }
        if value.abs() > self.config.max_input_value {
            return Err(CalcError::validation(format!(
                "operand {} exceeds the maximum input value {}",
                value, self.config.max_input_value
            )));
        }
        Ok(())
    }
}
