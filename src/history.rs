//! The in-memory operation history.
//!
//! The store is backed by an `im::Vector`, so every view handed out is a
//! cheap persistent copy: mutating the live store can never reach through a
//! previously returned view or snapshot. Insertion order is chronological.

use im::Vector;
use serde::{Deserialize, Serialize};

/// One recorded computation. Immutable once created; equality is structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub operation: String,
    pub a: f64,
    pub b: f64,
    pub result: f64,
}

impl HistoryEntry {
    pub fn new(operation: impl Into<String>, a: f64, b: f64, result: f64) -> Self {
        Self {
            operation: operation.into(),
            a,
            b,
            result,
        }
    }
}

/// Ordered sequence of past computations, owned by a single session.
///
/// Appended on each successful operation; wholesale-replaced on undo/redo
/// restoration and on explicit load.
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vector<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one entry at the end. Always succeeds; operand ranges are the
    /// caller's responsibility.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
    }

    /// Wholesale-replaces the stored sequence. Entry provenance is not
    /// validated; undo/redo and load are the intended callers.
    pub fn replace_all(&mut self, entries: Vector<HistoryEntry>) {
        self.entries = entries;
    }

    /// Current contents as a persistent copy for display or capture.
    pub fn entries(&self) -> Vector<HistoryEntry> {
        self.entries.clone()
    }

    /// Drops the oldest entries until at most `max` remain.
    pub fn trim_to(&mut self, max: usize) {
        if self.entries.len() > max {
            let excess = self.entries.len() - max;
            self.entries = self.entries.split_off(excess);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
