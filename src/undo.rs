//! Snapshots and the undo/redo stack discipline.
//!
//! A [`Snapshot`] captures the entire history at a point in time;
//! [`Checkpoints`] holds two stacks of them. Saving pushes onto the undo
//! stack and clears the redo stack (a new action invalidates any future
//! redo). The oldest snapshot on the undo stack is a floor: undo never
//! returns it directly, only restores *to* it. Callers are expected to save
//! an empty baseline snapshot at session start so that undoing the very
//! first operation lands on empty history.
//!
//! Neither operation errors; running out of history is communicated as
//! `None` and should be rendered as "nothing to undo/redo".

use im::Vector;

use crate::history::HistoryEntry;

/// An immutable copy of the full history contents at save time.
///
/// Backed by a persistent vector, so capture and restore are O(1) while
/// still behaving as deep copies: no mutation of the live store can ever
/// reach a snapshot taken earlier.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    entries: Vector<HistoryEntry>,
}

impl Snapshot {
    /// Captures the given sequence as-is, without transformation.
    pub fn capture(entries: &Vector<HistoryEntry>) -> Self {
        Self {
            entries: entries.clone(),
        }
    }

    /// Returns a fresh, independent copy of the captured entries. Each call
    /// yields mutation-safe data; callers may freely modify the result.
    pub fn restore(&self) -> Vector<HistoryEntry> {
        self.entries.clone()
    }
}

/// Two unbounded stacks of snapshots governing save/undo/redo transitions.
#[derive(Debug, Default)]
pub struct Checkpoints {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl Checkpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a snapshot of the present state. This is the only operation
    /// that clears redo history.
    pub fn save(&mut self, snapshot: Snapshot) {
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
    }

    /// Steps back one saved state, returning the state *before* the undone
    /// action, or `None` at the floor (one or zero saved snapshots).
    pub fn undo(&mut self) -> Option<Vector<HistoryEntry>> {
        if self.undo_stack.len() <= 1 {
            return None;
        }
        let undone = self.undo_stack.pop()?;
        self.redo_stack.push(undone);
        self.undo_stack.last().map(Snapshot::restore)
    }

    /// Re-applies the most recently undone state, returning the state
    /// *after* it, or `None` when there is nothing to redo.
    pub fn redo(&mut self) -> Option<Vector<HistoryEntry>> {
        let redone = self.redo_stack.pop()?;
        let entries = redone.restore();
        self.undo_stack.push(redone);
        Some(entries)
    }

    /// The most recently saved state, if any.
    pub fn current(&self) -> Option<Vector<HistoryEntry>> {
        self.undo_stack.last().map(Snapshot::restore)
    }
}
