//! Observers notified after each successful computation.
//!
//! Dispatch is synchronous and in registration order. A failing observer
//! stops the loop and surfaces as an observability error; earlier observers
//! have already run, and the history append and snapshot save it follows are
//! never rolled back. Failures are visible, not swallowed.

use chrono::Local;

use crate::errors::CalcError;
use crate::history::{HistoryEntry, HistoryStore};
use crate::logging::LogSink;
use crate::persist::HistorySink;

/// A listener for successful operations. The entry describes the operation
/// just performed; the store is the full history including it, for observers
/// that persist state rather than react to the single event.
pub trait Observer {
    /// Short stable name used when reporting a failed notification.
    fn name(&self) -> &'static str;

    fn update(&mut self, entry: &HistoryEntry, history: &HistoryStore) -> Result<(), CalcError>;
}

/// Invokes every observer in registration order with the same arguments.
///
/// The first failure is wrapped as [`CalcError::Observability`] and returned;
/// later observers are not invoked.
pub fn notify_all(
    observers: &mut [Box<dyn Observer>],
    entry: &HistoryEntry,
    history: &HistoryStore,
) -> Result<(), CalcError> {
    for observer in observers {
        observer
            .update(entry, history)
            .map_err(|source| CalcError::Observability {
                observer: observer.name().to_string(),
                source: Box::new(source),
            })?;
    }
    Ok(())
}

/// Appends one formatted line per operation to a log sink.
pub struct LoggingObserver {
    sink: Box<dyn LogSink>,
}

impl LoggingObserver {
    pub fn new(sink: Box<dyn LogSink>) -> Self {
        Self { sink }
    }

    fn format_line(entry: &HistoryEntry) -> String {
        format!(
            "[{}] {} | {}, {} => {}",
            Local::now().to_rfc3339(),
            entry.operation.to_uppercase(),
            entry.a,
            entry.b,
            entry.result
        )
    }
}

impl Observer for LoggingObserver {
    fn name(&self) -> &'static str {
        "logging"
    }

    fn update(&mut self, entry: &HistoryEntry, _history: &HistoryStore) -> Result<(), CalcError> {
        self.sink.append(&Self::format_line(entry))
    }
}

/// Persists the full history through a sink after every operation.
pub struct AutoSaveObserver {
    sink: Box<dyn HistorySink>,
}

impl AutoSaveObserver {
    pub fn new(sink: Box<dyn HistorySink>) -> Self {
        Self { sink }
    }
}

impl Observer for AutoSaveObserver {
    fn name(&self) -> &'static str {
        "auto-save"
    }

    fn update(&mut self, _entry: &HistoryEntry, history: &HistoryStore) -> Result<(), CalcError> {
        self.sink.save(&history.entries())
    }
}
