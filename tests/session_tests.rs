//! Core session behavior: compute, history, undo/redo, and observer
//! dispatch, exercised through in-memory sinks.

use std::cell::RefCell;
use std::rc::Rc;

use im::Vector;

use tally::config::Config;
use tally::errors::{ArithmeticErrorKind, CalcError};
use tally::history::{HistoryEntry, HistoryStore};
use tally::observer::Observer;
use tally::persist::MemoryHistorySink;
use tally::session::Session;

fn session() -> Session {
    Session::new(Config::default(), Box::new(MemoryHistorySink::new()))
}

fn entry(operation: &str, a: f64, b: f64, result: f64) -> HistoryEntry {
    HistoryEntry::new(operation, a, b, result)
}

/// Records every notification it receives into a shared event list, tagged
/// with its label, so tests can assert on dispatch order and arguments.
struct RecordingObserver {
    label: &'static str,
    events: Rc<RefCell<Vec<(&'static str, HistoryEntry)>>>,
}

impl Observer for RecordingObserver {
    fn name(&self) -> &'static str {
        self.label
    }

    fn update(&mut self, entry: &HistoryEntry, _history: &HistoryStore) -> Result<(), CalcError> {
        self.events.borrow_mut().push((self.label, entry.clone()));
        Ok(())
    }
}

/// Fails every notification, standing in for a sink write failure.
struct FailingObserver;

impl Observer for FailingObserver {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn update(&mut self, _entry: &HistoryEntry, _history: &HistoryStore) -> Result<(), CalcError> {
        Err(CalcError::HistoryPersist {
            message: "disk full".to_string(),
            source: None,
        })
    }
}

#[test]
fn history_length_matches_successful_computes() {
    let mut session = session();
    session.compute("add", 1.0, 2.0).unwrap();
    session.compute("multiply", 3.0, 4.0).unwrap();
    session.compute("division", 1.0, 0.0).unwrap_err();
    session.compute("power", 2.0, 3.0).unwrap();
    assert_eq!(session.history_view().len(), 3);
}

#[test]
fn scenario_a_undo_of_first_operation_restores_empty_history() {
    let mut session = session();
    let result = session.compute("add", 1.0, 2.0).unwrap();
    assert_eq!(result, 3.0);
    assert_eq!(
        session.history_view(),
        Vector::unit(entry("add", 1.0, 2.0, 3.0))
    );

    let restored = session.undo().expect("baseline snapshot makes undo possible");
    assert!(restored.is_empty());
    assert!(session.history_view().is_empty());
}

#[test]
fn scenario_b_failed_compute_mutates_nothing() {
    let mut session = session();
    session.compute("add", 1.0, 2.0).unwrap();
    let before = session.history_view();

    let err = session.compute("division", 5.0, 0.0).unwrap_err();
    assert!(matches!(
        err,
        CalcError::Arithmetic {
            kind: ArithmeticErrorKind::DivideByZero,
            ..
        }
    ));
    assert_eq!(session.history_view(), before);
    // The failed compute also saved no checkpoint: one undo steps past the
    // successful add, not the failed division.
    assert_eq!(session.undo(), Some(Vector::new()));
}

#[test]
fn scenarios_c_and_d_undo_then_redo_walk_the_same_states() {
    let mut session = session();
    session.compute("add", 1.0, 2.0).unwrap();
    session.compute("subtract", 5.0, 3.0).unwrap();

    let two = Vector::from(vec![
        entry("add", 1.0, 2.0, 3.0),
        entry("subtract", 5.0, 3.0, 2.0),
    ]);
    let one = Vector::unit(entry("add", 1.0, 2.0, 3.0));

    assert_eq!(session.undo(), Some(one.clone()));
    assert_eq!(session.undo(), Some(Vector::new()));
    assert_eq!(session.undo(), None);

    assert_eq!(session.redo(), Some(one));
    assert_eq!(session.redo(), Some(two));
    assert_eq!(session.redo(), None);
}

#[test]
fn undo_redo_inverse_law() {
    let mut session = session();
    session.compute("add", 1.0, 1.0).unwrap();
    session.compute("add", 2.0, 2.0).unwrap();
    let latest = session.history_view();

    let previous = session.undo().unwrap();
    assert_eq!(previous.len(), 1);
    assert_eq!(session.redo(), Some(latest));
}

#[test]
fn new_compute_invalidates_pending_redo() {
    let mut session = session();
    session.compute("add", 1.0, 1.0).unwrap();
    session.undo().unwrap();
    session.compute("multiply", 2.0, 2.0).unwrap();
    assert_eq!(session.redo(), None);
}

#[test]
fn scenario_e_observers_notified_once_each_in_registration_order() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut session = session();
    session.register_observer(Box::new(RecordingObserver {
        label: "first",
        events: Rc::clone(&events),
    }));
    session.register_observer(Box::new(RecordingObserver {
        label: "second",
        events: Rc::clone(&events),
    }));

    session.compute("add", 1.0, 2.0).unwrap();

    let seen = events.borrow();
    let expected = entry("add", 1.0, 2.0, 3.0);
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], ("first", expected.clone()));
    assert_eq!(seen[1], ("second", expected));
}

#[test]
fn observer_failure_surfaces_after_state_was_updated() {
    let events = Rc::new(RefCell::new(Vec::new()));
    let mut session = session();
    session.register_observer(Box::new(RecordingObserver {
        label: "first",
        events: Rc::clone(&events),
    }));
    session.register_observer(Box::new(FailingObserver));
    session.register_observer(Box::new(RecordingObserver {
        label: "third",
        events: Rc::clone(&events),
    }));

    let err = session.compute("add", 1.0, 2.0).unwrap_err();
    match err {
        CalcError::Observability { observer, .. } => assert_eq!(observer, "failing"),
        other => panic!("expected observability error, got {other:?}"),
    }

    // Dispatch stopped at the failure: the earlier observer ran, the later
    // one did not.
    assert_eq!(events.borrow().len(), 1);
    assert_eq!(events.borrow()[0].0, "first");

    // The append and snapshot happened before the notification failed.
    assert_eq!(session.history_view().len(), 1);
    assert_eq!(session.undo(), Some(Vector::new()));
}

#[test]
fn operands_beyond_the_configured_magnitude_are_rejected() {
    let mut config = Config::default();
    config.max_input_value = 100.0;
    let mut session = Session::new(config, Box::new(MemoryHistorySink::new()));

    let err = session.compute("add", 101.0, 1.0).unwrap_err();
    assert!(matches!(err, CalcError::Validation { .. }));
    assert!(session.history_view().is_empty());
}

#[test]
fn history_is_capped_at_the_configured_size() {
    let mut config = Config::default();
    config.max_history_size = 2;
    let mut session = Session::new(config, Box::new(MemoryHistorySink::new()));

    for n in 1..=4 {
        session.compute("add", n as f64, 0.0).unwrap();
    }

    let view = session.history_view();
    assert_eq!(view.len(), 2);
    assert_eq!(view[0].a, 3.0);
    assert_eq!(view[1].a, 4.0);
}

#[test]
fn explicit_save_writes_the_current_history() {
    let sink = MemoryHistorySink::new();
    let mut session = Session::new(Config::default(), Box::new(sink.clone()));
    session.compute("add", 1.0, 2.0).unwrap();
    session.save_history().unwrap();

    assert_eq!(sink.save_count(), 1);
    assert_eq!(
        sink.last_saved(),
        Some(Vector::unit(entry("add", 1.0, 2.0, 3.0)))
    );
}

#[test]
fn load_replaces_history_and_is_undoable() {
    let persisted = Vector::from(vec![
        entry("power", 2.0, 8.0, 256.0),
        entry("root", 27.0, 3.0, 3.0),
    ]);
    let sink = MemoryHistorySink::with_preload(persisted.clone());
    let mut session = Session::new(Config::default(), Box::new(sink));

    session.compute("add", 1.0, 1.0).unwrap();
    assert!(session.load_history().unwrap());
    assert_eq!(session.history_view(), persisted);

    // Undoing the load lands back on the pre-load state.
    let restored = session.undo().unwrap();
    assert_eq!(restored, Vector::unit(entry("add", 1.0, 1.0, 2.0)));
}

#[test]
fn load_with_no_persisted_history_changes_nothing() {
    let mut session = session();
    session.compute("add", 1.0, 1.0).unwrap();
    assert!(!session.load_history().unwrap());
    assert_eq!(session.history_view().len(), 1);
}

#[test]
fn clear_empties_history_and_can_be_undone() {
    let mut session = session();
    session.compute("add", 1.0, 1.0).unwrap();
    session.clear_history();
    assert!(session.history_view().is_empty());

    let restored = session.undo().unwrap();
    assert_eq!(restored, Vector::unit(entry("add", 1.0, 1.0, 2.0)));
}

#[test]
fn unsupported_operation_is_reported_before_any_mutation() {
    let mut session = session();
    let err = session.compute("cubed", 1.0, 2.0).unwrap_err();
    assert!(matches!(err, CalcError::UnsupportedOperation { .. }));
    assert!(session.history_view().is_empty());
    assert_eq!(session.undo(), None);
}
