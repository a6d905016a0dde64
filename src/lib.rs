pub use crate::errors::{print_error, ArithmeticErrorKind, CalcError};
pub use crate::session::Session;

pub mod cli;
pub mod config;
pub mod errors;
pub mod history;
pub mod logging;
pub mod observer;
pub mod ops;
pub mod persist;
pub mod repl;
pub mod session;
pub mod undo;
