//! Unified error handling for the calculator.
//!
//! Every failure mode in the crate is a variant of [`CalcError`], carrying a
//! `miette` diagnostic code of the form `tally::<area>::<kind>`. Errors are
//! created where they happen and rendered once, at the REPL loop or CLI
//! boundary, via [`print_error`].

use std::fmt;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// The specific cause of a failed arithmetic operation.
///
/// The original design reused a single divide-by-zero signal for every
/// guarded operation; carrying the cause as data lets callers distinguish
/// them without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticErrorKind {
    DivideByZero,
    ModulusByZero,
    RootZeroExponent,
    IntDivideByZero,
}

impl fmt::Display for ArithmeticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::DivideByZero => "division by zero",
            Self::ModulusByZero => "modulus by zero",
            Self::RootZeroExponent => "root with zero exponent",
            Self::IntDivideByZero => "integer division by zero",
        };
        write!(f, "{}", msg)
    }
}

/// Unified error type for all calculator failure modes.
#[derive(Debug, Error, Diagnostic)]
pub enum CalcError {
    /// The requested operation name is not in the supported set. The list
    /// of valid names is filled in from `Op::ALL` at the construction site,
    /// so it can never drift from the actual registry.
    #[error("unsupported operation '{name}'")]
    #[diagnostic(
        code(tally::registry::unsupported_operation),
        help("supported operations: {supported}")
    )]
    UnsupportedOperation { name: String, supported: String },

    /// A guarded arithmetic case was hit; nothing was recorded.
    #[error("arithmetic error in '{op}': {kind}")]
    #[diagnostic(code(tally::runtime::arithmetic))]
    Arithmetic {
        op: &'static str,
        kind: ArithmeticErrorKind,
    },

    /// Malformed user input; no state was mutated.
    #[error("invalid input: {message}")]
    #[diagnostic(
        code(tally::input::validation),
        help("operations take exactly two numeric operands, e.g. `add 5 2`")
    )]
    Validation { message: String },

    /// A registered observer failed. The history append and snapshot save
    /// have already happened by the time this surfaces.
    #[error("observer '{observer}' failed")]
    #[diagnostic(code(tally::observer::notify_failed))]
    Observability {
        observer: String,
        #[source]
        source: Box<CalcError>,
    },

    /// Saving or loading the durable history file failed.
    #[error("history persistence failed: {message}")]
    #[diagnostic(code(tally::persist::history))]
    HistoryPersist {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Appending to the log file failed.
    #[error("failed to write log file {path:?}")]
    #[diagnostic(code(tally::persist::log_write))]
    LogWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration loaded from the environment is unusable.
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(tally::config::invalid),
        help("configuration is read from TALLY_* environment variables")
    )]
    Config { message: String },
}

impl CalcError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Prints a [`CalcError`] with full miette diagnostics.
///
/// Use this for user-facing error display in CLI and REPL contexts; errors
/// never terminate the interactive session.
pub fn print_error(error: CalcError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
