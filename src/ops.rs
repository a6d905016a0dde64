//! The closed set of arithmetic operations.
//!
//! Operation lookup is the calculator's registry: a fixed tagged set rather
//! than an open string-keyed table, so an unrecognized name is a typed error
//! instead of a lookup miss. Each operation is a pure, deterministic function
//! of two `f64` inputs.

use crate::errors::{ArithmeticErrorKind, CalcError};

/// A supported binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
    Multiply,
    Division,
    Modulus,
    Power,
    Root,
    IntDivide,
    AbsDiff,
}

impl Op {
    /// Every supported operation, in help-listing order.
    pub const ALL: [Op; 9] = [
        Op::Add,
        Op::Subtract,
        Op::Multiply,
        Op::Division,
        Op::Modulus,
        Op::Power,
        Op::Root,
        Op::IntDivide,
        Op::AbsDiff,
    ];

    /// Looks up an operation by its command name, case-insensitively.
    pub fn resolve(name: &str) -> Result<Op, CalcError> {
        match name.to_ascii_lowercase().as_str() {
            "add" => Ok(Op::Add),
            "subtract" => Ok(Op::Subtract),
            "multiply" => Ok(Op::Multiply),
            "division" => Ok(Op::Division),
            "modulus" => Ok(Op::Modulus),
            "power" => Ok(Op::Power),
            "root" => Ok(Op::Root),
            "int_divide" => Ok(Op::IntDivide),
            "abs_diff" => Ok(Op::AbsDiff),
            _ => Err(CalcError::UnsupportedOperation {
                name: name.to_string(),
                supported: Op::supported_names(),
            }),
        }
    }

    /// Comma-separated list of every operation name, for help text.
    pub fn supported_names() -> String {
        Op::ALL.map(Op::name).join(", ")
    }

    /// The canonical command name, as recorded in history entries.
    pub fn name(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Subtract => "subtract",
            Op::Multiply => "multiply",
            Op::Division => "division",
            Op::Modulus => "modulus",
            Op::Power => "power",
            Op::Root => "root",
            Op::IntDivide => "int_divide",
            Op::AbsDiff => "abs_diff",
        }
    }

    /// Applies the operation to two operands.
    ///
    /// Pure and side-effect-free. Guarded zero cases report which operation
    /// was refused via [`ArithmeticErrorKind`].
    pub fn apply(self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Op::Add => Ok(a + b),
            Op::Subtract => Ok(a - b),
            Op::Multiply => Ok(a * b),
            Op::Division => {
                if b == 0.0 {
                    Err(self.zero_error(ArithmeticErrorKind::DivideByZero))
                } else {
                    Ok(a / b)
                }
            }
            Op::Modulus => {
                if b == 0.0 {
                    Err(self.zero_error(ArithmeticErrorKind::ModulusByZero))
                } else {
                    Ok(a % b)
                }
            }
            Op::Power => Ok(a.powf(b)),
            Op::Root => {
                if b == 0.0 {
                    Err(self.zero_error(ArithmeticErrorKind::RootZeroExponent))
                } else {
                    Ok(a.powf(1.0 / b))
                }
            }
            Op::IntDivide => {
                if b == 0.0 {
                    Err(self.zero_error(ArithmeticErrorKind::IntDivideByZero))
                } else {
                    Ok((a / b).floor())
                }
            }
            Op::AbsDiff => Ok((a - b).abs()),
        }
    }

    fn zero_error(self, kind: ArithmeticErrorKind) -> CalcError {
        CalcError::Arithmetic {
            op: self.name(),
            kind,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
