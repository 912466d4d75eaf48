//! Error types for canonical-expression parsing and evaluation.
//!
//! Every error here is recoverable: the calculator shows a blank preview (or
//! `"Error"`) and leaves the display text untouched. The public
//! [`crate::engine::evaluate`] boundary collapses all of them into
//! [`crate::EvaluationOutcome::Failed`]; [`crate::engine::interp`] keeps the detail.

use crate::{Real, String};
use core::fmt;
use core::result;

/// Result type used throughout the crate.
pub type Result<T> = result::Result<T, CalcError>;

/// Error type for parsing and evaluating canonical expressions.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    /// The canonical text does not follow the grammar: unexpected tokens,
    /// dangling operators, malformed numbers, a function name without `(`.
    Syntax(String),

    /// A parenthesis has no partner.
    UnmatchedParenthesis { position: usize, found: String },

    /// An identifier that is not bound in the evaluation context.
    ///
    /// Only the names registered by [`crate::context::EvalContext::new`] can
    /// ever be referenced; everything else fails here, at parse time.
    UnboundName { name: String },

    /// A bound function was applied outside its domain, e.g. `SQRT(-1)`,
    /// `ASIN(2)` or `FACT(-1)`.
    Domain { function: String, argument: Real },

    /// Division by an exact zero.
    DivideByZero,

    /// The expression evaluated to an infinity or NaN.
    NonFinite(Real),

    /// The expression is nested deeper than [`crate::MAX_NESTING_DEPTH`] or
    /// longer than [`crate::MAX_EXPRESSION_LENGTH`].
    RecursionLimit(String),

    /// A fixed-capacity binding table is full.
    CapacityExceeded(&'static str),

    /// A name does not fit the fixed-capacity name buffer.
    NameTooLong,
}

/// The four failure classes a calculator user can run into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    Syntax,
    UnboundName,
    Domain,
    NonFinite,
}

impl CalcError {
    /// Folds the error into one of the failure classes.
    ///
    /// Resource limits count as syntax failures: the text was rejected before
    /// anything was evaluated.
    pub fn class(&self) -> FailureClass {
        match self {
            CalcError::Syntax(_)
            | CalcError::UnmatchedParenthesis { .. }
            | CalcError::RecursionLimit(_)
            | CalcError::CapacityExceeded(_)
            | CalcError::NameTooLong => FailureClass::Syntax,
            CalcError::UnboundName { .. } => FailureClass::UnboundName,
            CalcError::Domain { .. } => FailureClass::Domain,
            CalcError::DivideByZero | CalcError::NonFinite(_) => FailureClass::NonFinite,
        }
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::Syntax(err) => write!(f, "Syntax error: {}", err),
            CalcError::UnmatchedParenthesis { position, found } => {
                write!(
                    f,
                    "Unmatched parenthesis at position {}: found '{}'",
                    position, found
                )
            }
            CalcError::UnboundName { name } => write!(f, "Unbound name: '{}'", name),
            CalcError::Domain { function, argument } => {
                write!(f, "{} is undefined for {}", function, argument)
            }
            CalcError::DivideByZero => write!(f, "Division by zero"),
            CalcError::NonFinite(value) => write!(f, "Result is not finite: {}", value),
            CalcError::RecursionLimit(err) => write!(f, "Recursion limit exceeded: {}", err),
            CalcError::CapacityExceeded(container) => {
                write!(f, "Capacity exceeded for {}", container)
            }
            CalcError::NameTooLong => write!(f, "Name too long for binding table"),
        }
    }
}

impl core::error::Error for CalcError {}
