//! Type definitions shared by the lexer, parser and evaluator.
//!
//! This module contains the AST of canonical expressions, the token kinds, the
//! angle mode, the evaluation outcome and the native function representation
//! stored in the binding environment.

use crate::error::CalcError;
use crate::{Box, Real, Vec};
use alloc::rc::Rc;
use core::fmt;
use serde::{Deserialize, Serialize};

/// Maximum length of a bound name.
pub const MAX_NAME_LENGTH: usize = 16;

/// Fixed-capacity string used as a key in the binding tables.
pub type FunctionName = heapless::String<MAX_NAME_LENGTH>;

/// Conversion of `&str` into a [`FunctionName`].
pub trait TryIntoFunctionName {
    fn try_into_function_name(&self) -> Result<FunctionName, CalcError>;
}

impl TryIntoFunctionName for str {
    fn try_into_function_name(&self) -> Result<FunctionName, CalcError> {
        FunctionName::try_from(self).map_err(|_| CalcError::NameTooLong)
    }
}

/// How trigonometric functions interpret and return angles.
///
/// Owned by the calculator session and flipped only by an explicit toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AngleMode {
    #[default]
    Degrees,
    Radians,
}

impl AngleMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            AngleMode::Degrees => AngleMode::Radians,
            AngleMode::Radians => AngleMode::Degrees,
        }
    }

    /// Short label shown on the mode key.
    pub fn label(self) -> &'static str {
        match self {
            AngleMode::Degrees => "DEG",
            AngleMode::Radians => "RAD",
        }
    }
}

impl fmt::Display for AngleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of evaluating a canonical expression: a finite number or nothing.
///
/// No partial results and no failure detail are ever exposed through this type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvaluationOutcome {
    Value(Real),
    Failed,
}

impl EvaluationOutcome {
    pub fn value(self) -> Option<Real> {
        match self {
            EvaluationOutcome::Value(v) => Some(v),
            EvaluationOutcome::Failed => None,
        }
    }

    pub fn is_failed(self) -> bool {
        matches!(self, EvaluationOutcome::Failed)
    }
}

impl From<Result<Real, CalcError>> for EvaluationOutcome {
    fn from(result: Result<Real, CalcError>) -> Self {
        match result {
            Ok(v) if v.is_finite() => EvaluationOutcome::Value(v),
            _ => EvaluationOutcome::Failed,
        }
    }
}

/// Abstract Syntax Tree node of a canonical expression.
///
/// The set of node kinds is closed: there is no variable lookup, no assignment
/// and no call on anything but a bound name. Names in `Constant` and `Call`
/// were checked against the binding environment when the tree was parsed.
#[derive(Clone, Debug, PartialEq)]
pub enum AstExpr {
    /// A numeric literal, e.g. `3.14` or `1e-3`.
    Number(Real),

    /// A bound constant such as `PI` or `E`.
    Constant(FunctionName),

    /// An arithmetic operation on two operands.
    BinaryOp {
        op: BinaryOperator,
        left: Box<AstExpr>,
        right: Box<AstExpr>,
    },

    /// Unary minus.
    UnaryNegate(Box<AstExpr>),

    /// A call of a bound one-argument function, e.g. `SQRT(2)`.
    Call {
        name: FunctionName,
        arg: Box<AstExpr>,
    },
}

impl AstExpr {
    fn is_leaf(&self) -> bool {
        matches!(self, AstExpr::Number(_) | AstExpr::Constant(_))
    }

    /// Moves the inner-node children out onto `pending`, leaving leaves behind.
    fn detach_children(&mut self, pending: &mut Vec<AstExpr>) {
        let mut detach = |child: &mut Box<AstExpr>| {
            if !child.is_leaf() {
                pending.push(core::mem::replace(&mut **child, AstExpr::Number(0.0)));
            }
        };
        match self {
            AstExpr::BinaryOp { left, right, .. } => {
                detach(left);
                detach(right);
            }
            AstExpr::UnaryNegate(inner) | AstExpr::Call { arg: inner, .. } => detach(inner),
            AstExpr::Number(_) | AstExpr::Constant(_) => {}
        }
    }
}

// A chain of thousands of operators is a valid expression, so the tree is
// torn down with a work list instead of the recursive default drop.
impl Drop for AstExpr {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

/// The four arithmetic operators plus exponentiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOperator {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "+" => Some(BinaryOperator::Add),
            "-" => Some(BinaryOperator::Sub),
            "*" => Some(BinaryOperator::Mul),
            "/" => Some(BinaryOperator::Div),
            "**" => Some(BinaryOperator::Pow),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
            BinaryOperator::Pow => "**",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Classifies the kind of token produced by the canonical lexer.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum TokenKind {
    /// A numerical literal.
    Number,

    /// A name: a bound constant, a bound function or an unbound identifier.
    Identifier,

    /// One of `+ - * / **`.
    Operator,

    /// `(`
    Open,

    /// `)`
    Close,

    /// Anything the grammar has no place for.
    Error,
}

/// A one-argument Rust function bound in the evaluation context.
#[derive(Clone)]
pub struct NativeFunction {
    /// The name the function is called by in canonical text.
    pub name: FunctionName,

    /// The implementation. NaN signals a domain error.
    pub implementation: Rc<dyn Fn(Real) -> Real>,
}

impl NativeFunction {
    pub fn call(&self, arg: Real) -> Real {
        (self.implementation)(arg)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ToString;

    #[test]
    fn test_deep_tree_drop() {
        let handle = std::thread::Builder::new()
            .stack_size(128 * 1024)
            .spawn(|| {
                let mut tree = AstExpr::Number(1.0);
                for i in 0..50_000 {
                    tree = if i % 2 == 0 {
                        AstExpr::BinaryOp {
                            op: BinaryOperator::Mul,
                            left: Box::new(tree),
                            right: Box::new(AstExpr::UnaryNegate(Box::new(AstExpr::Number(2.0)))),
                        }
                    } else {
                        AstExpr::UnaryNegate(Box::new(tree))
                    };
                }
                drop(tree);
            })
            .unwrap();
        assert!(handle.join().is_ok());
    }

    #[test]
    fn test_outcome_from_result() {
        assert_eq!(EvaluationOutcome::from(Ok::<Real, CalcError>(2.0)), EvaluationOutcome::Value(2.0));
        assert_eq!(
            EvaluationOutcome::from(Ok::<Real, CalcError>(Real::INFINITY)),
            EvaluationOutcome::Failed
        );
        assert_eq!(
            EvaluationOutcome::from(Err(CalcError::Syntax("x".to_string()))),
            EvaluationOutcome::Failed
        );
        assert_eq!(EvaluationOutcome::Value(3.5).value(), Some(3.5));
        assert!(EvaluationOutcome::Failed.is_failed());
    }

    #[test]
    fn test_angle_mode_toggle() {
        assert_eq!(AngleMode::default(), AngleMode::Degrees);
        assert_eq!(AngleMode::Degrees.toggled(), AngleMode::Radians);
        assert_eq!(AngleMode::Radians.toggled().label(), "DEG");
    }

    #[test]
    fn test_function_name_capacity() {
        assert!("SIN".try_into_function_name().is_ok());
        assert_eq!(
            "a_name_far_too_long_for_the_table".try_into_function_name(),
            Err(CalcError::NameTooLong)
        );
    }

    #[test]
    fn test_operator_symbols() {
        for op in [
            BinaryOperator::Add,
            BinaryOperator::Sub,
            BinaryOperator::Mul,
            BinaryOperator::Div,
            BinaryOperator::Pow,
        ] {
            assert_eq!(BinaryOperator::from_symbol(op.symbol()), Some(op));
        }
        assert_eq!(BinaryOperator::from_symbol("^"), None);
    }
}
