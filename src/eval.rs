//! Evaluation of parsed canonical expressions.
//!
//! The tree handed to [`eval_ast`] has already had every name resolved by the
//! parser, but the context is consulted again here so a tree built by hand
//! cannot reach anything outside the binding environment either.

use crate::Real;
use crate::context::EvalContext;
use crate::error::CalcError;
use crate::functions;
use crate::types::{AstExpr, BinaryOperator, NativeFunction};
use crate::{String, ToString, Vec};
use log::trace;

/// Initial stack capacities, enough for typical calculator input.
const INITIAL_OP_CAPACITY: usize = 32;
const INITIAL_VALUE_CAPACITY: usize = 16;

/// Work items of the evaluation loop.
enum EvalOp<'a> {
    /// Evaluate a node and leave its value on the value stack.
    Eval(&'a AstExpr),
    /// Negate the top value.
    Negate,
    /// Combine the two top values.
    CompleteBinary(BinaryOperator),
    /// Call a resolved function on the top value.
    ApplyFunction(&'a NativeFunction),
}

/// Evaluates an AST against `ctx`.
///
/// Fails on division by an exact zero, on a bound function leaving its domain
/// (NaN for a non-NaN argument), on names the context does not hold, and on a
/// final result that is not finite.
///
/// The tree is walked with explicit operation and value stacks, so a long
/// operator chain costs heap rather than call stack.
pub fn eval_ast(ast: &AstExpr, ctx: &EvalContext) -> Result<Real, CalcError> {
    let mut op_stack: Vec<EvalOp<'_>> = Vec::with_capacity(INITIAL_OP_CAPACITY);
    let mut value_stack: Vec<Real> = Vec::with_capacity(INITIAL_VALUE_CAPACITY);
    op_stack.push(EvalOp::Eval(ast));

    while let Some(op) = op_stack.pop() {
        match op {
            EvalOp::Eval(node) => match node {
                AstExpr::Number(n) => value_stack.push(*n),
                AstExpr::Constant(name) => {
                    let value = ctx.get_constant(name).ok_or_else(|| CalcError::UnboundName {
                        name: String::from(name.as_str()),
                    })?;
                    value_stack.push(value);
                }
                AstExpr::UnaryNegate(inner) => {
                    op_stack.push(EvalOp::Negate);
                    op_stack.push(EvalOp::Eval(inner));
                }
                AstExpr::BinaryOp { op, left, right } => {
                    // left is popped first
                    op_stack.push(EvalOp::CompleteBinary(*op));
                    op_stack.push(EvalOp::Eval(right));
                    op_stack.push(EvalOp::Eval(left));
                }
                AstExpr::Call { name, arg } => {
                    let function =
                        ctx.get_native_function(name)
                            .ok_or_else(|| CalcError::UnboundName {
                                name: name.as_str().to_string(),
                            })?;
                    op_stack.push(EvalOp::ApplyFunction(function));
                    op_stack.push(EvalOp::Eval(arg));
                }
            },
            EvalOp::Negate => {
                let value = pop_value(&mut value_stack)?;
                value_stack.push(-value);
            }
            EvalOp::CompleteBinary(op) => {
                let r = pop_value(&mut value_stack)?;
                let l = pop_value(&mut value_stack)?;
                value_stack.push(apply_operator(op, l, r)?);
            }
            EvalOp::ApplyFunction(function) => {
                let argument = pop_value(&mut value_stack)?;
                let result = function.call(argument);
                if result.is_nan() && !argument.is_nan() {
                    return Err(CalcError::Domain {
                        function: function.name.as_str().to_string(),
                        argument,
                    });
                }
                trace!("{}({}) = {}", function.name, argument, result);
                value_stack.push(result);
            }
        }
    }

    let value = pop_value(&mut value_stack)?;
    if !value.is_finite() {
        return Err(CalcError::NonFinite(value));
    }
    trace!("eval_ast = {}", value);
    Ok(value)
}

fn pop_value(value_stack: &mut Vec<Real>) -> Result<Real, CalcError> {
    value_stack
        .pop()
        .ok_or_else(|| CalcError::Syntax("evaluation stack underflow".to_string()))
}

fn apply_operator(op: BinaryOperator, l: Real, r: Real) -> Result<Real, CalcError> {
    match op {
        BinaryOperator::Add => Ok(l + r),
        BinaryOperator::Sub => Ok(l - r),
        BinaryOperator::Mul => Ok(l * r),
        BinaryOperator::Div => {
            if r == 0.0 {
                Err(CalcError::DivideByZero)
            } else {
                Ok(l / r)
            }
        }
        BinaryOperator::Pow => Ok(functions::power(l, r)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TryIntoFunctionName;
    use crate::{AngleMode, Box, assert_approx_eq};

    fn num(n: Real) -> Box<AstExpr> {
        Box::new(AstExpr::Number(n))
    }

    fn call(name: &str, arg: AstExpr) -> AstExpr {
        AstExpr::Call {
            name: name.try_into_function_name().unwrap(),
            arg: Box::new(arg),
        }
    }

    #[test]
    fn test_eval_arithmetic_nodes() {
        let ctx = EvalContext::default();
        let ast = AstExpr::BinaryOp {
            op: BinaryOperator::Sub,
            left: num(10.0),
            right: Box::new(AstExpr::BinaryOp {
                op: BinaryOperator::Pow,
                left: num(2.0),
                right: num(3.0),
            }),
        };
        assert_eq!(eval_ast(&ast, &ctx).unwrap(), 2.0);
        assert_eq!(eval_ast(&AstExpr::UnaryNegate(num(4.0)), &ctx).unwrap(), -4.0);
    }

    #[test]
    fn test_eval_constants_and_calls() {
        let ctx = EvalContext::new(AngleMode::Degrees);
        let pi = AstExpr::Constant("PI".try_into_function_name().unwrap());
        assert_approx_eq!(eval_ast(&pi, &ctx).unwrap(), crate::constants::PI);
        assert_approx_eq!(eval_ast(&call("COS", AstExpr::Number(60.0)), &ctx).unwrap(), 0.5);
    }

    #[test]
    fn test_eval_divide_by_zero() {
        let ctx = EvalContext::default();
        let ast = AstExpr::BinaryOp {
            op: BinaryOperator::Div,
            left: num(1.0),
            right: Box::new(AstExpr::UnaryNegate(num(0.0))),
        };
        assert_eq!(eval_ast(&ast, &ctx), Err(CalcError::DivideByZero));
    }

    #[test]
    fn test_eval_domain_errors() {
        let ctx = EvalContext::default();
        let err = eval_ast(&call("SQRT", AstExpr::Number(-4.0)), &ctx).unwrap_err();
        assert_eq!(
            err,
            CalcError::Domain {
                function: "SQRT".to_string(),
                argument: -4.0
            }
        );
        assert!(eval_ast(&call("FACT", AstExpr::Number(-1.0)), &ctx).is_err());
        assert!(eval_ast(&call("ASIN", AstExpr::Number(2.0)), &ctx).is_err());
    }

    #[test]
    fn test_eval_non_finite_result() {
        let ctx = EvalContext::default();
        assert!(matches!(
            eval_ast(&call("LN", AstExpr::Number(0.0)), &ctx),
            Err(CalcError::NonFinite(_))
        ));
        assert!(matches!(
            eval_ast(&call("FACT", AstExpr::Number(171.0)), &ctx),
            Err(CalcError::NonFinite(_))
        ));
    }

    #[test]
    fn test_eval_deep_trees_without_recursion() {
        let depth = 20_000;
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(move || {
                let ctx = EvalContext::new(AngleMode::Degrees);
                // ((1 + 1) + 1) + ...
                let mut sum = AstExpr::Number(1.0);
                for _ in 0..depth {
                    sum = AstExpr::BinaryOp {
                        op: BinaryOperator::Add,
                        left: Box::new(sum),
                        right: num(1.0),
                    };
                }
                // -(-(...-(2)))
                let mut negated = AstExpr::Number(2.0);
                for _ in 0..depth {
                    negated = AstExpr::UnaryNegate(Box::new(negated));
                }
                // SQRT(SQRT(...SQRT(1)))
                let mut nested = AstExpr::Number(1.0);
                for _ in 0..depth {
                    nested = call("SQRT", nested);
                }
                (
                    eval_ast(&sum, &ctx),
                    eval_ast(&negated, &ctx),
                    eval_ast(&nested, &ctx),
                )
            })
            .unwrap();
        let (sum, negated, nested) = handle.join().unwrap();
        assert_eq!(sum.unwrap(), (depth + 1) as Real);
        assert_eq!(negated.unwrap(), 2.0);
        assert_eq!(nested.unwrap(), 1.0);
    }

    #[test]
    fn test_eval_operand_order() {
        let ctx = EvalContext::default();
        let ast = AstExpr::BinaryOp {
            op: BinaryOperator::Div,
            left: Box::new(AstExpr::BinaryOp {
                op: BinaryOperator::Sub,
                left: num(1.0),
                right: num(9.0),
            }),
            right: Box::new(AstExpr::BinaryOp {
                op: BinaryOperator::Pow,
                left: num(2.0),
                right: num(2.0),
            }),
        };
        assert_eq!(eval_ast(&ast, &ctx).unwrap(), -2.0);
    }

    #[test]
    fn test_eval_hand_built_tree_cannot_escape_context() {
        let ctx = EvalContext::empty(AngleMode::Degrees);
        let ast = call("SIN", AstExpr::Number(0.0));
        assert_eq!(
            eval_ast(&ast, &ctx),
            Err(CalcError::UnboundName {
                name: "SIN".to_string()
            })
        );
        let pi = AstExpr::Constant("PI".try_into_function_name().unwrap());
        assert!(eval_ast(&pi, &ctx).is_err());
    }
}
