use crate::context::EvalContext;
use crate::error::CalcError;
use crate::eval::eval_ast;
use crate::lexer::{Lexer, Token};
use crate::types::{AstExpr, BinaryOperator, EvaluationOutcome, TokenKind, TryIntoFunctionName};
use crate::{AngleMode, Box, MAX_EXPRESSION_LENGTH, MAX_NESTING_DEPTH, Real, ToString};
use alloc::format;
use log::{debug, trace};

/// Pratt parser for canonical expressions.
///
/// Names are resolved against the context while parsing, so an identifier
/// that is not bound can never reach the evaluator.
struct PrattParser<'a> {
    lexer: Lexer<'a>,
    current: Option<Token>,
    ctx: &'a EvalContext,
    recursion_depth: usize,
    max_recursion_depth: usize,
}

/// Token binding powers for the Pratt parser
#[derive(Debug, Clone, Copy)]
struct BindingPower {
    left: u8,
    right: u8,
}

impl BindingPower {
    const fn new(left: u8, right: u8) -> Self {
        Self { left, right }
    }

    // For left-associative operators, right binding power is left + 1
    const fn left_assoc(power: u8) -> Self {
        Self::new(power, power + 1)
    }

    // For right-associative operators, right binding power is same as left
    const fn right_assoc(power: u8) -> Self {
        Self::new(power, power)
    }
}

/// Binding power of unary `+` and `-`; lower than `**` so `-2**2` is `-(2**2)`.
const PREFIX_BINDING_POWER: u8 = 14;

impl<'a> PrattParser<'a> {
    fn new(input: &'a str, ctx: &'a EvalContext) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            ctx,
            recursion_depth: 0,
            max_recursion_depth: MAX_NESTING_DEPTH,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.current.take();
        self.current = self.lexer.next_token();
        tok
    }

    fn get_binding_power(op: &str) -> Option<BindingPower> {
        match op {
            "+" | "-" => Some(BindingPower::left_assoc(9)),
            "*" | "/" => Some(BindingPower::left_assoc(10)),
            "**" => Some(BindingPower::right_assoc(16)),
            _ => None,
        }
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        self.recursion_depth += 1;
        if self.recursion_depth > self.max_recursion_depth {
            return Err(CalcError::RecursionLimit(format!(
                "Expression too complex: exceeded maximum nesting depth of {}",
                self.max_recursion_depth
            )));
        }
        Ok(())
    }

    fn parse_expr(&mut self, min_bp: u8) -> Result<AstExpr, CalcError> {
        self.enter()?;
        let lhs = self.parse_prefix_or_primary()?;
        let expr = self.parse_infix_operators(lhs, min_bp)?;
        self.recursion_depth -= 1;
        Ok(expr)
    }

    fn parse_prefix_or_primary(&mut self) -> Result<AstExpr, CalcError> {
        let Some(tok) = self.peek() else {
            return Err(CalcError::Syntax("Unexpected end of input".to_string()));
        };
        if tok.kind != TokenKind::Operator {
            return self.parse_primary();
        }

        let op = tok.text.clone().unwrap_or_default();
        let op_position = tok.position;
        if op != "-" && op != "+" {
            return Err(CalcError::Syntax(format!(
                "Unexpected operator '{}' at position {}",
                op, op_position
            )));
        }

        self.next();
        if self.peek().is_none() {
            return Err(CalcError::Syntax(format!(
                "Expected expression after '{}' at position {}",
                op, op_position
            )));
        }

        let rhs = self.parse_expr(PREFIX_BINDING_POWER)?;
        if op == "-" {
            Ok(AstExpr::UnaryNegate(Box::new(rhs)))
        } else {
            // Unary + is a no-op
            Ok(rhs)
        }
    }

    fn parse_infix_operators(&mut self, mut lhs: AstExpr, min_bp: u8) -> Result<AstExpr, CalcError> {
        loop {
            let op_text = match self.peek() {
                Some(tok) if tok.kind == TokenKind::Operator => {
                    tok.text.clone().unwrap_or_default()
                }
                _ => break,
            };

            let Some(bp) = Self::get_binding_power(&op_text) else {
                break;
            };
            if bp.left < min_bp {
                break;
            }
            let Some(op) = BinaryOperator::from_symbol(&op_text) else {
                break;
            };

            self.next();

            let rhs = self.parse_expr(bp.right)?;

            lhs = AstExpr::BinaryOp {
                op,
                left: Box::new(lhs),
                right: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    // Parse a primary expression (number, bound name, call, parenthesized expression)
    fn parse_primary(&mut self) -> Result<AstExpr, CalcError> {
        let tok = match self.next() {
            Some(tok) => tok,
            None => return Err(CalcError::Syntax("Unexpected end of input".to_string())),
        };

        match tok.kind {
            TokenKind::Number => match tok.value {
                Some(val) => Ok(AstExpr::Number(val)),
                None => Err(CalcError::Syntax(format!(
                    "Malformed number at position {}",
                    tok.position
                ))),
            },
            TokenKind::Identifier => self.parse_name(tok),
            TokenKind::Open => self.parse_parenthesized_expr(tok.position),
            TokenKind::Close => Err(CalcError::UnmatchedParenthesis {
                position: tok.position,
                found: ")".to_string(),
            }),
            TokenKind::Operator | TokenKind::Error => Err(CalcError::Syntax(format!(
                "Unexpected token at position {}: '{}'",
                tok.position,
                tok.text.unwrap_or_default()
            ))),
        }
    }

    fn parse_name(&mut self, tok: Token) -> Result<AstExpr, CalcError> {
        let name = tok.text.unwrap_or_default();
        let followed_by_paren = self.peek().is_some_and(|t| t.kind == TokenKind::Open);

        if self.ctx.get_native_function(&name).is_some() {
            if !followed_by_paren {
                return Err(CalcError::Syntax(format!(
                    "Function '{}' at position {} must be called with parentheses",
                    name, tok.position
                )));
            }
            let open = self.next().map(|t| t.position).unwrap_or(tok.position);
            let arg = self.parse_parenthesized_expr(open)?;
            return Ok(AstExpr::Call {
                name: name.as_str().try_into_function_name()?,
                arg: Box::new(arg),
            });
        }

        if self.ctx.get_constant(&name).is_some() {
            return Ok(AstExpr::Constant(name.as_str().try_into_function_name()?));
        }

        Err(CalcError::UnboundName { name })
    }

    // The opening parenthesis has been consumed.
    fn parse_parenthesized_expr(&mut self, open_position: usize) -> Result<AstExpr, CalcError> {
        let expr = self.parse_expr(0)?;
        match self.next() {
            Some(tok) if tok.kind == TokenKind::Close => Ok(expr),
            Some(tok) => Err(CalcError::Syntax(format!(
                "Expected closing parenthesis ')' but found '{}' at position {} (opening at position {})",
                tok.text.unwrap_or_default(),
                tok.position,
                open_position
            ))),
            None => Err(CalcError::UnmatchedParenthesis {
                position: open_position,
                found: "(".to_string(),
            }),
        }
    }

    fn check_expression_length(input: &str) -> Result<(), CalcError> {
        if input.len() > MAX_EXPRESSION_LENGTH {
            return Err(CalcError::RecursionLimit(format!(
                "Expression too long: {} characters (maximum is {})",
                input.len(),
                MAX_EXPRESSION_LENGTH
            )));
        }
        Ok(())
    }

    // Parse a complete expression
    fn parse(&mut self) -> Result<AstExpr, CalcError> {
        self.recursion_depth = 0;

        let expr = self.parse_expr(0)?;

        // Check for unexpected trailing tokens
        if let Some(tok) = self.peek() {
            if tok.kind == TokenKind::Close {
                return Err(CalcError::UnmatchedParenthesis {
                    position: tok.position,
                    found: ")".to_string(),
                });
            }
            return Err(CalcError::Syntax(format!(
                "Unexpected token at position {}: '{}'",
                tok.position,
                tok.text.clone().unwrap_or_default()
            )));
        }

        Ok(expr)
    }
}

/// Parses canonical text into an AST, resolving every name against `ctx`.
pub fn parse_expression(input: &str, ctx: &EvalContext) -> Result<AstExpr, CalcError> {
    PrattParser::check_expression_length(input)?;
    PrattParser::new(input, ctx).parse()
}

/// Parses and evaluates canonical text, keeping the failure detail.
///
/// Empty text evaluates to `0`, the calculator's idle state.
///
/// # Examples
///
/// ```
/// use sci_calc::AngleMode;
/// use sci_calc::context::EvalContext;
/// use sci_calc::engine::interp;
/// use sci_calc::error::CalcError;
///
/// let ctx = EvalContext::new(AngleMode::Degrees);
/// assert_eq!(interp("2+3*4**2", &ctx).unwrap(), 50.0);
/// assert_eq!(interp("", &ctx).unwrap(), 0.0);
/// assert!(matches!(interp("SQRT(-4)", &ctx), Err(CalcError::Domain { .. })));
/// ```
pub fn interp(expression: &str, ctx: &EvalContext) -> crate::error::Result<Real> {
    if expression.is_empty() {
        return Ok(0.0);
    }
    let ast = parse_expression(expression, ctx)?;
    eval_ast(&ast, ctx)
}

/// Evaluates canonical text under `mode`, collapsing every failure into
/// [`EvaluationOutcome::Failed`].
///
/// Evaluating the same text and mode twice gives bit-identical results.
///
/// ```
/// use sci_calc::{AngleMode, EvaluationOutcome};
/// use sci_calc::engine::evaluate;
///
/// assert_eq!(evaluate("FACT(5)", AngleMode::Degrees), EvaluationOutcome::Value(120.0));
/// assert_eq!(evaluate("FACT(-1)", AngleMode::Degrees), EvaluationOutcome::Failed);
/// assert_eq!(evaluate("fetch(1)", AngleMode::Degrees), EvaluationOutcome::Failed);
/// ```
pub fn evaluate(canonical: &str, mode: AngleMode) -> EvaluationOutcome {
    evaluate_with_context(canonical, &EvalContext::new(mode))
}

/// Like [`evaluate`], against an existing context.
pub fn evaluate_with_context(canonical: &str, ctx: &EvalContext) -> EvaluationOutcome {
    let result = interp(canonical, ctx);
    match &result {
        Ok(value) => trace!("evaluated {:?} ({}) = {}", canonical, ctx.angle_mode(), value),
        Err(err) => debug!("evaluation of {:?} failed: {}", canonical, err),
    }
    EvaluationOutcome::from(result)
}
