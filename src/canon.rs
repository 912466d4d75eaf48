//! Canonicalization of display text.
//!
//! The display shows what the calculator keys typed: `×`, `÷`, `^`, `π`, `e`,
//! lowercase function names and a postfix `!`. [`canonicalize`] scans that text
//! once into display tokens and renders each token in the form the canonical
//! lexer understands. Factorials are resolved during the same scan: every `!`
//! wraps the operand that was just rendered, so `3!!` and `(3!)!` need no
//! repeated rewriting.

use crate::lexer::Cursor;
use crate::{String, ToString, Vec};
use alloc::format;
use log::debug;

/// Function names produced by the calculator keys. Matched against whole
/// identifiers, so `asin` can never be taken for `sin`.
const FUNCTION_NAMES: [&str; 9] = ["asin", "acos", "atan", "sin", "cos", "tan", "ln", "log", "sqrt"];

/// A token of display text.
#[derive(Debug, Clone, Copy, PartialEq)]
enum DisplayToken<'a> {
    Number(&'a str),
    Name(&'a str),
    Pi,
    Bang,
    Open,
    Close,
    /// An operator glyph, already mapped to its canonical spelling.
    Operator(&'static str),
    Space(&'a str),
    Other(&'a str),
}

struct DisplayScanner<'a> {
    cursor: Cursor<'a>,
}

impl<'a> DisplayScanner<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Whether `(` follows immediately.
    fn next_is_open(&self) -> bool {
        self.cursor.peek() == Some('(')
    }

    fn next_token(&mut self) -> Option<DisplayToken<'a>> {
        let start = self.cursor.pos();
        let c = self.cursor.peek()?;

        if self.cursor.at_number() {
            return Some(DisplayToken::Number(self.cursor.scan_number()));
        }
        if c.is_ascii_alphabetic() || c == '_' {
            self.cursor
                .advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
            return Some(DisplayToken::Name(self.cursor.slice_from(start)));
        }
        if c.is_whitespace() {
            self.cursor.advance_while(char::is_whitespace);
            return Some(DisplayToken::Space(self.cursor.slice_from(start)));
        }

        self.cursor.advance();
        let token = match c {
            'π' => DisplayToken::Pi,
            '!' => DisplayToken::Bang,
            '(' => DisplayToken::Open,
            ')' => DisplayToken::Close,
            '×' => DisplayToken::Operator("*"),
            '÷' => DisplayToken::Operator("/"),
            '−' => DisplayToken::Operator("-"),
            '^' => DisplayToken::Operator("**"),
            _ => DisplayToken::Other(self.cursor.slice_from(start)),
        };
        Some(token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PieceKind {
    Number,
    /// A finished factorial call; it can take another `!`.
    Fact,
    Name,
    Open,
    Close,
    Other,
}

/// A rendered chunk of canonical text.
#[derive(Debug, Clone)]
struct Piece {
    kind: PieceKind,
    text: String,
}

impl Piece {
    fn new(kind: PieceKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

fn canonical_name(name: &str, called: bool) -> String {
    if called && FUNCTION_NAMES.iter().any(|f| f.eq_ignore_ascii_case(name)) {
        return name.to_ascii_uppercase();
    }
    if name == "e" {
        return "E".to_string();
    }
    name.to_string()
}

/// Index of the first piece of the operand a `!` applies to: a number, an
/// earlier factorial, or a balanced group plus the name called on it.
fn factorial_operand_start(pieces: &[Piece]) -> Option<usize> {
    let last = pieces.last()?;
    match last.kind {
        PieceKind::Number | PieceKind::Fact => Some(pieces.len() - 1),
        PieceKind::Close => {
            let mut depth = 0usize;
            for (i, piece) in pieces.iter().enumerate().rev() {
                match piece.kind {
                    PieceKind::Close => depth += 1,
                    PieceKind::Open => {
                        depth -= 1;
                        if depth == 0 {
                            let called = i > 0 && pieces[i - 1].kind == PieceKind::Name;
                            return Some(if called { i - 1 } else { i });
                        }
                    }
                    _ => {}
                }
            }
            None
        }
        _ => None,
    }
}

fn expand_factorial(pieces: &mut Vec<Piece>) {
    match factorial_operand_start(pieces) {
        Some(start) => {
            let operand: String = pieces.drain(start..).map(|p| p.text).collect();
            pieces.push(Piece {
                kind: PieceKind::Fact,
                text: format!("FACT({})", operand),
            });
        }
        // Left in place; the evaluator rejects it.
        None => pieces.push(Piece::new(PieceKind::Other, "!")),
    }
}

/// Rewrites display text into canonical text.
///
/// Total: text that cannot be made sense of is passed through, and the
/// evaluator rejects it later.
///
/// ```
/// use sci_calc::canon::canonicalize;
///
/// assert_eq!(canonicalize("asin(0.5)×π"), "ASIN(0.5)*PI");
/// assert_eq!(canonicalize("(2!)!"), "FACT((FACT(2)))");
/// assert_eq!(canonicalize("sqrt(e)^2"), "SQRT(E)**2");
/// ```
pub fn canonicalize(display: &str) -> String {
    let mut scanner = DisplayScanner::new(display);
    let mut pieces: Vec<Piece> = Vec::new();

    while let Some(token) = scanner.next_token() {
        match token {
            DisplayToken::Number(text) => pieces.push(Piece::new(PieceKind::Number, text)),
            DisplayToken::Name(name) => {
                let text = canonical_name(name, scanner.next_is_open());
                pieces.push(Piece {
                    kind: PieceKind::Name,
                    text,
                });
            }
            DisplayToken::Pi => pieces.push(Piece::new(PieceKind::Name, "PI")),
            DisplayToken::Bang => expand_factorial(&mut pieces),
            DisplayToken::Open => pieces.push(Piece::new(PieceKind::Open, "(")),
            DisplayToken::Close => pieces.push(Piece::new(PieceKind::Close, ")")),
            DisplayToken::Operator(op) => pieces.push(Piece::new(PieceKind::Other, op)),
            DisplayToken::Space(text) | DisplayToken::Other(text) => {
                pieces.push(Piece::new(PieceKind::Other, text))
            }
        }
    }

    let canonical: String = pieces.iter().map(|p| p.text.as_str()).collect();
    debug!("canonicalized {:?} -> {:?}", display, canonical);
    canonical
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::evaluate;
    use crate::{AngleMode, EvaluationOutcome};

    fn eval_display(display: &str) -> EvaluationOutcome {
        evaluate(&canonicalize(display), AngleMode::Degrees)
    }

    #[test]
    fn test_glyph_mapping() {
        assert_eq!(canonicalize("2×3÷4−1"), "2*3/4-1");
        assert_eq!(canonicalize("2^3^2"), "2**3**2");
        assert_eq!(canonicalize("π"), "PI");
        assert_eq!(canonicalize("2×π"), "2*PI");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn test_euler_constant_only_as_whole_name() {
        assert_eq!(canonicalize("e"), "E");
        assert_eq!(canonicalize("e^2"), "E**2");
        assert_eq!(canonicalize("sqrt(e)"), "SQRT(E)");
        assert_eq!(canonicalize("ln(e)"), "LN(E)");
        // exponent notation is part of the number
        assert_eq!(canonicalize("2e5"), "2e5");
        assert_eq!(canonicalize("1.5e-3+e"), "1.5e-3+E");
        assert_eq!(canonicalize("exp"), "exp");
    }

    #[test]
    fn test_function_names() {
        assert_eq!(canonicalize("asin(0.5)"), "ASIN(0.5)");
        assert_eq!(canonicalize("acos(1)+atan(1)"), "ACOS(1)+ATAN(1)");
        assert_eq!(canonicalize("sin(cos(tan(0)))"), "SIN(COS(TAN(0)))");
        assert_eq!(canonicalize("ln(2)*log(2)*sqrt(2)"), "LN(2)*LOG(2)*SQRT(2)");
        assert_eq!(canonicalize("Sin(30)"), "SIN(30)");
        // the name must touch its parenthesis
        assert_eq!(canonicalize("sin (30)"), "sin (30)");
        assert!(eval_display("sin (30)").is_failed());
        // not a call, or not a calculator function
        assert_eq!(canonicalize("sin"), "sin");
        assert_eq!(canonicalize("sinh(1)"), "sinh(1)");
        assert_eq!(canonicalize("alert(1)"), "alert(1)");
    }

    #[test]
    fn test_factorial_expansion() {
        assert_eq!(canonicalize("5!"), "FACT(5)");
        assert_eq!(canonicalize("2.5!"), "FACT(2.5)");
        assert_eq!(canonicalize("1e2!"), "FACT(1e2)");
        assert_eq!(canonicalize("3!!"), "FACT(FACT(3))");
        assert_eq!(canonicalize("(2!)!"), "FACT((FACT(2)))");
        assert_eq!(canonicalize("(1+(2))!"), "FACT((1+(2)))");
        assert_eq!(canonicalize("sin(30)!"), "FACT(SIN(30))");
        assert_eq!(canonicalize("2+3!×4"), "2+FACT(3)*4");
        assert_eq!(canonicalize("-3!"), "-FACT(3)");
    }

    #[test]
    fn test_factorial_without_operand_is_left_in_place() {
        assert_eq!(canonicalize("!"), "!");
        assert_eq!(canonicalize("2+!"), "2+!");
        assert_eq!(canonicalize("π!"), "PI!");
        assert_eq!(canonicalize("3)!"), "3)!");
        assert_eq!(canonicalize("5 !"), "5 !");
        assert!(eval_display("2+!").is_failed());
        assert!(eval_display("3)!").is_failed());
    }

    #[test]
    fn test_factorial_evaluation() {
        assert_eq!(eval_display("5!"), EvaluationOutcome::Value(120.0));
        assert_eq!(eval_display("0!"), EvaluationOutcome::Value(1.0));
        assert_eq!(eval_display("(2!)!"), EvaluationOutcome::Value(2.0));
        assert_eq!(eval_display("(3!)!"), EvaluationOutcome::Value(720.0));
        assert!(eval_display("(-1)!").is_failed());
        assert!(eval_display("171!").is_failed());
    }

    #[test]
    fn test_unknown_characters_pass_through() {
        assert_eq!(canonicalize("2$3"), "2$3");
        assert_eq!(canonicalize("a;b"), "a;b");
        assert_eq!(canonicalize("1 + 2"), "1 + 2");
        assert!(eval_display("2 3").is_failed());
        assert!(eval_display("2$3").is_failed());
    }
}
