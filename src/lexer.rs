use crate::Real;
use crate::types::TokenKind;
use crate::{String, ToString};

/// Longest identifier the lexer accepts.
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: Option<Real>,
    pub text: Option<String>,
    pub position: usize,
}

/// A position in text plus the character-level scanning both the canonical
/// lexer and the display scanner are built on.
#[derive(Clone)]
pub(crate) struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Text from `start` up to the current position.
    pub(crate) fn slice_from(&self, start: usize) -> &'a str {
        &self.input[start..self.pos]
    }

    pub(crate) fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    pub(crate) fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.pos..].chars();
        chars.next();
        chars.next()
    }

    pub(crate) fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    pub(crate) fn advance_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while self.peek().is_some_and(&pred) {
            self.advance();
            count += 1;
        }
        count
    }

    /// Whether a number starts here: a digit, or `.` followed by a digit.
    pub(crate) fn at_number(&self) -> bool {
        match self.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_second().is_some_and(|d| d.is_ascii_digit()),
            _ => false,
        }
    }

    /// Whether an exponent suffix (`e`, optional sign, at least one digit) starts here.
    fn at_exponent(&self) -> bool {
        if !matches!(self.peek(), Some('e' | 'E')) {
            return false;
        }
        let mut chars = self.input[self.pos + 1..].chars();
        match chars.next() {
            Some(d) if d.is_ascii_digit() => true,
            Some('+' | '-') => chars.next().is_some_and(|d| d.is_ascii_digit()),
            _ => false,
        }
    }

    /// Consumes `digits [. digits*]` or `. digits`, then an optional exponent.
    /// Call only when [`Cursor::at_number`] holds.
    pub(crate) fn scan_number(&mut self) -> &'a str {
        let start = self.pos;
        self.advance_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }

        // An `e` not followed by digits belongs to whatever comes next,
        // so `2E` is the number 2 followed by the name `E`.
        if self.at_exponent() {
            self.advance(); // e / E
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            self.advance_while(|c| c.is_ascii_digit());
        }
        self.slice_from(start)
    }
}

/// The lexer struct, which produces tokens from canonical expression text.
#[derive(Clone)]
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    fn error_token(&self, start_pos: usize) -> Token {
        Token {
            kind: TokenKind::Error,
            value: None,
            text: Some(String::from(self.cursor.slice_from(start_pos))),
            position: start_pos,
        }
    }

    fn lex_number(&mut self, start_pos: usize) -> Token {
        let num_str = self.cursor.scan_number();

        // A second decimal point glued to the literal is malformed.
        if self.cursor.peek() == Some('.') && self.cursor.peek_second().is_some_and(|c| !c.is_ascii_digit()) {
            self.cursor.advance();
            return self.error_token(start_pos);
        }

        match num_str.parse::<Real>() {
            Ok(val) => Token {
                kind: TokenKind::Number,
                value: Some(val),
                text: Some(String::from(num_str)),
                position: start_pos,
            },
            Err(_) => self.error_token(start_pos),
        }
    }

    /// Get the next token from the input.
    pub fn next_token(&mut self) -> Option<Token> {
        self.cursor.advance_while(char::is_whitespace);
        let start_pos = self.cursor.pos();
        let c = self.cursor.peek()?;

        if self.cursor.at_number() {
            return Some(self.lex_number(start_pos));
        }

        // Operators: + - * / and **
        if matches!(c, '+' | '-' | '*' | '/') {
            self.cursor.advance();
            let mut text = String::from(c);
            if c == '*' && self.cursor.peek() == Some('*') {
                self.cursor.advance();
                text.push('*');
            }
            return Some(Token {
                kind: TokenKind::Operator,
                value: None,
                text: Some(text),
                position: start_pos,
            });
        }

        // Identifier (constant or function name)
        if c.is_ascii_alphabetic() || c == '_' {
            let len = self
                .cursor
                .advance_while(|nc| nc.is_ascii_alphanumeric() || nc == '_');
            if len > MAX_IDENTIFIER_LENGTH {
                return Some(Token {
                    kind: TokenKind::Error,
                    value: None,
                    text: Some(alloc::format!(
                        "identifier of {} characters (maximum is {})",
                        len, MAX_IDENTIFIER_LENGTH
                    )),
                    position: start_pos,
                });
            }
            return Some(Token {
                kind: TokenKind::Identifier,
                value: None,
                text: Some(String::from(self.cursor.slice_from(start_pos))),
                position: start_pos,
            });
        }

        let kind = match c {
            '(' => TokenKind::Open,
            ')' => TokenKind::Close,
            _ => TokenKind::Error,
        };
        self.cursor.advance();
        Some(Token {
            kind,
            value: None,
            text: Some(c.to_string()),
            position: start_pos,
        })
    }
}
