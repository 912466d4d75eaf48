//! Edits the calculator keys make to the display text.
//!
//! These work on raw display text, before canonicalization, and never fail:
//! text they cannot make sense of is still edited in a predictable way.

use crate::String;
use alloc::format;

/// Suffix appended by the percent key.
const PERCENT_SUFFIX: &str = "*0.01";

fn all_digits(s: &str, min_len: usize) -> bool {
    s.len() >= min_len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Whether `s` is exactly a display number: `digits` or `digits? . digits`,
/// optionally followed by `e`, an optional sign and digits.
fn is_number_literal(s: &str) -> bool {
    let (mantissa, exponent) = match s.split_once('e') {
        Some((m, e)) => (m, Some(e)),
        None => (s, None),
    };
    let mantissa_ok = match mantissa.split_once('.') {
        Some((int_part, frac_part)) => all_digits(int_part, 0) && all_digits(frac_part, 1),
        None => all_digits(mantissa, 1),
    };
    mantissa_ok
        && exponent.is_none_or(|e| {
            let digits = e.strip_prefix(['+', '-']).unwrap_or(e);
            all_digits(digits, 1)
        })
}

fn is_operand(s: &str) -> bool {
    s == "π" || s == "e" || is_number_literal(s)
}

/// Byte offset where the trailing number or constant starts, taking the
/// longest suffix that is one.
fn trailing_operand_start(display: &str) -> Option<usize> {
    display
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| is_operand(&display[i..]))
}

/// Byte offset of the `(` matching the final `)`, extended over a function
/// name written directly in front of it.
fn trailing_group_start(display: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in display.char_indices().rev() {
        match c {
            ')' => depth += 1,
            '(' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    let name_len = display[..i]
                        .chars()
                        .rev()
                        .take_while(char::is_ascii_alphabetic)
                        .count();
                    return Some(i - name_len);
                }
            }
            _ => {}
        }
    }
    None
}

/// Negates the last complete operand of the display text (the `+/-` key).
///
/// A trailing number or constant `X` becomes `(-X)` and a trailing group
/// `(G)` becomes `(-(G))`; a function call such as `sin(30)` counts as one
/// group. Everything before the operand is left untouched. Empty text starts
/// a negative number, and text with no trailing operand is negated as a whole.
///
/// ```
/// use sci_calc::display::toggle_sign;
///
/// assert_eq!(toggle_sign("12+3"), "12+(-3)");
/// assert_eq!(toggle_sign("12+(3*4)"), "12+(-(3*4))");
/// assert_eq!(toggle_sign(""), "-");
/// ```
pub fn toggle_sign(display: &str) -> String {
    if display.is_empty() {
        return String::from("-");
    }

    let start = if display.ends_with(')') {
        trailing_group_start(display)
    } else {
        trailing_operand_start(display)
    };

    match start {
        Some(start) => {
            let (before, operand) = display.split_at(start);
            format!("{}(-{})", before, operand)
        }
        None => format!("-{}", display),
    }
}

/// The percent key: scales the preceding value by one hundredth.
pub fn apply_percent(display: &str) -> String {
    format!("{}{}", display, PERCENT_SUFFIX)
}
