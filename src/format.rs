//! Rendering of results for the calculator display.

use crate::types::EvaluationOutcome;
use crate::{Real, SIGNIFICANT_DIGITS, String, ToString};
use alloc::format;

/// Smallest decimal exponent still shown in fixed notation.
const MIN_FIXED_EXPONENT: i32 = -6;

/// Formats `n` with [`SIGNIFICANT_DIGITS`] significant digits.
///
/// Trailing zeros after the decimal point are trimmed, as is a bare trailing
/// point. Magnitudes from `1e-6` up to twelve integer digits are shown in fixed
/// notation; anything else as `mantissa e±exponent`. The 12th digit is
/// rounded half-to-even on the exact binary value. Non-finite input gives
/// `"Error"`.
///
/// ```
/// use sci_calc::format::format_number;
///
/// assert_eq!(format_number(4.0), "4");
/// assert_eq!(format_number(1.0 / 3.0), "0.333333333333");
/// assert_eq!(format_number(1e21), "1e+21");
/// assert_eq!(format_number(f64::NAN), "Error");
/// ```
pub fn format_number(n: Real) -> String {
    if !n.is_finite() {
        return "Error".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }

    let scientific = format!("{:.*e}", SIGNIFICANT_DIGITS - 1, n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < MIN_FIXED_EXPONENT || exponent >= SIGNIFICANT_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{}", trim_fraction(mantissa), sign, exponent.unsigned_abs());
    }

    let (sign, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa),
    };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    let fixed = if exponent >= 0 {
        let (int_part, frac_part) = digits.split_at(exponent as usize + 1);
        format!("{}{}.{}", sign, int_part, frac_part)
    } else {
        let zeros = "0".repeat(exponent.unsigned_abs() as usize - 1);
        format!("{}0.{}{}", sign, zeros, digits)
    };
    trim_fraction(&fixed).to_string()
}

/// Formats an evaluation outcome for the live preview: the formatted value,
/// or nothing at all when evaluation failed.
pub fn format_outcome(outcome: &EvaluationOutcome) -> String {
    match outcome {
        EvaluationOutcome::Value(v) => format_number(*v),
        EvaluationOutcome::Failed => String::new(),
    }
}

/// Drops trailing fractional zeros and then a bare trailing point.
fn trim_fraction(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers() {
        assert_eq!(format_number(4.0), "4");
        assert_eq!(format_number(120.0), "120");
        assert_eq!(format_number(-98.0), "-98");
        assert_eq!(format_number(1e11), "100000000000");
        assert_eq!(format_number(123_456_789_012.0), "123456789012");
    }

    #[test]
    fn test_fractions_are_trimmed() {
        assert_eq!(format_number(1.0 / 3.0), "0.333333333333");
        assert_eq!(format_number(2.0 / 3.0), "0.666666666667");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(2.5), "2.5");
        assert_eq!(format_number(-0.125), "-0.125");
        assert_eq!(format_number(0.000_001_5), "0.0000015");
    }

    #[test]
    fn test_twelfth_digit_rounding() {
        assert_eq!(format_number(core::f64::consts::PI), "3.14159265359");
        assert_eq!(format_number(9.999_999_999_999_9), "10");
        assert_eq!(format_number(1_234_567.891_234_567), "1234567.89123");
    }

    #[test]
    fn test_exponential_forms() {
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1_234_567_890_123.0), "1.23456789012e+12");
        assert_eq!(format_number(1.5e-8), "1.5e-8");
        assert_eq!(format_number(1e-7), "1e-7");
        assert_eq!(format_number(-2.5e100), "-2.5e+100");
    }

    #[test]
    fn test_zero_and_non_finite() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(Real::INFINITY), "Error");
        assert_eq!(format_number(Real::NEG_INFINITY), "Error");
        assert_eq!(format_number(Real::NAN), "Error");
    }

    #[test]
    fn test_format_outcome() {
        assert_eq!(format_outcome(&EvaluationOutcome::Value(0.5)), "0.5");
        assert_eq!(format_outcome(&EvaluationOutcome::Failed), "");
    }
}
