#![cfg_attr(all(not(test), target_arch = "arm"), no_std)]
#![doc = r#"
# sci-calc

The expression core of a scientific calculator. It turns what the user typed
on the display (infix notation with `×`, `÷`, `^`, `π`, `e`, function names and
a postfix `!`) into a number, and turns numbers back into display text.

## Overview

The pipeline has three stages:

1. [`canon::canonicalize`] rewrites the display text into canonical text:
   glyphs become ASCII operators, `^` becomes `**`, `π`/`e` become `PI`/`E`,
   `5!` becomes `FACT(5)` and `sin(` becomes `SIN(`.
2. [`engine::evaluate`] parses the canonical text with a Pratt parser into a
   small AST and interprets it against a fixed binding environment
   ([`context::EvalContext`]). Names outside that environment cannot even be
   parsed, so nothing but arithmetic over the bound functions ever runs.
3. [`format::format_number`] renders the result with 12 significant digits.

[`display::toggle_sign`] is the `+/-` key: it negates the last complete operand
of the display text. [`session::Session`] ties the pieces to the angle mode and
memory register owned by a calculator session.

## Quick Start

```rust
use sci_calc::{AngleMode, EvaluationOutcome};
use sci_calc::canon::canonicalize;
use sci_calc::engine::evaluate;
use sci_calc::format::format_number;

let canonical = canonicalize("2×(3+4)^2");
assert_eq!(canonical, "2*(3+4)**2");

match evaluate(&canonical, AngleMode::Degrees) {
    EvaluationOutcome::Value(v) => assert_eq!(format_number(v), "98"),
    EvaluationOutcome::Failed => unreachable!(),
}
```

## Angle modes

```rust
use sci_calc::{AngleMode, assert_approx_eq};
use sci_calc::canon::canonicalize;
use sci_calc::engine::evaluate;

let deg = evaluate(&canonicalize("sin(90)"), AngleMode::Degrees).value().unwrap();
assert_approx_eq!(deg, 1.0);

let rad = evaluate(&canonicalize("sin(90)"), AngleMode::Radians).value().unwrap();
assert!((rad - 1.0).abs() > 0.1);
```

## Error Handling

`evaluate` never reports *why* an expression failed: malformed syntax, unbound
names, domain errors and non-finite results all collapse into
[`EvaluationOutcome::Failed`]. Callers that want the detail use
[`engine::interp`], which returns a [`error::CalcError`]:

```rust
use sci_calc::AngleMode;
use sci_calc::context::EvalContext;
use sci_calc::engine::interp;
use sci_calc::error::CalcError;

let ctx = EvalContext::new(AngleMode::Radians);
match interp("alert(1)", &ctx) {
    Err(CalcError::UnboundName { name }) => assert_eq!(name, "alert"),
    other => panic!("unexpected: {:?}", other),
}
assert!(matches!(interp("1/0", &ctx), Err(CalcError::DivideByZero)));
```

## Canonical grammar

| Precedence | Operators   | Associativity |
|------------|-------------|---------------|
| 9          | `+` `-`     | Left          |
| 10         | `*` `/`     | Left          |
| 14         | unary `+ -` | Right (unary) |
| 16         | `**`        | Right         |

Bound functions (one argument each): `SIN`, `COS`, `TAN`, `ASIN`, `ACOS`,
`ATAN`, `LN`, `LOG`, `SQRT`, `FACT`. Bound constants: `PI`, `E`.

## Embedded Systems Support

The crate only needs `alloc`; all math goes through `libm`, so it builds for
bare-metal ARM targets as `no_std`.
"#]

extern crate alloc;

pub use alloc::boxed::Box;
pub use alloc::string::{String, ToString};
pub use alloc::vec::Vec;

pub mod canon;
pub mod context;
pub mod display;
pub mod engine;
pub mod error;
pub mod eval;
pub mod format;
pub mod functions;
pub mod lexer;
pub mod session;
pub mod types;

pub use context::EvalContext;
pub use session::{HistoryEntry, MemoryRegister, Session};
pub use types::*;

/// Floating-point type used for every value the calculator produces.
pub type Real = f64;

/// Longest canonical expression the parser accepts, in bytes.
pub const MAX_EXPRESSION_LENGTH: usize = 10_000;

/// Deepest nesting of parentheses, unary operators and calls the parser accepts.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Significant digits shown by the formatter.
pub const SIGNIFICANT_DIGITS: usize = 12;

pub mod constants {
    use super::Real;

    pub const PI: Real = core::f64::consts::PI;
    pub const E: Real = core::f64::consts::E;
    pub const TEST_PRECISION: Real = 1e-10;
}

/// Utility macro to check if two floating point values are approximately equal
/// within a specified epsilon. Supports optional format arguments like assert_eq!.
#[macro_export]
macro_rules! assert_approx_eq {
    // Case 1: assert_approx_eq!(left, right) -> use default epsilon
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $crate::constants::TEST_PRECISION)
    };
    // Case 2: assert_approx_eq!(left, right, epsilon) -> use specified epsilon
    ($left:expr, $right:expr, $epsilon:expr $(,)?) => {{
        let left_val: $crate::Real = $left;
        let right_val: $crate::Real = $right;
        let eps: $crate::Real = $epsilon;
        assert!(
            (left_val - right_val).abs() < eps,
            "assertion failed: `(left ≈ right)` (left: `{}`, right: `{}`, epsilon: `{}`)",
            left_val,
            right_val,
            eps
        );
    }};
    // Case 3: assert_approx_eq!(left, right, epsilon, "format message", args...)
    ($left:expr, $right:expr, $epsilon:expr, $($arg:tt)+) => {{
        let left_val: $crate::Real = $left;
        let right_val: $crate::Real = $right;
        let eps: $crate::Real = $epsilon;
        assert!((left_val - right_val).abs() < eps, $($arg)+);
    }};
}
