//! Built-in mathematical functions bound into the evaluation context.
//!
//! Everything goes through `libm` so the crate stays usable without std.
//! Functions never panic: outside their domain they return NaN, which the
//! evaluator turns into a domain error, and they return infinities where IEEE
//! arithmetic does (e.g. `ln(0)`).

use crate::{AngleMode, Real};
use libm::{acos, asin, atan, cos, exp, floor, log, log10, pow, sin, sqrt, tan};

/// Lanczos parameter `g`.
const LANCZOS_G: Real = 7.0;

/// Lanczos coefficients for `g = 7`, `n = 9`.
const LANCZOS_COEFFS: [Real; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_571_6e-6,
    1.505_632_735_149_311_6e-7,
];

/// Largest `n` whose factorial is finite as an `f64`.
const MAX_FINITE_FACTORIAL: Real = 170.0;

const DEG_TO_RAD: Real = core::f64::consts::PI / 180.0;
const RAD_TO_DEG: Real = 180.0 / core::f64::consts::PI;

fn is_integer(x: Real) -> bool {
    floor(x) == x
}

/// The Gamma function, by the Lanczos approximation.
///
/// For `z < 0.5` the reflection formula `Γ(z) = π / (sin(πz) Γ(1 - z))` is used.
/// Non-positive integers are poles and yield NaN, as does a NaN input.
pub fn gamma(z: Real) -> Real {
    if z.is_nan() || (z <= 0.0 && is_integer(z)) {
        return Real::NAN;
    }

    if z < 0.5 {
        let pi = core::f64::consts::PI;
        return pi / (sin(pi * z) * gamma(1.0 - z));
    }

    let z = z - 1.0;
    let mut acc = LANCZOS_COEFFS[0];
    for (i, coeff) in LANCZOS_COEFFS.iter().enumerate().skip(1) {
        acc += coeff / (z + i as Real);
    }
    let t = z + LANCZOS_G + 0.5;
    sqrt(2.0 * core::f64::consts::PI) * pow(t, z + 0.5) * exp(-t) * acc
}

/// Extended factorial.
///
/// Non-negative integers get the exact product `1·2·…·n` (`0! = 1`); above
/// 170 the product overflows, so infinity is returned without looping.
/// Other non-negative values go through `Γ(n + 1)`. Negative and non-finite
/// inputs yield NaN.
pub fn factorial(n: Real) -> Real {
    if !n.is_finite() || n < 0.0 {
        return Real::NAN;
    }
    if !is_integer(n) {
        return gamma(n + 1.0);
    }
    if n > MAX_FINITE_FACTORIAL {
        return Real::INFINITY;
    }

    let mut product = 1.0;
    let mut i = 2.0;
    while i <= n {
        product *= i;
        i += 1.0;
    }
    product
}

fn to_radians(x: Real, mode: AngleMode) -> Real {
    match mode {
        AngleMode::Degrees => x * DEG_TO_RAD,
        AngleMode::Radians => x,
    }
}

fn from_radians(x: Real, mode: AngleMode) -> Real {
    match mode {
        AngleMode::Degrees => x * RAD_TO_DEG,
        AngleMode::Radians => x,
    }
}

pub fn sine(x: Real, mode: AngleMode) -> Real {
    sin(to_radians(x, mode))
}

pub fn cosine(x: Real, mode: AngleMode) -> Real {
    cos(to_radians(x, mode))
}

pub fn tangent(x: Real, mode: AngleMode) -> Real {
    tan(to_radians(x, mode))
}

/// Inverse sine; NaN outside `[-1, 1]`.
pub fn arc_sine(x: Real, mode: AngleMode) -> Real {
    if !(-1.0..=1.0).contains(&x) {
        return Real::NAN;
    }
    from_radians(asin(x), mode)
}

/// Inverse cosine; NaN outside `[-1, 1]`.
pub fn arc_cosine(x: Real, mode: AngleMode) -> Real {
    if !(-1.0..=1.0).contains(&x) {
        return Real::NAN;
    }
    from_radians(acos(x), mode)
}

pub fn arc_tangent(x: Real, mode: AngleMode) -> Real {
    from_radians(atan(x), mode)
}

/// Natural logarithm. NaN for negative input, -∞ at zero.
pub fn ln(x: Real) -> Real {
    if x < 0.0 {
        return Real::NAN;
    }
    log(x)
}

/// Base-10 logarithm. NaN for negative input, -∞ at zero.
pub fn log_10(x: Real) -> Real {
    if x < 0.0 {
        return Real::NAN;
    }
    log10(x)
}

/// Square root; NaN for negative input.
pub fn square_root(x: Real) -> Real {
    if x < 0.0 {
        return Real::NAN;
    }
    sqrt(x)
}

/// `base ** exponent` with IEEE semantics (`(-8) ** (1/3)` is NaN).
pub fn power(base: Real, exponent: Real) -> Real {
    pow(base, exponent)
}
