//! Math functions and constants.
//!
//! Functions: abs, min, max, clamp, floor, ceil, round, frac, signum, sqrt,
//!            pow, exp, exp2, log, log2, sin, cos, tan, asin, acos, atan,
//!            atan2, torad, todeg, fmod, between, equals
//! Constants: pi(), e()
//! Conversions: float(int), int(float), bool(int)

use crate::functions::{
    F2FFunction, F2IFunction, FF2FFunction, FFF2BFunction, FFF2FFunction, I2BFunction,
    I2FFunction, I2IFunction, II2IFunction, III2IFunction, V2FFunction,
};
use crate::resolver::Builder;

// ============================================================================
// Basic Operations
// ============================================================================

/// Clamp without the `min <= max` precondition of `f32::clamp`.
fn clamp_float(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

fn clamp_int(value: i32, min: i32, max: i32) -> i32 {
    value.max(min).min(max)
}

/// Fractional part, always in `[0, 1)`.
fn frac(value: f32) -> f32 {
    value - value.floor()
}

/// Like `f32::signum` but 0 for zero.
fn signum(value: f32) -> f32 {
    if value == 0.0 { 0.0 } else { value.signum() }
}

// ============================================================================
// Comparisons
// ============================================================================

fn between(value: f32, min: f32, max: f32) -> bool {
    value >= min && value <= max
}

fn equals(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() <= epsilon
}

pub fn register_math(builder: &mut Builder) {
    builder
        .add("abs", I2IFunction::new(i32::wrapping_abs))
        .add("abs", F2FFunction::new(f32::abs))
        .add("min", II2IFunction::new(i32::min))
        .add("min", FF2FFunction::new(f32::min))
        .add("max", II2IFunction::new(i32::max))
        .add("max", FF2FFunction::new(f32::max))
        .add("clamp", III2IFunction::new(clamp_int))
        .add("clamp", FFF2FFunction::new(clamp_float))
        .add("signum", I2IFunction::new(i32::signum))
        .add("signum", F2FFunction::new(signum));

    // Rounding
    builder
        .add("floor", F2FFunction::new(f32::floor))
        .add("ceil", F2FFunction::new(f32::ceil))
        .add("round", F2FFunction::new(f32::round))
        .add("frac", F2FFunction::new(frac))
        .add("fmod", FF2FFunction::new(|a, b| a % b));

    // Exponentiation
    builder
        .add("sqrt", F2FFunction::new(f32::sqrt))
        .add("pow", FF2FFunction::new(f32::powf))
        .add("exp", F2FFunction::new(f32::exp))
        .add("exp2", F2FFunction::new(f32::exp2))
        .add("log", F2FFunction::new(f32::ln))
        .add("log2", F2FFunction::new(f32::log2));

    // Trigonometry
    builder
        .add("sin", F2FFunction::new(f32::sin))
        .add("cos", F2FFunction::new(f32::cos))
        .add("tan", F2FFunction::new(f32::tan))
        .add("asin", F2FFunction::new(f32::asin))
        .add("acos", F2FFunction::new(f32::acos))
        .add("atan", F2FFunction::new(f32::atan))
        .add("atan", FF2FFunction::new(f32::atan2))
        .add("atan2", FF2FFunction::new(f32::atan2))
        .add("torad", F2FFunction::new(f32::to_radians))
        .add("todeg", F2FFunction::new(f32::to_degrees));

    builder
        .add("between", FFF2BFunction::new(between))
        .add("equals", FFF2BFunction::new(equals))
        .add("pi", V2FFunction::new(|| core::f32::consts::PI))
        .add("e", V2FFunction::new(|| core::f32::consts::E));

    // Conversions. `float(int)` doubles as the implicit int to float conversion.
    builder
        .add("float", I2FFunction::new(|value| value as f32))
        .add("int", F2IFunction::new(|value| value as i32))
        .add("bool", I2BFunction::new(|value| value != 0));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_tolerates_inverted_bounds() {
        assert_eq!(clamp_float(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp_float(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp_float(0.5, 1.0, 0.0), 0.0);
        assert_eq!(clamp_int(3, 10, 0), 0);
    }

    #[test]
    fn test_frac_is_positive() {
        assert!((frac(2.75) - 0.75).abs() < 1e-6);
        assert!((frac(-0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_signum_of_zero() {
        assert_eq!(signum(0.0), 0.0);
        assert_eq!(signum(-3.0), -1.0);
        assert_eq!(signum(2.0), 1.0);
    }

    #[test]
    fn test_between_and_equals() {
        assert!(between(0.5, 0.0, 1.0));
        assert!(between(1.0, 0.0, 1.0));
        assert!(!between(1.5, 0.0, 1.0));
        assert!(equals(0.1 + 0.2, 0.3, 1e-6));
        assert!(!equals(0.1, 0.3, 0.1));
    }
}
