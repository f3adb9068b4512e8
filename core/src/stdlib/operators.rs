//! Arithmetic, comparison and logic operators.
//!
//! Integer arithmetic wraps, and integer division or remainder by zero gives
//! 0 instead of trapping: evaluation runs every frame and has no error path.
//! Float `%` takes the sign of the dividend.

use crate::functions::{
    B2BFunction, BB2BFunction, F2FFunction, FF2BFunction, FF2FFunction, I2IFunction,
    II2BFunction, II2IFunction,
};
use crate::resolver::Builder;

fn int_div(a: i32, b: i32) -> i32 {
    if b == 0 { 0 } else { a.wrapping_div(b) }
}

fn int_rem(a: i32, b: i32) -> i32 {
    if b == 0 { 0 } else { a.wrapping_rem(b) }
}

pub fn register_operators(builder: &mut Builder) {
    // Arithmetic
    builder
        .add("+", II2IFunction::new(i32::wrapping_add))
        .add("+", FF2FFunction::new(|a, b| a + b))
        .add("-", II2IFunction::new(i32::wrapping_sub))
        .add("-", FF2FFunction::new(|a, b| a - b))
        .add("*", II2IFunction::new(i32::wrapping_mul))
        .add("*", FF2FFunction::new(|a, b| a * b))
        .add("/", II2IFunction::new(int_div))
        .add("/", FF2FFunction::new(|a, b| a / b))
        .add("%", II2IFunction::new(int_rem))
        .add("%", FF2FFunction::new(|a, b| a % b))
        .add("-", I2IFunction::new(i32::wrapping_neg))
        .add("-", F2FFunction::new(|a| -a));

    // Comparison
    builder
        .add("<", II2BFunction::new(|a, b| a < b))
        .add("<", FF2BFunction::new(|a, b| a < b))
        .add("<=", II2BFunction::new(|a, b| a <= b))
        .add("<=", FF2BFunction::new(|a, b| a <= b))
        .add(">", II2BFunction::new(|a, b| a > b))
        .add(">", FF2BFunction::new(|a, b| a > b))
        .add(">=", II2BFunction::new(|a, b| a >= b))
        .add(">=", FF2BFunction::new(|a, b| a >= b))
        .add("==", BB2BFunction::new(|a, b| a == b))
        .add("==", II2BFunction::new(|a, b| a == b))
        .add("==", FF2BFunction::new(|a, b| a == b))
        .add("!=", BB2BFunction::new(|a, b| a != b))
        .add("!=", II2BFunction::new(|a, b| a != b))
        .add("!=", FF2BFunction::new(|a, b| a != b));

    // Logic; both operands are always evaluated.
    builder
        .add("&&", BB2BFunction::new(|a, b| a && b))
        .add("||", BB2BFunction::new(|a, b| a || b))
        .add("!", B2BFunction::new(|a| !a));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_division_by_zero_is_zero() {
        assert_eq!(int_div(7, 0), 0);
        assert_eq!(int_rem(7, 0), 0);
        assert_eq!(int_div(7, 2), 3);
        assert_eq!(int_rem(-7, 2), -1);
    }

    #[test]
    fn test_int_division_overflow_wraps() {
        assert_eq!(int_div(i32::MIN, -1), i32::MIN);
        assert_eq!(int_rem(i32::MIN, -1), 0);
    }
}
