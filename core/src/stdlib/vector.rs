//! Vector constructors and component-wise arithmetic.

use crate::functions::{Binary, Quaternary, Ternary, Unary};
use crate::resolver::Builder;
use crate::values::Scalar;
use core::array;

fn zip<const N: usize>(a: [f32; N], b: [f32; N], op: impl Fn(f32, f32) -> f32) -> [f32; N] {
    array::from_fn(|i| op(a[i], b[i]))
}

fn dot<const N: usize>(a: [f32; N], b: [f32; N]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn length<const N: usize>(a: [f32; N]) -> f32 {
    dot(a, a).sqrt()
}

/// Column-major `m * v`.
fn transform(m: [f32; 16], v: [f32; 4]) -> [f32; 4] {
    array::from_fn(|row| (0..4).map(|col| m[col * 4 + row] * v[col]).sum())
}

/// Column-major `a * b`.
fn compose(a: [f32; 16], b: [f32; 16]) -> [f32; 16] {
    array::from_fn(|i| {
        let (col, row) = (i / 4, i % 4);
        (0..4).map(|k| a[k * 4 + row] * b[col * 4 + k]).sum()
    })
}

fn register_componentwise<const N: usize>(builder: &mut Builder)
where
    [f32; N]: Scalar,
{
    builder
        .add("+", Binary::<[f32; N], [f32; N], [f32; N]>::new(|a, b| zip(a, b, |x, y| x + y)))
        .add("-", Binary::<[f32; N], [f32; N], [f32; N]>::new(|a, b| zip(a, b, |x, y| x - y)))
        .add("*", Binary::<[f32; N], [f32; N], [f32; N]>::new(|a, b| zip(a, b, |x, y| x * y)))
        .add("*", Binary::<[f32; N], f32, [f32; N]>::new(|a, s| a.map(|x| x * s)))
        .add("*", Binary::<f32, [f32; N], [f32; N]>::new(|s, a| a.map(|x| x * s)))
        .add("-", Unary::<[f32; N], [f32; N]>::new(|a| a.map(|x| -x)))
        .add("dot", Binary::<[f32; N], [f32; N], f32>::new(dot))
        .add("length", Unary::<[f32; N], f32>::new(length));
}

pub fn register_vector(builder: &mut Builder) {
    builder
        .add("vec2", Binary::<f32, f32, [f32; 2]>::new(|x, y| [x, y]))
        .add("vec3", Ternary::<f32, f32, f32, [f32; 3]>::new(|x, y, z| [x, y, z]))
        .add("vec3", Binary::<[f32; 2], f32, [f32; 3]>::new(|[x, y], z| [x, y, z]))
        .add("vec4", Quaternary::<f32, f32, f32, f32, [f32; 4]>::new(|x, y, z, w| [x, y, z, w]))
        .add("vec4", Binary::<[f32; 3], f32, [f32; 4]>::new(|[x, y, z], w| [x, y, z, w]));

    register_componentwise::<2>(builder);
    register_componentwise::<3>(builder);
    register_componentwise::<4>(builder);

    builder
        .add("*", Binary::<[f32; 16], [f32; 4], [f32; 4]>::new(transform))
        .add("*", Binary::<[f32; 16], [f32; 16], [f32; 16]>::new(compose));
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDENTITY: [f32; 16] = [
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ];

    fn translation(x: f32, y: f32, z: f32) -> [f32; 16] {
        let mut m = IDENTITY;
        m[12] = x;
        m[13] = y;
        m[14] = z;
        m
    }

    #[test]
    fn test_dot_and_length() {
        assert_eq!(dot([1.0, 2.0, 3.0], [4.0, 5.0, 6.0]), 32.0);
        assert_eq!(length([3.0, 4.0]), 5.0);
    }

    #[test]
    fn test_transform_is_column_major() {
        let moved = transform(translation(1.0, 2.0, 3.0), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(moved, [1.0, 2.0, 3.0, 1.0]);
        // Directions are unaffected by translation.
        let direction = transform(translation(1.0, 2.0, 3.0), [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(direction, [0.0, 1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_compose_applies_right_matrix_first() {
        let both = compose(translation(1.0, 0.0, 0.0), translation(0.0, 2.0, 0.0));
        assert_eq!(both, translation(1.0, 2.0, 0.0));
        assert_eq!(compose(IDENTITY, both), both);
    }
}
