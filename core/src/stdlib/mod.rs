//! The built-in function catalog.
//!
//! Operators are registered under their symbol (`+`, `==`, `!`, ...), so
//! binary, unary and named calls all go through the same overload lookup.
//! Overloads are grouped by concern:
//! - operators: arithmetic, comparison and logic
//! - math: scalar functions and constants
//! - vector: constructors and component-wise arithmetic
//! - control: `if` and the stateful `smooth`

use crate::functions::{FrameTimer, If, SmoothFloat};
use crate::resolver::{Builder, FunctionResolver};
use crate::types::Type;
use std::sync::Arc;

pub mod math;
pub mod operators;
pub mod vector;

pub use math::register_math;
pub use operators::register_operators;
pub use vector::register_vector;

/// Longest `if(c1, v1, ..., cN, vN, otherwise)` chain with a built-in overload.
pub const MAX_IF_CONDITIONS: usize = 8;

/// A resolver holding the whole catalog.
pub fn builtins(timer: &Arc<FrameTimer>) -> FunctionResolver {
    let mut builder = FunctionResolver::builder();
    register_builtins(&mut builder, timer);
    builder.build()
}

/// Registers the whole catalog; hosts can add their own overloads to the
/// same builder before building it.
pub fn register_builtins(builder: &mut Builder, timer: &Arc<FrameTimer>) {
    register_operators(builder);
    register_math(builder);
    register_vector(builder);
    register_control(builder, timer);
}

/// `if` for every type and chain length, and `smooth` with one to three arguments.
pub fn register_control(builder: &mut Builder, timer: &Arc<FrameTimer>) {
    for ty in Type::ALL {
        for conditions in 1..=MAX_IF_CONDITIONS {
            builder.add("if", If::new(ty, conditions));
        }
    }

    for arity in 1..=3 {
        let timer = Arc::clone(timer);
        builder.add_dynamic("smooth", Type::Float, move || {
            Arc::new(SmoothFloat::new(Arc::clone(&timer), arity))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_if_has_an_overload_per_type_and_length() {
        let resolver = builtins(&FrameTimer::shared());
        for ty in Type::ALL {
            let overloads = resolver.resolve("if", ty).unwrap();
            assert_eq!(overloads.len(), MAX_IF_CONDITIONS);
            assert_eq!(overloads[0].parameters().len(), 3);
        }
    }

    #[test]
    fn test_smooth_is_dynamic() {
        let resolver = builtins(&FrameTimer::shared());
        let first = resolver.resolve("smooth", Type::Float).unwrap();
        let second = resolver.resolve("smooth", Type::Float).unwrap();
        assert_eq!(first.len(), 3);
        assert!(!Arc::ptr_eq(&first[0], &second[0]));
        assert!(resolver.resolve("smooth", Type::Int).unwrap().is_empty());
    }

    #[test]
    fn test_catalog_lists_every_group() {
        let resolver = builtins(&FrameTimer::shared());
        let names = resolver.names();
        for name in ["+", "%", "==", "&&", "!", "sin", "clamp", "vec3", "dot", "if", "smooth"] {
            assert!(names.contains(&name), "missing {name}");
        }
    }
}
