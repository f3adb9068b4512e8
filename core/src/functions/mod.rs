//! Typed built-in functions.
//!
//! A [`TypedFunction`] is one overload: a fixed return type, a fixed
//! parameter signature, a dispatch priority, a purity flag, and the code that
//! evaluates it from already-resolved argument expressions.

mod adapters;
mod control;
mod smooth;

pub use adapters::*;
pub use control::If;
pub use smooth::{FrameTimer, SmoothFloat};

use crate::context::FunctionContext;
use crate::expression::Expression;
use crate::types::{Parameter, Type};
use crate::values::FunctionReturn;
use core::fmt;

pub trait TypedFunction: fmt::Debug + Send + Sync {
    fn return_type(&self) -> Type;

    fn parameters(&self) -> &[Parameter];

    /// Tie-break weight between otherwise equally good overloads; higher wins.
    fn priority(&self) -> i32 {
        0
    }

    /// Same inputs always give the same output. Only pure calls are folded.
    fn is_pure(&self) -> bool {
        true
    }

    /// Evaluates `params` left to right through `ret`, then writes this
    /// function's result into the field for [`return_type`](Self::return_type).
    fn evaluate_to(
        &self,
        params: &[Box<dyn Expression>],
        context: &dyn FunctionContext,
        ret: &mut FunctionReturn,
    );
}

/// Structural equality: return type, parameters (including constness),
/// priority and purity.
impl PartialEq for dyn TypedFunction + '_ {
    fn eq(&self, other: &Self) -> bool {
        self.return_type() == other.return_type()
            && self.parameters() == other.parameters()
            && self.priority() == other.priority()
            && self.is_pure() == other.is_pure()
    }
}

/// Formats an overload as `float name(float, const float) (priority: 0, pure: yes)`.
pub struct Signature<'a> {
    name: &'a str,
    function: &'a dyn TypedFunction,
}

impl<'a> Signature<'a> {
    pub fn new(name: &'a str, function: &'a dyn TypedFunction) -> Self {
        Self { name, function }
    }
}

impl fmt::Display for Signature<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.function.return_type(), self.name)?;
        for (index, parameter) in self.function.parameters().iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{parameter}")?;
        }
        write!(
            f,
            ") (priority: {}, pure: {})",
            self.function.priority(),
            if self.function.is_pure() { "yes" } else { "no" }
        )
    }
}
