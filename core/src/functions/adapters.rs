//! Generic function shapes.
//!
//! Each shape pulls a fixed number of [`Scalar`] arguments out of the register
//! and hands them to a plain function pointer. The classic per-signature
//! names (`BB2BFunction`, `F2FFunction`, ...) are aliases of these.

use super::TypedFunction;
use crate::context::FunctionContext;
use crate::expression::Expression;
use crate::types::{Parameter, Type};
use crate::values::{FunctionReturn, Scalar};

macro_rules! shape {
    ($(#[$doc:meta])* $name:ident, $arity:literal, [$($arg:ident: $ty:ident @ $index:literal),*]) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name<$($ty,)* R> {
            parameters: [Parameter; $arity],
            priority: i32,
            pure: bool,
            function: fn($($ty),*) -> R,
        }

        impl<$($ty: Scalar,)* R: Scalar> $name<$($ty,)* R> {
            pub fn new(function: fn($($ty),*) -> R) -> Self {
                Self {
                    parameters: [$(Parameter::new($ty::TYPE)),*],
                    priority: 0,
                    pure: true,
                    function,
                }
            }

            pub fn with_priority(mut self, priority: i32) -> Self {
                self.priority = priority;
                self
            }

            /// Marks the function as time-varying or stateful.
            pub fn impure(mut self) -> Self {
                self.pure = false;
                self
            }

            /// Requires argument `index` to fold to a constant.
            pub fn with_constant_parameter(mut self, index: usize) -> Self {
                self.parameters[index].constant = true;
                self
            }

            /// Applies the scalar rule directly.
            #[inline]
            pub fn eval(&self, $($arg: $ty),*) -> R {
                (self.function)($($arg),*)
            }
        }

        impl<$($ty: Scalar,)* R: Scalar> TypedFunction for $name<$($ty,)* R> {
            fn return_type(&self) -> Type {
                R::TYPE
            }

            fn parameters(&self) -> &[Parameter] {
                &self.parameters
            }

            fn priority(&self) -> i32 {
                self.priority
            }

            fn is_pure(&self) -> bool {
                self.pure
            }

            #[inline]
            #[allow(unused_variables)]
            fn evaluate_to(
                &self,
                params: &[Box<dyn Expression>],
                context: &dyn FunctionContext,
                ret: &mut FunctionReturn,
            ) {
                debug_assert_eq!(params.len(), $arity);
                $(
                    params[$index].evaluate_to(context, ret);
                    let $arg = $ty::read(ret);
                )*
                (self.function)($($arg),*).write(ret);
            }
        }
    };
}

shape!(
    /// A producer with no arguments.
    Nullary, 0, []
);
shape!(Unary, 1, [a: A @ 0]);
shape!(Binary, 2, [a: A @ 0, b: B @ 1]);
shape!(Ternary, 3, [a: A @ 0, b: B @ 1, c: C @ 2]);
shape!(Quaternary, 4, [a: A @ 0, b: B @ 1, c: C @ 2, d: D @ 3]);

pub type V2BFunction = Nullary<bool>;
pub type V2IFunction = Nullary<i32>;
pub type V2FFunction = Nullary<f32>;

pub type B2BFunction = Unary<bool, bool>;
pub type I2BFunction = Unary<i32, bool>;
pub type I2IFunction = Unary<i32, i32>;
pub type I2FFunction = Unary<i32, f32>;
pub type F2IFunction = Unary<f32, i32>;
pub type F2FFunction = Unary<f32, f32>;

pub type BB2BFunction = Binary<bool, bool, bool>;
pub type II2BFunction = Binary<i32, i32, bool>;
pub type II2IFunction = Binary<i32, i32, i32>;
pub type FF2BFunction = Binary<f32, f32, bool>;
pub type FF2FFunction = Binary<f32, f32, f32>;

pub type III2IFunction = Ternary<i32, i32, i32, i32>;
pub type FFF2BFunction = Ternary<f32, f32, f32, bool>;
pub type FFF2FFunction = Ternary<f32, f32, f32, f32>;
