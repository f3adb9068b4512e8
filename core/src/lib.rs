//! Stareval: a typed expression evaluator for shader-pack custom uniforms.
//!
//! Expressions such as `if(frame % 2 == 0) { 1.0 } else { 0.0 }` are parsed into
//! a token tree, bound to concrete built-in overloads by the
//! [`ExpressionResolver`](analyzer::ExpressionResolver), and then evaluated
//! every frame through a single reused [`FunctionReturn`](values::FunctionReturn)
//! register, so the hot path never allocates.
//!
//! ## Example
//!
//! ```
//! use stareval_core::{
//!     api::{ResolverOptions, compile},
//!     context::BasicFunctionContext,
//!     functions::FrameTimer,
//!     stdlib,
//!     types::Type,
//!     values::FunctionReturn,
//! };
//!
//! let functions = stdlib::builtins(&FrameTimer::shared());
//! let mut context = BasicFunctionContext::new();
//! context.set_int("frame", 3);
//!
//! let expr = compile(
//!     &functions,
//!     &context,
//!     ResolverOptions::default(),
//!     Type::Float,
//!     "if(frame % 2 == 0) { 1.0 } else { 0.0 }",
//! )
//! .unwrap();
//!
//! let mut ret = FunctionReturn::default();
//! expr.evaluate_to(&context, &mut ret);
//! assert_eq!(ret.float_return, 0.0);
//! ```

pub mod analyzer;
pub mod api;
pub mod context;
pub mod expression;
pub mod functions;
pub mod parser;
pub mod resolver;
pub mod stdlib;
pub mod types;
pub mod values;
