//! Stareval - typed expressions for shader-pack custom uniforms
//!
//! # Overview
//!
//! Stareval compiles small, statically typed expressions written by shader
//! pack authors into trees that a renderer evaluates once per frame:
//!
//! - Per-frame values derived from host state (`frameCounter % 2 == 0`)
//! - Eased values (`smooth(rainStrength, 2.0)`)
//! - Vector and matrix math on uniforms (`length(sunPosition)`)
//!
//! Expressions are resolved against a catalog of overloaded built-in
//! functions chosen by the declared result type, with `int` promoted to
//! `float` where needed. Every check happens at compile time; evaluation
//! cannot fail and reuses a single register.
//!
//! # Quick Start
//!
//! ```
//! use stareval::{
//!     BasicFunctionContext, FrameTimer, FunctionReturn, ResolverOptions, Type, compile, stdlib,
//! };
//!
//! let functions = stdlib::builtins(&FrameTimer::shared());
//! let mut context = BasicFunctionContext::new();
//! context.set_float("rainStrength", 0.25);
//!
//! let expr = compile(
//!     &functions,
//!     &context,
//!     ResolverOptions::default(),
//!     Type::Float,
//!     "clamp(rainStrength * 2, 0, 1)",
//! )
//! .unwrap();
//!
//! let mut ret = FunctionReturn::default();
//! expr.evaluate_to(&context, &mut ret);
//! assert_eq!(ret.float_return, 0.5);
//! ```
//!
//! Errors carry source spans and render with [`render_error`].

mod error_renderer;

pub use error_renderer::{
    render_error, render_error_to, render_error_to_string, render_error_to_string_no_color,
};

// Re-export public API from stareval_core
pub use stareval_core::api::{
    CustomUniforms, Diagnostic, Error, ResolverOptions, Severity, SkippedUniform, compile,
};

// Re-export the building blocks hosts interact with
pub use stareval_core::context::{BasicFunctionContext, ContextError, FunctionContext};
pub use stareval_core::expression::{ConstantExpression, Expression, HostValue};
pub use stareval_core::functions::{FrameTimer, TypedFunction};
pub use stareval_core::resolver::FunctionResolver;
pub use stareval_core::types::{Parameter, Type};
pub use stareval_core::values::{FunctionReturn, Object};
pub use stareval_core::{analyzer, functions, parser, stdlib};
