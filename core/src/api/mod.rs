//! Public API for compiling stareval expressions.
//!
//! [`compile`] turns one source string into an evaluable tree; the
//! [`CustomUniforms`] driver manages a whole set of named expressions that
//! are re-evaluated every frame.
//!
//! # Example
//!
//! ```
//! use stareval_core::api::{CustomUniforms, ResolverOptions};
//! use stareval_core::context::BasicFunctionContext;
//! use stareval_core::expression::HostValue;
//! use stareval_core::functions::FrameTimer;
//! use stareval_core::stdlib;
//! use stareval_core::types::Type;
//! use stareval_core::values::FunctionReturn;
//!
//! let functions = stdlib::builtins(&FrameTimer::shared());
//! let frame = HostValue::new(Type::Int);
//! let mut context = BasicFunctionContext::new();
//! context.set_host_value("frameCounter", &frame);
//!
//! let mut builder = CustomUniforms::builder();
//! builder.add("blink", Type::Boolean, "frameCounter % 2 == 0");
//! let mut uniforms = builder.build(&functions, &context, ResolverOptions::default());
//!
//! let mut ret = FunctionReturn::default();
//! frame.set_int(7);
//! uniforms.update(&context);
//! uniforms.read("blink", &mut ret);
//! assert!(!ret.boolean_return);
//! ```

pub mod error;
pub mod options;
pub mod uniforms;

pub use error::{Diagnostic, Error, Severity};
pub use options::ResolverOptions;
pub use uniforms::{CustomUniforms, SkippedUniform};

use crate::analyzer::ExpressionResolver;
use crate::context::FunctionContext;
use crate::expression::Expression;
use crate::parser;
use crate::resolver::FunctionResolver;
use crate::types::Type;
use bumpalo::Bump;

/// Parses `source` and resolves it to produce `expected`.
///
/// The token tree lives in a scratch arena dropped before returning; the
/// resolved tree owns everything it needs.
pub fn compile(
    functions: &FunctionResolver,
    context: &dyn FunctionContext,
    options: ResolverOptions,
    expected: Type,
    source: &str,
) -> Result<Box<dyn Expression>, Error> {
    let arena = Bump::new();
    let parsed = parser::parse_with_max_depth(&arena, source, options.max_depth)?;
    let expression = ExpressionResolver::new(functions, context, options)
        .resolve_expression(expected, parsed.expr)?;
    Ok(expression)
}
