pub mod error;
pub mod expression_resolver;

#[cfg(test)]
mod analyzer_test;

pub use error::{ResolveError, ResolveErrorKind};
pub use expression_resolver::{ExpressionResolver, IMPLICIT_CONVERSIONS};
