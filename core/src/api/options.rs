//! Configuration options for expression resolution.

use crate::parser::DEFAULT_MAX_DEPTH;

/// Configuration options for the [`ExpressionResolver`](crate::analyzer::ExpressionResolver).
///
/// # Example
///
/// ```
/// use stareval_core::api::ResolverOptions;
///
/// let options = ResolverOptions {
///     constant_folding: false,
///     ..ResolverOptions::default()
/// };
/// assert_eq!(options.max_depth, 256);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Maximum call nesting accepted while resolving (and parsing).
    ///
    /// Default: 256
    pub max_depth: usize,

    /// Replace calls to pure functions with all-constant arguments by their
    /// value at resolution time.
    ///
    /// Default: true
    pub constant_folding: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            constant_folding: true,
        }
    }
}
