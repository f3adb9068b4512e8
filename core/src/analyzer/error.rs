use crate::api::{Diagnostic, Severity};
use crate::parser::Span;
use crate::types::Type;
use thiserror::Error;

/// Resolution error with the span of the offending node.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub span: Span,
}

/// Specific kinds of resolution errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveErrorKind {
    #[error("no such function: {name}")]
    UnknownFunction { name: String },

    #[error("no overload of '{name}' returns {return_type} for {arity} argument(s)")]
    NoMatchingOverload {
        name: String,
        return_type: Type,
        arity: usize,
    },

    #[error("variable hasn't been set: {name}")]
    UnboundVariable { name: String },

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: Type, found: Type },

    /// Argument `index` (zero based) of `name` must fold to a constant.
    #[error("argument {} of '{name}' must be a constant", .index + 1)]
    NotConstant { name: String, index: usize },

    #[error("expression nesting exceeds maximum depth of {max_depth}")]
    MaxDepthExceeded { max_depth: usize },
}

impl ResolveError {
    pub fn new(kind: ResolveErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Fatal errors abort resolution outright; the others only rule out the
    /// overload being tried.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind,
            ResolveErrorKind::UnknownFunction { .. }
                | ResolveErrorKind::UnboundVariable { .. }
                | ResolveErrorKind::MaxDepthExceeded { .. }
        )
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ResolveErrorKind::UnknownFunction { .. } => ("R001", None),
            ResolveErrorKind::NoMatchingOverload { .. } => (
                "R002",
                Some("check the argument types; int converts to float implicitly"),
            ),
            ResolveErrorKind::UnboundVariable { .. } => (
                "R003",
                Some("make sure the host provides this variable"),
            ),
            ResolveErrorKind::TypeMismatch { .. } => ("R004", None),
            ResolveErrorKind::NotConstant { .. } => (
                "R005",
                Some("use a literal or an expression of literals"),
            ),
            ResolveErrorKind::MaxDepthExceeded { .. } => {
                ("R006", Some("reduce nesting or simplify the expression"))
            }
        };
        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span,
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}
