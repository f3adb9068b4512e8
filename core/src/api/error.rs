//! Public error types for the stareval API.
//!
//! Parse and resolution errors are wrapped here at the API boundary and can be
//! turned into a [`Diagnostic`] for rendering.

use crate::analyzer::ResolveError;
use crate::parser::{ParseError, Span};
use core::fmt;
use thiserror::Error;

/// Public error type for all stareval operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The source is not a well-formed expression.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The expression is well-formed but cannot be bound to functions and
    /// variables of the requested type.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A custom uniform name was declared twice.
    #[error("uniform '{name}' is already defined")]
    DuplicateDefinition { name: String },
}

impl Error {
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Parse(err) => err.to_diagnostic(),
            Error::Resolve(err) => err.to_diagnostic(),
            Error::DuplicateDefinition { .. } => Diagnostic {
                severity: Severity::Error,
                message: self.to_string(),
                span: Span::default(),
                help: Some("rename one of the definitions".to_string()),
                code: Some("U001".to_string()),
            },
        }
    }
}

/// A diagnostic message with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level (error, warning).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Optional error code (e.g., "R002") for documentation lookup.
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}
