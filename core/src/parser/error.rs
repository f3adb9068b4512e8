use crate::api::{Diagnostic, Severity};
use crate::parser::{Rule, Span};
use pest::error::{ErrorVariant, InputLocation};
use thiserror::Error;

/// Parser error with its location in the source.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },

    #[error("expression nesting depth {depth} exceeds maximum of {max_depth}")]
    MaxDepthExceeded { depth: usize, max_depth: usize },

    /// Other parse errors (catch-all for Pest errors we don't specifically handle)
    #[error("{message}")]
    Other { message: String },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub(crate) fn from_pest(source: &str, error: pest::error::Error<Rule>) -> Self {
        let (start, end) = match error.location {
            InputLocation::Pos(pos) => (pos, pos),
            InputLocation::Span(span) => span,
        };
        // Point at the offending character rather than an empty range.
        let end = end.max(start + source[start..].chars().next().map_or(0, char::len_utf8));

        let kind = match error.variant {
            ErrorVariant::ParsingError { positives, .. } => ParseErrorKind::UnexpectedToken {
                expected: describe_expected(&positives),
                found: match source[start..].chars().next() {
                    Some(c) => format!("'{c}'"),
                    None => "end of input".to_string(),
                },
            },
            ErrorVariant::CustomError { message } => ParseErrorKind::Other { message },
        };
        Self::new(kind, Span::new(start, end))
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ParseErrorKind::UnexpectedToken { .. } => ("P001", None),
            ParseErrorKind::InvalidNumber { .. } => (
                "P002",
                Some("integer literals must fit in 32 bits".to_string()),
            ),
            ParseErrorKind::MaxDepthExceeded { .. } => (
                "P003",
                Some("Reduce nesting or simplify the expression".to_string()),
            ),
            ParseErrorKind::Other { .. } => ("P999", None),
        };
        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span,
            help,
            code: Some(code.to_string()),
        }
    }
}

fn describe_expected(rules: &[Rule]) -> String {
    let mut expected: Vec<&str> = rules.iter().map(|rule| describe_rule(*rule)).collect();
    expected.dedup();
    match expected.as_slice() {
        [] => "expression".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

fn describe_rule(rule: Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::expression => "expression",
        Rule::ident | Rule::call => "identifier",
        Rule::integer | Rule::float => "number",
        Rule::boolean => "boolean",
        Rule::neg | Rule::not => "prefix operator",
        Rule::or
        | Rule::and
        | Rule::eq
        | Rule::ne
        | Rule::le
        | Rule::ge
        | Rule::lt
        | Rule::gt
        | Rule::add
        | Rule::sub
        | Rule::mul
        | Rule::div
        | Rule::rem => "operator",
        _ => "token",
    }
}
