//! Error rendering using ariadne
//!
//! Turns a [`Diagnostic`] into a report with the offending source snippet,
//! the error code and help text.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

const SOURCE_ID: &str = "<expression>";

/// Render an error with formatting to stderr
///
/// # Example
/// ```no_run
/// use stareval::{BasicFunctionContext, FrameTimer, ResolverOptions, Type, compile, render_error, stdlib};
///
/// let functions = stdlib::builtins(&FrameTimer::shared());
/// let source = "1 + true";
/// if let Err(e) = compile(&functions, &BasicFunctionContext::new(), ResolverOptions::default(), Type::Int, source) {
///     render_error(source, &e);
/// }
/// ```
pub fn render_error(source: &str, error: &Error) {
    render_error_to_writer(source, error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
///
/// This is useful when you want to control where the error is written,
/// such as to a file, a buffer, or a custom output stream.
pub fn render_error_to(source: &str, error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(source, error, writer, true)
}

/// Render an error to a String (useful for logs and UIs)
pub fn render_error_to_string(source: &str, error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
pub fn render_error_to_string_no_color(source: &str, error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(source, error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    source: &str,
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    match error {
        Error::Parse(_) | Error::Resolve(_) => {
            render_diagnostic(source, &error.to_diagnostic(), writer, use_color)
        }
        Error::DuplicateDefinition { .. } => {
            let diag = error.to_diagnostic();
            writeln!(writer, "{}: {}", diag.severity, diag.message)
        }
    }
}

fn render_diagnostic(
    source: &str,
    diag: &Diagnostic,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let kind = match diag.severity {
        Severity::Error => ReportKind::Error,
        Severity::Warning => ReportKind::Warning,
    };

    let mut report = Report::build(kind, (SOURCE_ID, diag.span.range()))
        .with_message(&diag.message)
        .with_config(ariadne::Config::default().with_color(use_color));

    if let Some(code) = &diag.code {
        report = report.with_code(code);
    }

    report = report.with_label(
        Label::new((SOURCE_ID, diag.span.range()))
            .with_message(&diag.message)
            .with_color(colors.next()),
    );

    if let Some(help) = &diag.help {
        report = report.with_help(help);
    }

    report
        .finish()
        .write((SOURCE_ID, Source::from(source)), &mut *writer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasicFunctionContext, FrameTimer, ResolverOptions, Type, compile, stdlib};

    fn compile_err(ty: Type, source: &str) -> Error {
        let functions = stdlib::builtins(&FrameTimer::shared());
        let mut context = BasicFunctionContext::new();
        context.set_int("frame", 1);
        match compile(&functions, &context, ResolverOptions::default(), ty, source) {
            Ok(expr) => panic!("'{source}' compiled to {expr:?}"),
            Err(e) => e,
        }
    }

    #[test]
    fn test_render_parse_error() {
        let source = "1 + + * 2";
        let output = render_error_to_string_no_color(source, &compile_err(Type::Int, source));

        assert!(output.contains("Error"));
        assert!(output.contains("P001"));
        assert!(output.contains("1 + + * 2"));
    }

    #[test]
    fn test_render_resolve_error() {
        let source = "frame + nope(2)";
        let output = render_error_to_string_no_color(source, &compile_err(Type::Int, source));

        assert!(output.contains("no such function: nope"));
        assert!(output.contains("R001"));
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn test_render_includes_help() {
        let source = "smooth(frame, frame)";
        let output = render_error_to_string_no_color(source, &compile_err(Type::Float, source));

        assert!(output.contains("must be a constant"));
        assert!(output.contains("use a literal"));
    }

    #[test]
    fn test_render_duplicate_definition() {
        let error = Error::DuplicateDefinition {
            name: "fade".to_string(),
        };
        assert_eq!(
            render_error_to_string_no_color("", &error),
            "error: uniform 'fade' is already defined\n"
        );
    }
}
