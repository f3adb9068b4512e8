use super::*;
use crate::api::ResolverOptions;
use crate::context::BasicFunctionContext;
use crate::expression::Expression;
use crate::functions::{F2FFunction, FrameTimer, I2FFunction, V2IFunction};
use crate::parser::{self, Span};
use crate::resolver::FunctionResolver;
use crate::stdlib;
use crate::test_utils::init_test_logging;
use crate::types::Type;
use crate::values::{FunctionReturn, Object};
use bumpalo::Bump;
use pretty_assertions::assert_eq;

fn context() -> BasicFunctionContext {
    let mut context = BasicFunctionContext::new();
    context
        .set_int("frame", 3)
        .set_float("time", 1.5)
        .set_bool("flag", true);
    context
}

// Helper to parse and resolve a source string
fn resolve_with(
    functions: &FunctionResolver,
    options: ResolverOptions,
    ty: Type,
    source: &str,
) -> Result<Box<dyn Expression>, ResolveError> {
    let arena = Bump::new();
    let parsed = parser::parse(&arena, source)
        .unwrap_or_else(|e| panic!("failed to parse '{source}': {e}"));
    let context = context();
    ExpressionResolver::new(functions, &context, options).resolve_expression(ty, parsed.expr)
}

fn resolve(ty: Type, source: &str) -> Result<Box<dyn Expression>, ResolveError> {
    let functions = stdlib::builtins(&FrameTimer::shared());
    resolve_with(&functions, ResolverOptions::default(), ty, source)
}

fn eval(ty: Type, source: &str) -> FunctionReturn {
    let expr = resolve(ty, source).unwrap_or_else(|e| panic!("failed to resolve '{source}': {e}"));
    let mut ret = FunctionReturn::default();
    expr.evaluate_to(&context(), &mut ret);
    ret
}

fn resolve_err(ty: Type, source: &str) -> ResolveError {
    match resolve(ty, source) {
        Ok(expr) => panic!("'{source}' resolved to {expr:?}"),
        Err(e) => e,
    }
}

fn no_folding() -> ResolverOptions {
    ResolverOptions {
        constant_folding: false,
        ..ResolverOptions::default()
    }
}

// ============================================================================
// Operators and literals
// ============================================================================

#[test]
fn test_integer_arithmetic() {
    assert_eq!(eval(Type::Int, "7 / 2").int_return, 3);
    assert_eq!(eval(Type::Int, "7 % 3").int_return, 1);
    assert_eq!(eval(Type::Int, "1 + 2 * 3").int_return, 7);
    assert_eq!(eval(Type::Int, "-frame").int_return, -3);
}

#[test]
fn test_integer_division_by_zero_is_zero() {
    assert_eq!(eval(Type::Int, "frame / 0").int_return, 0);
    assert_eq!(eval(Type::Int, "frame % 0").int_return, 0);
}

#[test]
fn test_float_arithmetic() {
    assert_eq!(eval(Type::Float, "7.0 / 2.0").float_return, 3.5);
    assert_eq!(eval(Type::Float, "time * 2.0").float_return, 3.0);
}

#[test]
fn test_comparison_and_logic() {
    assert!(eval(Type::Boolean, "frame > 2 && time < 2.0").boolean_return);
    assert!(!eval(Type::Boolean, "!flag || frame == 4").boolean_return);
    assert!(eval(Type::Boolean, "flag == true").boolean_return);
}

// ============================================================================
// Implicit conversions
// ============================================================================

#[test]
fn test_int_variable_in_float_slot() {
    assert_eq!(eval(Type::Float, "frame + 0.5").float_return, 3.5);
    // Float overloads are preferred, so this is not integer division.
    assert_eq!(eval(Type::Float, "frame / 2").float_return, 1.5);

    let expr = resolve(Type::Float, "frame").unwrap();
    assert_eq!(format!("{expr:?}"), "float(Variable(frame))");
}

#[test]
fn test_int_literal_in_float_slot_is_a_float_constant() {
    let expr = resolve(Type::Float, "2").unwrap();
    assert_eq!(format!("{expr:?}"), "Float(2.0)");
}

#[test]
fn test_int_only_function_converted_to_float() {
    let mut builder = FunctionResolver::builder();
    builder
        .add("float", I2FFunction::new(|value| value as f32))
        .add("count", V2IFunction::new(|| 4).impure());
    let functions = builder.build();

    let expr = resolve_with(&functions, ResolverOptions::default(), Type::Float, "count()").unwrap();
    assert_eq!(format!("{expr:?}"), "float(count)");
    let mut ret = FunctionReturn::default();
    expr.evaluate_to(&context(), &mut ret);
    assert_eq!(ret.float_return, 4.0);
}

#[test]
fn test_no_conversion_without_float_function() {
    let mut builder = FunctionResolver::builder();
    builder.add("count", V2IFunction::new(|| 4));
    let functions = builder.build();

    let err = resolve_with(&functions, ResolverOptions::default(), Type::Float, "frame").unwrap_err();
    assert_eq!(
        err.kind,
        ResolveErrorKind::TypeMismatch {
            expected: Type::Float,
            found: Type::Int
        }
    );
}

// ============================================================================
// Overload selection
// ============================================================================

#[test]
fn test_fewest_conversions_wins() {
    let mut builder = FunctionResolver::builder();
    builder
        .add("f", F2FFunction::new(|_| 1.0))
        .add("f", I2FFunction::new(|_| 2.0));
    let functions = builder.build();

    let options = ResolverOptions::default();
    let eval = |source: &str| {
        let expr = resolve_with(&functions, options, Type::Float, source).unwrap();
        let mut ret = FunctionReturn::default();
        expr.evaluate_to(&context(), &mut ret);
        ret.float_return
    };
    assert_eq!(eval("f(1)"), 2.0);
    assert_eq!(eval("f(1.5)"), 1.0);
    assert_eq!(eval("f(time)"), 1.0);
    assert_eq!(eval("f(frame)"), 2.0);
}

#[test]
fn test_priority_then_registration_order() {
    let mut builder = FunctionResolver::builder();
    builder
        .add("first", F2FFunction::new(|_| 1.0))
        .add("first", F2FFunction::new(|_| 2.0))
        .add("boosted", F2FFunction::new(|_| 1.0))
        .add("boosted", F2FFunction::new(|_| 2.0).with_priority(1));
    let functions = builder.build();

    for (source, expected) in [("first(0.0)", 1.0), ("boosted(0.0)", 2.0)] {
        let expr = resolve_with(&functions, ResolverOptions::default(), Type::Float, source).unwrap();
        let mut ret = FunctionReturn::default();
        expr.evaluate_to(&context(), &mut ret);
        assert_eq!(ret.float_return, expected, "{source}");
    }
}

#[test]
fn test_bare_function_name_is_a_call() {
    let ret = eval(Type::Float, "pi * 2.0");
    assert!((ret.float_return - core::f32::consts::TAU).abs() < 1e-6);
}

// ============================================================================
// Constant folding
// ============================================================================

#[test]
fn test_pure_constant_calls_are_folded() {
    let expr = resolve(Type::Int, "1 + 2 * 3").unwrap();
    assert_eq!(format!("{expr:?}"), "Int(7)");

    let expr = resolve(Type::Float, "min(1.0, 2.0) + 1").unwrap();
    assert_eq!(format!("{expr:?}"), "Float(2.0)");
}

#[test]
fn test_folding_can_be_disabled() {
    let functions = stdlib::builtins(&FrameTimer::shared());
    let expr = resolve_with(&functions, no_folding(), Type::Int, "1 + 2 * 3").unwrap();
    assert_eq!(format!("{expr:?}"), "+(Int(1), *(Int(2), Int(3)))");

    let mut ret = FunctionReturn::default();
    expr.evaluate_to(&context(), &mut ret);
    assert_eq!(ret.int_return, 7);
}

#[test]
fn test_variables_are_not_folded() {
    let expr = resolve(Type::Int, "frame + 1").unwrap();
    assert_eq!(format!("{expr:?}"), "+(Variable(frame), Int(1))");
}

#[test]
fn test_impure_calls_are_not_folded() {
    let expr = resolve(Type::Float, "smooth(1.0)").unwrap();
    assert!(format!("{expr:?}").starts_with("smooth("));
}

// ============================================================================
// Conditionals
// ============================================================================

#[test]
fn test_if_block() {
    let expr = resolve(Type::Int, "if(true) { 1 } else { 2 }").unwrap();
    assert_eq!(format!("{expr:?}"), "Int(1)");

    assert_eq!(
        eval(Type::Float, "if(frame % 2 == 0) { 1.0 } else { 0.0 }").float_return,
        0.0
    );
    assert_eq!(
        eval(
            Type::Int,
            "if (frame == 1) { 10 } else if (frame == 3) { 30 } else { 0 }"
        )
        .int_return,
        30
    );
}

#[test]
fn test_if_call_form_for_vectors() {
    let ret = eval(Type::Vec2, "if(flag, vec2(1, 2), vec2(0.0, 0.0)) * 2.0");
    assert_eq!(ret.object_return, Some(Object::Vec2([2.0, 4.0])));
}

// ============================================================================
// Constant parameters
// ============================================================================

#[test]
fn test_constant_parameter_accepts_constant_expressions() {
    assert!(resolve(Type::Float, "smooth(time, 0.5)").is_ok());
    assert!(resolve(Type::Float, "smooth(time, 1 + 1, 2.0 * 0.5)").is_ok());

    let functions = stdlib::builtins(&FrameTimer::shared());
    assert!(resolve_with(&functions, no_folding(), Type::Float, "smooth(time, 0.5 * 2.0)").is_ok());
}

#[test]
fn test_constant_parameter_rejects_variables() {
    let err = resolve_err(Type::Float, "smooth(time, time)");
    assert_eq!(
        err,
        ResolveError::new(
            ResolveErrorKind::NotConstant {
                name: "smooth".to_string(),
                index: 1
            },
            Span::new(13, 17)
        )
    );
    assert_eq!(err.to_string(), "argument 2 of 'smooth' must be a constant");
}

// ============================================================================
// Vectors
// ============================================================================

#[test]
fn test_vector_functions() {
    assert_eq!(
        eval(Type::Float, "length(vec3(3.0, 0.0, 4.0))").float_return,
        5.0
    );
    assert_eq!(
        eval(Type::Vec3, "vec3(vec2(1, 2), time)").object_return,
        Some(Object::Vec3([1.0, 2.0, 1.5]))
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_function_is_fatal() {
    let err = resolve_err(Type::Int, "1 + nope(2)");
    assert_eq!(
        err,
        ResolveError::new(
            ResolveErrorKind::UnknownFunction {
                name: "nope".to_string()
            },
            Span::new(4, 11)
        )
    );
    assert!(err.is_fatal());
}

#[test]
fn test_unbound_variable() {
    let err = resolve_err(Type::Int, "missing + 1");
    assert_eq!(
        err,
        ResolveError::new(
            ResolveErrorKind::UnboundVariable {
                name: "missing".to_string()
            },
            Span::new(0, 7)
        )
    );
    assert_eq!(err.to_diagnostic().code.as_deref(), Some("R003"));
}

#[test]
fn test_type_mismatch() {
    assert_eq!(
        resolve_err(Type::Float, "flag").kind,
        ResolveErrorKind::TypeMismatch {
            expected: Type::Float,
            found: Type::Boolean
        }
    );
    assert_eq!(
        resolve_err(Type::Int, "1.5").kind,
        ResolveErrorKind::TypeMismatch {
            expected: Type::Int,
            found: Type::Float
        }
    );
}

#[test]
fn test_single_rejected_overload_reports_its_error() {
    let err = resolve_err(Type::Int, "1 + true");
    assert_eq!(
        err,
        ResolveError::new(
            ResolveErrorKind::TypeMismatch {
                expected: Type::Int,
                found: Type::Boolean
            },
            Span::new(4, 8)
        )
    );
}

#[test]
fn test_no_matching_overload() {
    let err = resolve_err(Type::Float, "sin(1.0, 2.0, 3.0)");
    assert_eq!(
        err.kind,
        ResolveErrorKind::NoMatchingOverload {
            name: "sin".to_string(),
            return_type: Type::Float,
            arity: 3
        }
    );
    assert_eq!(err.span, Span::new(0, 18));

    assert!(matches!(
        resolve_err(Type::Float, "time + flag").kind,
        ResolveErrorKind::NoMatchingOverload { .. }
    ));
}

#[test]
fn test_max_depth() {
    let functions = stdlib::builtins(&FrameTimer::shared());
    let options = ResolverOptions {
        max_depth: 3,
        ..ResolverOptions::default()
    };
    let err = resolve_with(&functions, options, Type::Int, "1 + (2 + (3 + 4))").unwrap_err();
    assert_eq!(err.kind, ResolveErrorKind::MaxDepthExceeded { max_depth: 3 });
    assert!(err.is_fatal());

    assert!(resolve_with(&functions, options, Type::Int, "1 + 2").is_ok());
}

#[test]
fn test_long_overloaded_chain_resolves() {
    init_test_logging();
    // Every `+` has an int and a float overload.
    let source = vec!["frame"; 40].join(" + ");
    assert_eq!(eval(Type::Float, &source).float_return, 120.0);
}
