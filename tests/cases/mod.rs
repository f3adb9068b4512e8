#![allow(dead_code)]

use stareval::{
    BasicFunctionContext, ConstantExpression, Error, FrameTimer, FunctionResolver,
    FunctionReturn, Object, ResolverOptions, Type, compile, stdlib,
};
use once_cell::sync::Lazy;

pub const IDENTITY: [f32; 16] = [
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
];

/// The variables a renderer typically exposes.
pub fn host_context() -> BasicFunctionContext {
    let mut context = BasicFunctionContext::new();
    context
        .set_int("frameCounter", 10)
        .set_int("worldTime", 6000)
        .set_float("rainStrength", 0.25)
        .set_float("frameTimeCounter", 2.5)
        .set_bool("isDay", true)
        .set_object("sunPosition", Object::Vec3([0.0, 100.0, 0.0]))
        .set_object("viewSize", Object::Vec2([1920.0, 1080.0]))
        .set_object("skyColor", Object::Vec4([0.5, 0.5, 1.0, 1.0]))
        .set_object("gbufferModelView", Object::Mat4(IDENTITY));
    context
}

/// The stateless part of the catalog is shared; tests that need their own
/// `smooth` clock build a fresh one with [`functions`].
pub static BUILTINS: Lazy<FunctionResolver> = Lazy::new(functions);

pub fn functions() -> FunctionResolver {
    stdlib::builtins(&FrameTimer::shared())
}

/// Compiles `source` against the builtins and [`host_context`] and
/// evaluates it once.
pub fn eval(ty: Type, source: &str) -> Result<ConstantExpression, Error> {
    eval_with(&BUILTINS, ty, source)
}

pub fn eval_with(
    functions: &FunctionResolver,
    ty: Type,
    source: &str,
) -> Result<ConstantExpression, Error> {
    let context = host_context();
    let expr = compile(functions, &context, ResolverOptions::default(), ty, source)?;
    let mut ret = FunctionReturn::default();
    expr.evaluate_to(&context, &mut ret);
    Ok(ConstantExpression::from_return(ty, &ret))
}

/// The diagnostic code of a compile failure.
pub fn error_code(ty: Type, source: &str) -> String {
    match eval(ty, source) {
        Ok(value) => panic!("expected `{source}` to fail, got {value:?}"),
        Err(err) => err.to_diagnostic().code.unwrap_or_default(),
    }
}

#[macro_export]
macro_rules! test_case {
    (
        name: $name:ident,
        input: $input:expr,
        ty: $ty:ident,
        value: $value:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let value = $crate::cases::eval(stareval::Type::$ty, $input)
                .unwrap_or_else(|err| panic!("`{}` failed: {}", $input, err));
            pretty_assertions::assert_eq!(value, $value);
        }
    };
    (
        name: $name:ident,
        input: $input:expr,
        ty: $ty:ident,
        error: $code:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            pretty_assertions::assert_eq!(
                $crate::cases::error_code(stareval::Type::$ty, $input),
                $code
            );
        }
    };
}
