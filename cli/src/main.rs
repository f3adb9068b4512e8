use bumpalo::Bump;
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use stareval::{
    BasicFunctionContext, Error, FrameTimer, FunctionResolver, FunctionReturn, Object,
    ResolverOptions, Type, render_error, stdlib,
};
use stareval_core::{analyzer::ExpressionResolver, parser};
use std::io::{BufRead, BufReader};
use std::sync::Arc;

/// Stareval - typed expressions for shader-pack custom uniforms
#[derive(Parser, Debug)]
#[command(name = "stareval")]
#[command(about = "Evaluate custom uniform expressions", long_about = None)]
struct Args {
    /// Print the parsed token tree (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Print the resolved expression tree (for debugging)
    #[arg(long)]
    debug_resolve: bool,

    /// Print every built-in overload and exit
    #[arg(long)]
    list_functions: bool,

    /// Declared result type of the expression
    #[arg(long = "type", value_parser = parse_type, default_value = "float")]
    ty: Type,

    /// Bind a constant variable, e.g. `frame:int=3` or `up:vec3=0,1,0`
    #[arg(long = "var", value_parser = parse_var)]
    vars: Vec<Variable>,

    /// Expression to evaluate (if not provided, reads lines from stdin)
    expression: Option<String>,
}

#[derive(Debug, Clone)]
struct Variable {
    name: String,
    ty: Type,
    value: FunctionReturn,
}

fn parse_type(text: &str) -> std::result::Result<Type, String> {
    match Type::from_name(text) {
        Some(Type::Object) | None => Err(format!(
            "unknown type '{text}' (expected bool, int, float, vec2, vec3, vec4 or mat4)"
        )),
        Some(ty) => Ok(ty),
    }
}

fn parse_var(text: &str) -> std::result::Result<Variable, String> {
    let (declaration, value) = text
        .split_once('=')
        .ok_or_else(|| format!("expected name:type=value, got '{text}'"))?;
    let (name, ty) = declaration
        .split_once(':')
        .ok_or_else(|| format!("expected name:type=value, got '{text}'"))?;
    let ty = parse_type(ty.trim())?;
    let value = value.trim();

    let mut ret = FunctionReturn::default();
    let invalid = || format!("invalid {ty} value '{value}'");
    match ty {
        Type::Boolean => ret.boolean_return = value.parse().map_err(|_| invalid())?,
        Type::Int => ret.int_return = value.parse().map_err(|_| invalid())?,
        Type::Float => ret.float_return = value.parse().map_err(|_| invalid())?,
        Type::Vec2 | Type::Vec3 | Type::Vec4 | Type::Mat4 | Type::Object => {
            let components = value
                .split(',')
                .map(|component| component.trim().parse::<f32>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| invalid())?;
            let object = match (ty, components.as_slice()) {
                (Type::Vec2, &[x, y]) => Object::Vec2([x, y]),
                (Type::Vec3, &[x, y, z]) => Object::Vec3([x, y, z]),
                (Type::Vec4, &[x, y, z, w]) => Object::Vec4([x, y, z, w]),
                (Type::Mat4, values) if values.len() == 16 => {
                    let mut matrix = [0.0; 16];
                    matrix.copy_from_slice(values);
                    Object::Mat4(matrix)
                }
                _ => return Err(invalid()),
            };
            ret.object_return = Some(object);
        }
    }

    Ok(Variable {
        name: name.trim().to_string(),
        ty,
        value: ret,
    })
}

fn format_value(ty: Type, ret: &FunctionReturn) -> String {
    match ty {
        Type::Boolean => ret.boolean_return.to_string(),
        Type::Int => ret.int_return.to_string(),
        Type::Float => format!("{:?}", ret.float_return),
        Type::Vec2 | Type::Vec3 | Type::Vec4 | Type::Mat4 | Type::Object => {
            match &ret.object_return {
                Some(object) => format!("{object:?}"),
                None => "null".to_string(),
            }
        }
    }
}

fn interpret_input(
    functions: &FunctionResolver,
    context: &BasicFunctionContext,
    args: &Args,
    input: &str,
) {
    let arena = Bump::new();
    // Parse
    let parsed = match parser::parse(&arena, input) {
        Ok(parsed) => parsed,
        Err(e) => {
            render_error(input, &Error::from(e));
            return;
        }
    };

    if args.debug_parse {
        println!("=== Token Tree ===");
        println!("{:#?}", parsed.expr);
        println!();
    }

    // Resolve
    let mut resolver = ExpressionResolver::new(functions, context, ResolverOptions::default());
    let expression = match resolver.resolve_expression(args.ty, parsed.expr) {
        Ok(expression) => expression,
        Err(e) => {
            render_error(input, &Error::from(e));
            return;
        }
    };

    if args.debug_resolve {
        println!("=== Resolved Expression ===");
        println!("{expression:#?}");
        println!();
    }

    // Evaluate
    let mut ret = FunctionReturn::default();
    expression.evaluate_to(context, &mut ret);
    println!("{}", format_value(args.ty, &ret));
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .into_diagnostic()?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let functions = stdlib::builtins(&FrameTimer::shared());
    if args.list_functions {
        for signature in functions.signatures() {
            println!("{signature}");
        }
        return Ok(());
    }

    let mut context = BasicFunctionContext::new();
    for variable in &args.vars {
        let value = variable.ty.create_constant(&variable.value);
        context.set_variable(variable.name.as_str(), variable.ty, Arc::from(value));
    }
    tracing::debug!(variables = args.vars.len(), ty = %args.ty, "starting");

    // Check if we have a direct expression argument
    if let Some(expr) = &args.expression {
        interpret_input(&functions, &context, &args, expr);
        return Ok(());
    }

    // Otherwise evaluate stdin line by line
    let stdin = std::io::stdin();
    let reader = BufReader::new(stdin.lock());
    for line in reader.lines() {
        let line = line.into_diagnostic()?;
        if line.trim().is_empty() {
            continue;
        }
        interpret_input(&functions, &context, &args, &line);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_scalar_vars() {
        let var = parse_var("frame:int=3").unwrap();
        assert_eq!((var.name.as_str(), var.ty, var.value.int_return), ("frame", Type::Int, 3));

        let var = parse_var("wet : bool = true").unwrap();
        assert_eq!((var.name.as_str(), var.ty), ("wet", Type::Boolean));
        assert!(var.value.boolean_return);
    }

    #[test]
    fn test_parse_vector_vars() {
        let var = parse_var("up:vec3=0, 1, 0").unwrap();
        assert_eq!(var.value.object_return, Some(Object::Vec3([0.0, 1.0, 0.0])));
        assert!(parse_var("up:vec3=0,1").is_err());
    }

    #[test]
    fn test_parse_var_errors() {
        assert!(parse_var("frame=3").is_err());
        assert!(parse_var("frame:int").is_err());
        assert!(parse_var("frame:double=3").is_err());
        assert!(parse_var("frame:int=three").is_err());
        assert!(parse_var("thing:object=1").is_err());
    }

    #[test]
    fn test_format_value() {
        let mut ret = FunctionReturn::default();
        ret.float_return = 3.0;
        ret.object_return = Some(Object::Vec2([1.0, 2.5]));
        assert_eq!(format_value(Type::Float, &ret), "3.0");
        assert_eq!(format_value(Type::Vec2, &ret), "vec2[1.0, 2.5]");
        assert_eq!(format_value(Type::Boolean, &ret), "false");
    }
}
