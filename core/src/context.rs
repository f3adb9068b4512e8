//! Free-variable bindings supplied by the host.

use crate::expression::{Expression, HostValue};
use crate::types::Type;
use crate::values::{FunctionReturn, Object};
use hashbrown::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("variable hasn't been set: {name}")]
    UnboundVariable { name: String },
}

/// Resolves bare variable names to expressions.
///
/// The resolver captures the expression returned by
/// [`get_variable`](FunctionContext::get_variable) once, at resolution time;
/// whether later evaluations observe new values is up to that expression.
pub trait FunctionContext {
    /// The static type of `name`, or `None` if it is not bound.
    fn variable_type(&self, name: &str) -> Option<Type>;

    /// Fails with [`ContextError::UnboundVariable`] iff `has_variable(name)` is false.
    fn get_variable(&self, name: &str) -> Result<Arc<dyn Expression>, ContextError>;

    fn has_variable(&self, name: &str) -> bool {
        self.variable_type(name).is_some()
    }
}

/// A plain name to expression mapping.
#[derive(Debug, Default)]
pub struct BasicFunctionContext {
    variables: HashMap<String, (Type, Arc<dyn Expression>)>,
}

impl BasicFunctionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to an arbitrary expression producing values of `ty`.
    pub fn set_variable(
        &mut self,
        name: impl Into<String>,
        ty: Type,
        expression: Arc<dyn Expression>,
    ) -> &mut Self {
        self.variables.insert(name.into(), (ty, expression));
        self
    }

    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) -> &mut Self {
        let mut ret = FunctionReturn::default();
        ret.boolean_return = value;
        self.set_constant(name, Type::Boolean, &ret)
    }

    pub fn set_int(&mut self, name: impl Into<String>, value: i32) -> &mut Self {
        let mut ret = FunctionReturn::default();
        ret.int_return = value;
        self.set_constant(name, Type::Int, &ret)
    }

    pub fn set_float(&mut self, name: impl Into<String>, value: f32) -> &mut Self {
        let mut ret = FunctionReturn::default();
        ret.float_return = value;
        self.set_constant(name, Type::Float, &ret)
    }

    pub fn set_object(&mut self, name: impl Into<String>, value: Object) -> &mut Self {
        let ty = value.ty();
        let ret = FunctionReturn {
            object_return: Some(value),
            ..FunctionReturn::default()
        };
        self.set_constant(name, ty, &ret)
    }

    /// Binds `name` to a value the host keeps updating.
    pub fn set_host_value(&mut self, name: impl Into<String>, value: &Arc<HostValue>) -> &mut Self {
        let ty = value.ty();
        self.set_variable(name, ty, Arc::clone(value) as Arc<dyn Expression>)
    }

    fn set_constant(&mut self, name: impl Into<String>, ty: Type, ret: &FunctionReturn) -> &mut Self {
        self.set_variable(name, ty, Arc::from(ty.create_constant(ret)))
    }
}

impl FunctionContext for BasicFunctionContext {
    fn variable_type(&self, name: &str) -> Option<Type> {
        self.variables.get(name).map(|(ty, _)| *ty)
    }

    fn get_variable(&self, name: &str) -> Result<Arc<dyn Expression>, ContextError> {
        self.variables
            .get(name)
            .map(|(_, expression)| Arc::clone(expression))
            .ok_or_else(|| ContextError::UnboundVariable {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_variable_fails() {
        let context = BasicFunctionContext::new();
        assert!(!context.has_variable("x"));
        assert_eq!(
            context.get_variable("x").unwrap_err(),
            ContextError::UnboundVariable {
                name: "x".to_string()
            }
        );
    }

    #[test]
    fn test_bound_variable_writes_captured_value() {
        let mut context = BasicFunctionContext::new();
        context.set_int("frame", 12).set_float("time", 0.5);

        assert!(context.has_variable("frame"));
        assert_eq!(context.variable_type("time"), Some(Type::Float));

        let mut ret = FunctionReturn::default();
        let frame = context.get_variable("frame").unwrap();
        frame.evaluate_to(&context, &mut ret);
        assert_eq!(ret.int_return, 12);

        // Rebinding replaces the expression but not ones already handed out.
        context.set_int("frame", 13);
        frame.evaluate_to(&context, &mut ret);
        assert_eq!(ret.int_return, 12);
    }

    #[test]
    fn test_object_variable_type_follows_value() {
        let mut context = BasicFunctionContext::new();
        context.set_object("sunPosition", Object::Vec3([0.0, 1.0, 0.0]));
        assert_eq!(context.variable_type("sunPosition"), Some(Type::Vec3));
    }
}
