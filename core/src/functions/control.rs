use super::TypedFunction;
use crate::context::FunctionContext;
use crate::expression::Expression;
use crate::types::{Parameter, Type};
use crate::values::FunctionReturn;

/// `if(c1, v1, c2, v2, ..., otherwise)`.
///
/// Conditions are evaluated in order until one holds, and only the branch it
/// selects is evaluated.
#[derive(Debug, Clone)]
pub struct If {
    return_type: Type,
    parameters: Box<[Parameter]>,
}

impl If {
    /// An overload with `conditions` condition/value pairs plus the fallback.
    pub fn new(return_type: Type, conditions: usize) -> Self {
        let mut parameters = Vec::with_capacity(conditions * 2 + 1);
        for _ in 0..conditions {
            parameters.push(Parameter::new(Type::Boolean));
            parameters.push(Parameter::new(return_type));
        }
        parameters.push(Parameter::new(return_type));
        Self {
            return_type,
            parameters: parameters.into_boxed_slice(),
        }
    }
}

impl TypedFunction for If {
    fn return_type(&self) -> Type {
        self.return_type
    }

    fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    fn evaluate_to(
        &self,
        params: &[Box<dyn Expression>],
        context: &dyn FunctionContext,
        ret: &mut FunctionReturn,
    ) {
        let Some((otherwise, branches)) = params.split_last() else {
            return;
        };
        for branch in branches.chunks_exact(2) {
            branch[0].evaluate_to(context, ret);
            if ret.boolean_return {
                branch[1].evaluate_to(context, ret);
                return;
            }
        }
        otherwise.evaluate_to(context, ret);
    }
}
