use crate::analyzer::error::{ResolveError, ResolveErrorKind};
use crate::api::ResolverOptions;
use crate::context::{ContextError, FunctionContext};
use crate::expression::{Expression, FunctionCall, VariableExpression};
use crate::functions::TypedFunction;
use crate::parser::{Expr, ExprKind, Literal, Span};
use crate::resolver::{FunctionResolver, UnknownFunction};
use crate::types::{Parameter, Type};
use crate::values::FunctionReturn;
use hashbrown::HashMap;
use smallvec::SmallVec;
use std::sync::Arc;

/// Conversions the resolver may insert on its own, as
/// `(from, to, function name)`. The named function must have a
/// `to name(from)` overload for the conversion to be available.
pub const IMPLICIT_CONVERSIONS: &[(Type, Type, &str)] = &[(Type::Int, Type::Float, "float")];

/// Binds token trees to concrete overloads and variables.
///
/// Resolution runs in two passes over the tree. Planning decides, for every
/// node and requested type, which overload wins and whether the node is a
/// constant; results are memoised so trying many overloads stays linear in
/// the tree size. Construction then follows the plan, capturing variables,
/// materialising dynamic overloads and folding constant calls.
pub struct ExpressionResolver<'r> {
    functions: &'r FunctionResolver,
    context: &'r dyn FunctionContext,
    options: ResolverOptions,
    plans: HashMap<(usize, Type), Result<Plan, ResolveError>>,
    depth: usize,
}

#[derive(Debug, Clone, Copy)]
struct Plan {
    /// Implicit conversions inserted anywhere below and at this node.
    conversions: u32,
    /// The node evaluates to the same value every time.
    constant: bool,
    /// Type the node itself produces; differs from the requested type when a
    /// conversion wraps it.
    produces: Type,
    step: Step,
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Literal,
    Variable,
    /// Position in `FunctionResolver::resolve(name, produces)`.
    Call { overload: usize },
}

struct Built {
    expression: Box<dyn Expression>,
    constant: bool,
}

type Rejections = SmallVec<[ResolveError; 4]>;

impl<'r> ExpressionResolver<'r> {
    pub fn new(
        functions: &'r FunctionResolver,
        context: &'r dyn FunctionContext,
        options: ResolverOptions,
    ) -> Self {
        Self {
            functions,
            context,
            options,
            plans: HashMap::new(),
            depth: 0,
        }
    }

    /// Resolves `expr` so that it produces a value of `expected`.
    pub fn resolve_expression(
        &mut self,
        expected: Type,
        expr: &Expr<'_>,
    ) -> Result<Box<dyn Expression>, ResolveError> {
        self.plans.clear();
        self.depth = 0;
        let result = self.plan(expected, expr).and_then(|_| self.build(expected, expr));
        self.plans.clear();
        let built = result?;
        tracing::debug!(%expected, constant = built.constant, expression = ?built.expression, "resolved expression");
        Ok(built.expression)
    }

    // ========================================================================
    // Planning
    // ========================================================================

    fn plan(&mut self, expected: Type, expr: &Expr<'_>) -> Result<Plan, ResolveError> {
        let key = (expr as *const Expr<'_> as usize, expected);
        if let Some(plan) = self.plans.get(&key) {
            return plan.clone();
        }

        if self.depth >= self.options.max_depth {
            return Err(ResolveError::new(
                ResolveErrorKind::MaxDepthExceeded {
                    max_depth: self.options.max_depth,
                },
                expr.span,
            ));
        }
        self.depth += 1;
        let plan = match &expr.kind {
            ExprKind::Literal(literal) => plan_literal(expected, *literal, expr.span),
            ExprKind::Ident(name) => self.plan_ident(expected, name, expr.span),
            ExprKind::Call { name, args } => self.plan_call(expected, name, args, expr.span),
        };
        self.depth -= 1;

        self.plans.insert(key, plan.clone());
        plan
    }

    fn plan_ident(&mut self, expected: Type, name: &str, span: Span) -> Result<Plan, ResolveError> {
        let Some(found) = self.context.variable_type(name) else {
            // A bare function name is a call without arguments.
            if self.functions.contains(name) {
                return self.plan_call(expected, name, &[], span);
            }
            return Err(ResolveError::new(
                ResolveErrorKind::UnboundVariable {
                    name: name.to_string(),
                },
                span,
            ));
        };

        let plan = Plan {
            conversions: 0,
            constant: false,
            produces: found,
            step: Step::Variable,
        };
        if found == expected {
            return Ok(plan);
        }
        match self.conversion(found, expected) {
            Some((_, conversion)) => Ok(Plan {
                conversions: 1,
                constant: plan.constant && conversion.is_pure(),
                ..plan
            }),
            None => Err(ResolveError::new(
                ResolveErrorKind::TypeMismatch { expected, found },
                span,
            )),
        }
    }

    fn plan_call(
        &mut self,
        expected: Type,
        name: &str,
        args: &[&Expr<'_>],
        span: Span,
    ) -> Result<Plan, ResolveError> {
        let mut rejected = Rejections::new();
        if let Some(plan) = self.plan_overloads(expected, name, args, span, &mut rejected)? {
            return Ok(plan);
        }

        // Nothing returns `expected` directly: try overloads whose result can
        // be converted to it.
        for &(from, to, _) in IMPLICIT_CONVERSIONS {
            if to != expected {
                continue;
            }
            let Some((_, conversion)) = self.conversion(from, to) else {
                continue;
            };
            if let Some(plan) = self.plan_overloads(from, name, args, span, &mut rejected)? {
                return Ok(Plan {
                    conversions: plan.conversions + 1,
                    constant: plan.constant && conversion.is_pure(),
                    ..plan
                });
            }
        }

        // A lone rejected candidate explains the failure better than a
        // generic message.
        if rejected.len() == 1 {
            if let Some(err) = rejected.pop() {
                return Err(err);
            }
        }
        Err(ResolveError::new(
            ResolveErrorKind::NoMatchingOverload {
                name: name.to_string(),
                return_type: expected,
                arity: args.len(),
            },
            span,
        ))
    }

    /// Picks the best overload of `name` returning `return_type`: fewest
    /// conversions, then highest priority, then earliest registration.
    fn plan_overloads(
        &mut self,
        return_type: Type,
        name: &str,
        args: &[&Expr<'_>],
        span: Span,
        rejected: &mut Rejections,
    ) -> Result<Option<Plan>, ResolveError> {
        let overloads = self
            .functions
            .resolve(name, return_type)
            .map_err(|err| unknown_function(err, span))?;

        let mut best: Option<(Plan, i32)> = None;
        for (overload, function) in overloads.iter().enumerate() {
            if function.parameters().len() != args.len() {
                continue;
            }
            match self.plan_arguments(name, function.parameters(), args) {
                Ok((conversions, constant)) => {
                    let plan = Plan {
                        conversions,
                        constant: constant && function.is_pure(),
                        produces: return_type,
                        step: Step::Call { overload },
                    };
                    let priority = function.priority();
                    let better = match &best {
                        None => true,
                        Some((current, current_priority)) => {
                            conversions < current.conversions
                                || (conversions == current.conversions
                                    && priority > *current_priority)
                        }
                    };
                    if better {
                        best = Some((plan, priority));
                    }
                }
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    tracing::trace!(name, %return_type, overload, error = %err, "rejected overload");
                    rejected.push(err);
                }
            }
        }
        Ok(best.map(|(plan, _)| plan))
    }

    fn plan_arguments(
        &mut self,
        name: &str,
        parameters: &[Parameter],
        args: &[&Expr<'_>],
    ) -> Result<(u32, bool), ResolveError> {
        let mut conversions = 0;
        let mut constant = true;
        for (index, (parameter, arg)) in parameters.iter().zip(args).enumerate() {
            let plan = self.plan(parameter.ty, arg)?;
            if parameter.constant && !plan.constant {
                return Err(ResolveError::new(
                    ResolveErrorKind::NotConstant {
                        name: name.to_string(),
                        index,
                    },
                    arg.span,
                ));
            }
            conversions += plan.conversions;
            constant &= plan.constant;
        }
        Ok((conversions, constant))
    }

    /// The overload implementing the implicit conversion `from -> to`, if any.
    fn conversion(&self, from: Type, to: Type) -> Option<(&'static str, Arc<dyn TypedFunction>)> {
        let &(_, _, name) = IMPLICIT_CONVERSIONS
            .iter()
            .find(|(source, target, _)| *source == from && *target == to)?;
        let function = self
            .functions
            .resolve(name, to)
            .ok()?
            .into_iter()
            .find(|function| function.parameters() == [Parameter::new(from)])?;
        Some((name, function))
    }

    // ========================================================================
    // Construction
    // ========================================================================

    fn build(&mut self, expected: Type, expr: &Expr<'_>) -> Result<Built, ResolveError> {
        let plan = self.plan(expected, expr)?;

        let built = match (plan.step, &expr.kind) {
            (Step::Literal, ExprKind::Literal(literal)) => Built {
                expression: literal_constant(expected, *literal),
                constant: true,
            },
            (Step::Variable, ExprKind::Ident(name)) => self.capture_variable(name, expr.span)?,
            (Step::Call { overload }, ExprKind::Call { name, args }) => {
                self.build_call(plan.produces, name, overload, args, expr.span)?
            }
            (Step::Call { overload }, ExprKind::Ident(name)) => {
                self.build_call(plan.produces, name, overload, &[], expr.span)?
            }
            (step, kind) => unreachable!("plan {step:?} does not apply to {kind:?}"),
        };

        if plan.produces == expected {
            return Ok(built);
        }
        let Some((name, conversion)) = self.conversion(plan.produces, expected) else {
            return Err(ResolveError::new(
                ResolveErrorKind::TypeMismatch {
                    expected,
                    found: plan.produces,
                },
                expr.span,
            ));
        };
        Ok(self.finish_call(name, conversion, vec![built.expression], built.constant))
    }

    fn capture_variable(&self, name: &str, span: Span) -> Result<Built, ResolveError> {
        let value = self.context.get_variable(name).map_err(|err| match err {
            ContextError::UnboundVariable { name } => {
                ResolveError::new(ResolveErrorKind::UnboundVariable { name }, span)
            }
        })?;
        Ok(Built {
            expression: Box::new(VariableExpression::new(name, value)),
            constant: false,
        })
    }

    fn build_call(
        &mut self,
        return_type: Type,
        name: &str,
        overload: usize,
        args: &[&Expr<'_>],
        span: Span,
    ) -> Result<Built, ResolveError> {
        // Resolving again materialises fresh instances of dynamic overloads.
        let function = self
            .functions
            .resolve(name, return_type)
            .map_err(|err| unknown_function(err, span))?
            .into_iter()
            .nth(overload)
            .ok_or_else(|| {
                ResolveError::new(
                    ResolveErrorKind::NoMatchingOverload {
                        name: name.to_string(),
                        return_type,
                        arity: args.len(),
                    },
                    span,
                )
            })?;
        tracing::debug!(
            name,
            %return_type,
            overload,
            priority = function.priority(),
            pure = function.is_pure(),
            "selected overload"
        );

        let mut arguments = Vec::with_capacity(args.len());
        let mut constant = true;
        for (parameter, arg) in function.parameters().iter().zip(args) {
            let built = self.build(parameter.ty, arg)?;
            constant &= built.constant;
            arguments.push(built.expression);
        }
        Ok(self.finish_call(name, function, arguments, constant))
    }

    /// Wraps a call, folding it into a constant when it is pure and every
    /// argument is constant.
    fn finish_call(
        &self,
        name: &str,
        function: Arc<dyn TypedFunction>,
        arguments: Vec<Box<dyn Expression>>,
        arguments_constant: bool,
    ) -> Built {
        let constant = arguments_constant && function.is_pure();
        let return_type = function.return_type();
        let call = FunctionCall::new(name, function, arguments);
        if !(constant && self.options.constant_folding) {
            return Built {
                expression: Box::new(call),
                constant,
            };
        }

        let mut ret = FunctionReturn::default();
        call.evaluate_to(self.context, &mut ret);
        let folded = return_type.create_constant(&ret);
        tracing::debug!(call = ?call, folded = ?folded, "folded constant call");
        Built {
            expression: folded,
            constant: true,
        }
    }
}

fn plan_literal(expected: Type, literal: Literal, span: Span) -> Result<Plan, ResolveError> {
    let (found, conversions) = match (literal, expected) {
        (Literal::Bool(_), Type::Boolean) => (Type::Boolean, 0),
        (Literal::Int(_), Type::Int) => (Type::Int, 0),
        // Integer literals are written directly as floats.
        (Literal::Int(_), Type::Float) => (Type::Float, 1),
        (Literal::Float(_), Type::Float) => (Type::Float, 0),
        (Literal::Bool(_), _) => return Err(mismatch(expected, Type::Boolean, span)),
        (Literal::Int(_), _) => return Err(mismatch(expected, Type::Int, span)),
        (Literal::Float(_), _) => return Err(mismatch(expected, Type::Float, span)),
    };
    Ok(Plan {
        conversions,
        constant: true,
        produces: found,
        step: Step::Literal,
    })
}

fn literal_constant(ty: Type, literal: Literal) -> Box<dyn Expression> {
    let mut ret = FunctionReturn::default();
    match literal {
        Literal::Bool(value) => ret.boolean_return = value,
        Literal::Int(value) => {
            ret.int_return = value;
            ret.float_return = value as f32;
        }
        Literal::Float(value) => ret.float_return = value,
    }
    ty.create_constant(&ret)
}

fn mismatch(expected: Type, found: Type, span: Span) -> ResolveError {
    ResolveError::new(ResolveErrorKind::TypeMismatch { expected, found }, span)
}

fn unknown_function(err: UnknownFunction, span: Span) -> ResolveError {
    ResolveError::new(ResolveErrorKind::UnknownFunction { name: err.name }, span)
}
