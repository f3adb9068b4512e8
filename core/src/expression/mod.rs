//! Resolved expression trees and the evaluation protocol.
//!
//! Every node implements [`Expression::evaluate_to`]: it pulls its operands'
//! values through the caller's register, then overwrites the register field
//! matching its own static type with its result. Evaluation is synchronous,
//! recursive over tree depth, and never fails; all checks happen during
//! resolution.

use crate::context::FunctionContext;
use crate::functions::TypedFunction;
use crate::types::Type;
use crate::values::{FunctionReturn, Object};
use core::fmt;
use core::hint;
use core::sync::atomic::{AtomicU32, Ordering, fence};
use std::sync::{Arc, PoisonError, RwLock};

/// A resolved node.
pub trait Expression: fmt::Debug + Send + Sync {
    fn evaluate_to(&self, context: &dyn FunctionContext, ret: &mut FunctionReturn);
}

/// A fixed value captured at construction, see [`Type::create_constant`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantExpression {
    Boolean(bool),
    Int(i32),
    Float(f32),
    Object(Option<Object>),
}

impl ConstantExpression {
    /// Captures the slot of `ret` that belongs to `ty`.
    pub fn from_return(ty: Type, ret: &FunctionReturn) -> Self {
        match ty {
            Type::Boolean => ConstantExpression::Boolean(ret.boolean_return),
            Type::Int => ConstantExpression::Int(ret.int_return),
            Type::Float => ConstantExpression::Float(ret.float_return),
            Type::Vec2 | Type::Vec3 | Type::Vec4 | Type::Mat4 | Type::Object => {
                ConstantExpression::Object(ret.object_return.clone())
            }
        }
    }
}

impl Expression for ConstantExpression {
    #[inline]
    fn evaluate_to(&self, _context: &dyn FunctionContext, ret: &mut FunctionReturn) {
        match self {
            ConstantExpression::Boolean(value) => ret.boolean_return = *value,
            ConstantExpression::Int(value) => ret.int_return = *value,
            ConstantExpression::Float(value) => ret.float_return = *value,
            ConstantExpression::Object(value) => ret.object_return = value.clone(),
        }
    }
}

/// A variable reference, bound to the expression the context supplied when
/// the tree was resolved.
pub struct VariableExpression {
    name: String,
    value: Arc<dyn Expression>,
}

impl VariableExpression {
    pub fn new(name: impl Into<String>, value: Arc<dyn Expression>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Expression for VariableExpression {
    #[inline]
    fn evaluate_to(&self, context: &dyn FunctionContext, ret: &mut FunctionReturn) {
        self.value.evaluate_to(context, ret);
    }
}

impl fmt::Debug for VariableExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Variable({})", self.name)
    }
}

/// A variable the host rewrites between evaluations, such as the frame
/// counter. Bind it with [`BasicFunctionContext::set_host_value`](crate::context::BasicFunctionContext::set_host_value);
/// trees resolved against it observe every later [`set`](Self::set).
///
/// Scalars live in a single atomic word. Vectors and matrices are stored as
/// float bits behind a sequence counter, so a reader retries instead of
/// blocking and never observes a half-written value. Only opaque objects
/// take a lock.
pub struct HostValue {
    ty: Type,
    /// Odd while a vector or matrix write is in progress.
    sequence: AtomicU32,
    bits: [AtomicU32; 16],
    opaque: RwLock<Option<Object>>,
}

impl HostValue {
    /// A zero value of `ty`.
    pub fn new(ty: Type) -> Arc<Self> {
        Arc::new(Self {
            ty,
            sequence: AtomicU32::new(0),
            bits: core::array::from_fn(|_| AtomicU32::new(0)),
            opaque: RwLock::new(None),
        })
    }

    pub fn ty(&self) -> Type {
        self.ty
    }

    /// Takes the slot of `ret` that belongs to this value's type.
    pub fn set(&self, ret: &FunctionReturn) {
        match self.ty {
            Type::Boolean => self.bits[0].store(ret.boolean_return as u32, Ordering::Relaxed),
            Type::Int => self.bits[0].store(ret.int_return as u32, Ordering::Relaxed),
            Type::Float => self.bits[0].store(ret.float_return.to_bits(), Ordering::Relaxed),
            Type::Object => {
                *self.opaque.write().unwrap_or_else(PoisonError::into_inner) =
                    ret.object_return.clone();
            }
            Type::Vec2 | Type::Vec3 | Type::Vec4 | Type::Mat4 => match &ret.object_return {
                Some(Object::Vec2(v)) if self.ty == Type::Vec2 => self.write_components(v),
                Some(Object::Vec3(v)) if self.ty == Type::Vec3 => self.write_components(v),
                Some(Object::Vec4(v)) if self.ty == Type::Vec4 => self.write_components(v),
                Some(Object::Mat4(m)) if self.ty == Type::Mat4 => self.write_components(m),
                other => {
                    tracing::warn!(ty = %self.ty, value = ?other, "ignoring host value of the wrong type");
                }
            },
        }
    }

    pub fn set_bool(&self, value: bool) {
        self.set(&FunctionReturn {
            boolean_return: value,
            ..FunctionReturn::default()
        });
    }

    pub fn set_int(&self, value: i32) {
        self.set(&FunctionReturn {
            int_return: value,
            ..FunctionReturn::default()
        });
    }

    pub fn set_float(&self, value: f32) {
        self.set(&FunctionReturn {
            float_return: value,
            ..FunctionReturn::default()
        });
    }

    pub fn set_object(&self, value: Object) {
        self.set(&FunctionReturn {
            object_return: Some(value),
            ..FunctionReturn::default()
        });
    }

    fn write_components(&self, components: &[f32]) {
        // Writers exclude each other by moving the counter from even to odd.
        let mut sequence = self.sequence.load(Ordering::Relaxed);
        loop {
            if sequence & 1 == 1 {
                hint::spin_loop();
                sequence = self.sequence.load(Ordering::Relaxed);
                continue;
            }
            match self.sequence.compare_exchange_weak(
                sequence,
                sequence.wrapping_add(1),
                Ordering::Acquire,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(current) => sequence = current,
            }
        }
        fence(Ordering::Release);
        for (slot, value) in self.bits.iter().zip(components) {
            slot.store(value.to_bits(), Ordering::Relaxed);
        }
        self.sequence.store(sequence.wrapping_add(2), Ordering::Release);
    }

    fn read_components<const N: usize>(&self) -> [f32; N] {
        let mut components = [0.0; N];
        loop {
            let before = self.sequence.load(Ordering::Acquire);
            if before & 1 == 1 {
                hint::spin_loop();
                continue;
            }
            for (value, slot) in components.iter_mut().zip(&self.bits) {
                *value = f32::from_bits(slot.load(Ordering::Relaxed));
            }
            fence(Ordering::Acquire);
            if self.sequence.load(Ordering::Relaxed) == before {
                return components;
            }
        }
    }
}

impl Expression for HostValue {
    fn evaluate_to(&self, _context: &dyn FunctionContext, ret: &mut FunctionReturn) {
        match self.ty {
            Type::Boolean => ret.boolean_return = self.bits[0].load(Ordering::Relaxed) != 0,
            Type::Int => ret.int_return = self.bits[0].load(Ordering::Relaxed) as i32,
            Type::Float => ret.float_return = f32::from_bits(self.bits[0].load(Ordering::Relaxed)),
            Type::Vec2 => ret.object_return = Some(Object::Vec2(self.read_components())),
            Type::Vec3 => ret.object_return = Some(Object::Vec3(self.read_components())),
            Type::Vec4 => ret.object_return = Some(Object::Vec4(self.read_components())),
            Type::Mat4 => ret.object_return = Some(Object::Mat4(self.read_components())),
            Type::Object => {
                ret.object_return = self.opaque.read().unwrap_or_else(PoisonError::into_inner).clone();
            }
        }
    }
}

impl fmt::Debug for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostValue({})", self.ty)
    }
}

/// A call of one resolved overload with its already-resolved arguments.
pub struct FunctionCall {
    name: String,
    function: Arc<dyn TypedFunction>,
    arguments: Box<[Box<dyn Expression>]>,
}

impl FunctionCall {
    pub fn new(
        name: impl Into<String>,
        function: Arc<dyn TypedFunction>,
        arguments: Vec<Box<dyn Expression>>,
    ) -> Self {
        debug_assert_eq!(function.parameters().len(), arguments.len());
        Self {
            name: name.into(),
            function,
            arguments: arguments.into_boxed_slice(),
        }
    }

    pub fn function(&self) -> &Arc<dyn TypedFunction> {
        &self.function
    }
}

impl Expression for FunctionCall {
    #[inline]
    fn evaluate_to(&self, context: &dyn FunctionContext, ret: &mut FunctionReturn) {
        self.function.evaluate_to(&self.arguments, context, ret);
    }
}

impl fmt::Debug for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple(&self.name);
        for argument in self.arguments.iter() {
            tuple.field(argument);
        }
        tuple.finish()
    }
}
