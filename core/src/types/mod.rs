//! The closed set of value kinds understood by the evaluator.
//!
//! A [`Type`] is a plain `Copy` tag: two types denote the same type iff they
//! compare equal. Each type knows how to move one value of its representation
//! between the shared [`FunctionReturn`] register and the places that hold
//! values outside of it (constant nodes and homogeneous arrays).

mod array;

pub use array::TypedArray;

use crate::expression::{ConstantExpression, Expression};
use crate::values::FunctionReturn;
use core::fmt;

/// A value kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Type {
    Boolean,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
    /// Opaque host value, only ever passed through.
    Object,
}

impl Type {
    pub const ALL: [Type; 8] = [
        Type::Boolean,
        Type::Int,
        Type::Float,
        Type::Vec2,
        Type::Vec3,
        Type::Vec4,
        Type::Mat4,
        Type::Object,
    ];

    /// The name used in signatures and declarations (`float`, `vec3`, ...).
    pub fn name(self) -> &'static str {
        match self {
            Type::Boolean => "bool",
            Type::Int => "int",
            Type::Float => "float",
            Type::Vec2 => "vec2",
            Type::Vec3 => "vec3",
            Type::Vec4 => "vec4",
            Type::Mat4 => "mat4",
            Type::Object => "object",
        }
    }

    pub fn from_name(name: &str) -> Option<Type> {
        Type::ALL.into_iter().find(|ty| ty.name() == name)
    }

    /// Whether values of this type live in the register's object slot.
    pub fn is_object(self) -> bool {
        !matches!(self, Type::Boolean | Type::Int | Type::Float)
    }

    /// Freezes the value currently held in this type's register slot into a
    /// node that writes it back on every evaluation.
    pub fn create_constant(self, ret: &FunctionReturn) -> Box<dyn Expression> {
        Box::new(ConstantExpression::from_return(self, ret))
    }

    /// Allocates a zero-initialised array of this type's representation.
    pub fn create_array(self, length: usize) -> TypedArray {
        match self {
            Type::Boolean => TypedArray::Boolean(vec![false; length]),
            Type::Int => TypedArray::Int(vec![0; length]),
            Type::Float => TypedArray::Float(vec![0.0; length]),
            Type::Vec2 | Type::Vec3 | Type::Vec4 | Type::Mat4 | Type::Object => {
                TypedArray::Object(vec![None; length])
            }
        }
    }

    /// Copies this type's register slot into `array[index]`.
    ///
    /// # Panics
    ///
    /// If `array` was not created by a type with the same representation.
    pub fn set_value_from_return(self, array: &mut TypedArray, index: usize, ret: &FunctionReturn) {
        match (self, array) {
            (Type::Boolean, TypedArray::Boolean(values)) => values[index] = ret.boolean_return,
            (Type::Int, TypedArray::Int(values)) => values[index] = ret.int_return,
            (Type::Float, TypedArray::Float(values)) => values[index] = ret.float_return,
            (ty, TypedArray::Object(values)) if ty.is_object() => {
                values[index] = ret.object_return.clone();
            }
            (ty, array) => array_mismatch(ty, array),
        }
    }

    /// Copies `array[index]` into this type's register slot.
    ///
    /// # Panics
    ///
    /// If `array` was not created by a type with the same representation.
    pub fn get_value_from_array(self, array: &TypedArray, index: usize, ret: &mut FunctionReturn) {
        match (self, array) {
            (Type::Boolean, TypedArray::Boolean(values)) => ret.boolean_return = values[index],
            (Type::Int, TypedArray::Int(values)) => ret.int_return = values[index],
            (Type::Float, TypedArray::Float(values)) => ret.float_return = values[index],
            (ty, TypedArray::Object(values)) if ty.is_object() => {
                ret.object_return = values[index].clone();
            }
            (ty, array) => array_mismatch(ty, array),
        }
    }
}

#[cold]
#[track_caller]
fn array_mismatch(ty: Type, array: &TypedArray) -> ! {
    panic!("{} value used with an array of {}", ty, array.element_name())
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One slot of a function signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Parameter {
    pub ty: Type,
    /// The argument must fold to a constant at resolution time.
    pub constant: bool,
}

impl Parameter {
    pub const fn new(ty: Type) -> Self {
        Self {
            ty,
            constant: false,
        }
    }

    pub const fn constant(ty: Type) -> Self {
        Self { ty, constant: true }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.constant {
            write!(f, "const {}", self.ty)
        } else {
            write!(f, "{}", self.ty)
        }
    }
}
