use crate::types::Type;
use core::any::Any;
use core::fmt;
use std::sync::Arc;

/// The tagged object slot of the register.
///
/// Vectors and matrices are stored inline so that writing them never
/// allocates. Matrices are column-major, as uploaded to shaders.
#[derive(Clone)]
pub enum Object {
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Mat4([f32; 16]),
    /// A host value the evaluator only passes through.
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl Object {
    pub fn ty(&self) -> Type {
        match self {
            Object::Vec2(_) => Type::Vec2,
            Object::Vec3(_) => Type::Vec3,
            Object::Vec4(_) => Type::Vec4,
            Object::Mat4(_) => Type::Mat4,
            Object::Opaque(_) => Type::Object,
        }
    }

    /// The all-zero vector or matrix of `ty`; `None` for scalar and opaque types.
    pub fn zero(ty: Type) -> Option<Self> {
        match ty {
            Type::Vec2 => Some(Object::Vec2([0.0; 2])),
            Type::Vec3 => Some(Object::Vec3([0.0; 3])),
            Type::Vec4 => Some(Object::Vec4([0.0; 4])),
            Type::Mat4 => Some(Object::Mat4([0.0; 16])),
            Type::Boolean | Type::Int | Type::Float | Type::Object => None,
        }
    }

    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Object::Opaque(Arc::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Object::Opaque(value) => value.downcast_ref(),
            _ => None,
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Vec2(a), Object::Vec2(b)) => a == b,
            (Object::Vec3(a), Object::Vec3(b)) => a == b,
            (Object::Vec4(a), Object::Vec4(b)) => a == b,
            (Object::Mat4(a), Object::Mat4(b)) => a == b,
            (Object::Opaque(a), Object::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Object::Vec2(v) => write!(f, "vec2{v:?}"),
            Object::Vec3(v) => write!(f, "vec3{v:?}"),
            Object::Vec4(v) => write!(f, "vec4{v:?}"),
            Object::Mat4(m) => write!(f, "mat4{m:?}"),
            Object::Opaque(_) => f.write_str("object(..)"),
        }
    }
}
