use crate::values::Object;

/// A homogeneous backing array, one variant per register representation.
///
/// Created by [`Type::create_array`](super::Type::create_array) and accessed
/// through the owning type so that reads and writes go through the same slot
/// of the register.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Boolean(Vec<bool>),
    Int(Vec<i32>),
    Float(Vec<f32>),
    Object(Vec<Option<Object>>),
}

impl TypedArray {
    pub fn len(&self) -> usize {
        match self {
            TypedArray::Boolean(values) => values.len(),
            TypedArray::Int(values) => values.len(),
            TypedArray::Float(values) => values.len(),
            TypedArray::Object(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(super) fn element_name(&self) -> &'static str {
        match self {
            TypedArray::Boolean(_) => "bool",
            TypedArray::Int(_) => "int",
            TypedArray::Float(_) => "float",
            TypedArray::Object(_) => "object",
        }
    }
}
