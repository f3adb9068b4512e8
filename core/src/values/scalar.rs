use super::{FunctionReturn, Object};
use crate::types::Type;
use core::fmt::Debug;

/// A Rust value with a fixed [`Type`] and a fixed slot in the register.
///
/// This is what lets the function shapes in [`crate::functions`] be written
/// once, generically, instead of once per signature.
pub trait Scalar: Copy + Debug + Send + Sync + 'static {
    const TYPE: Type;

    fn read(ret: &FunctionReturn) -> Self;

    fn write(self, ret: &mut FunctionReturn);
}

impl Scalar for bool {
    const TYPE: Type = Type::Boolean;

    #[inline]
    fn read(ret: &FunctionReturn) -> Self {
        ret.boolean_return
    }

    #[inline]
    fn write(self, ret: &mut FunctionReturn) {
        ret.boolean_return = self;
    }
}

impl Scalar for i32 {
    const TYPE: Type = Type::Int;

    #[inline]
    fn read(ret: &FunctionReturn) -> Self {
        ret.int_return
    }

    #[inline]
    fn write(self, ret: &mut FunctionReturn) {
        ret.int_return = self;
    }
}

impl Scalar for f32 {
    const TYPE: Type = Type::Float;

    #[inline]
    fn read(ret: &FunctionReturn) -> Self {
        ret.float_return
    }

    #[inline]
    fn write(self, ret: &mut FunctionReturn) {
        ret.float_return = self;
    }
}

macro_rules! object_scalar {
    ($repr:ty, $variant:ident) => {
        impl Scalar for $repr {
            const TYPE: Type = Type::$variant;

            #[inline]
            fn read(ret: &FunctionReturn) -> Self {
                match &ret.object_return {
                    Some(Object::$variant(value)) => *value,
                    other => unexpected_object(Self::TYPE, other),
                }
            }

            #[inline]
            fn write(self, ret: &mut FunctionReturn) {
                ret.object_return = Some(Object::$variant(self));
            }
        }
    };
}

object_scalar!([f32; 2], Vec2);
object_scalar!([f32; 3], Vec3);
object_scalar!([f32; 4], Vec4);
object_scalar!([f32; 16], Mat4);

// Resolution guarantees the producer of the slot had the expected type.
#[cold]
fn unexpected_object(expected: Type, found: &Option<Object>) -> ! {
    unreachable!("register holds {found:?} where {expected} was expected")
}
