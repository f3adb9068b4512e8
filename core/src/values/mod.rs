//! Runtime value representation.
//!
//! Values never travel as boxed results: every node writes into the one
//! [`FunctionReturn`] register its caller provides, and the caller reads back
//! the field matching the node's static [`Type`](crate::types::Type).

mod object;
mod register;
mod scalar;

pub use object::Object;
pub use register::FunctionReturn;
pub use scalar::Scalar;
