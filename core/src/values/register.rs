use super::Object;

/// The shared scratch register every expression node writes its result into.
///
/// After a node evaluates, only the field matching its static return type is
/// meaningful. The other fields keep whatever an earlier evaluation left in
/// them, so callers must copy the value out before evaluating anything else
/// through the same register.
///
/// The register is not synchronized. Give each concurrent caller its own
/// instance; a single instance can be reused across any number of
/// sequential evaluations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionReturn {
    pub boolean_return: bool,
    pub int_return: i32,
    pub float_return: f32,
    pub object_return: Option<Object>,
}

impl FunctionReturn {
    pub fn new() -> Self {
        Self::default()
    }
}
