//! Named expressions evaluated once per frame into typed storage.

use crate::api::{Error, ResolverOptions, compile};
use crate::context::FunctionContext;
use crate::expression::Expression;
use crate::resolver::FunctionResolver;
use crate::types::{Type, TypedArray};
use crate::values::{FunctionReturn, Object};
use hashbrown::HashMap;

/// A definition that failed to compile and was left out.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedUniform {
    pub name: String,
    pub ty: Type,
    pub source: String,
    pub error: Error,
}

struct Uniform {
    name: String,
    ty: Type,
    /// Index into the storage array of `ty`.
    slot: usize,
    expression: Box<dyn Expression>,
}

/// The compiled set of custom uniforms.
///
/// [`update`](Self::update) evaluates every uniform in definition order
/// through one reused register and stores the results; hosts then copy the
/// stored values out with [`read`](Self::read).
pub struct CustomUniforms {
    uniforms: Vec<Uniform>,
    by_name: HashMap<String, usize>,
    storage: HashMap<Type, TypedArray>,
    skipped: Vec<SkippedUniform>,
    ret: FunctionReturn,
}

impl CustomUniforms {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Number of uniforms that compiled.
    pub fn len(&self) -> usize {
        self.uniforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uniforms.is_empty()
    }

    /// Compiled uniform names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.uniforms.iter().map(|uniform| uniform.name.as_str())
    }

    pub fn ty(&self, name: &str) -> Option<Type> {
        self.by_name.get(name).map(|&index| self.uniforms[index].ty)
    }

    pub fn skipped(&self) -> &[SkippedUniform] {
        &self.skipped
    }

    pub fn update(&mut self, context: &dyn FunctionContext) {
        for uniform in &self.uniforms {
            uniform.expression.evaluate_to(context, &mut self.ret);
            if let Some(array) = self.storage.get_mut(&uniform.ty) {
                uniform
                    .ty
                    .set_value_from_return(array, uniform.slot, &self.ret);
            }
        }
    }

    /// Copies the last stored value of `name` into its type's slot of `ret`
    /// and returns that type, or `None` for an unknown name.
    pub fn read(&self, name: &str, ret: &mut FunctionReturn) -> Option<Type> {
        let uniform = &self.uniforms[*self.by_name.get(name)?];
        let array = self.storage.get(&uniform.ty)?;
        uniform.ty.get_value_from_array(array, uniform.slot, ret);
        Some(uniform.ty)
    }
}

struct Definition {
    name: String,
    ty: Type,
    source: String,
}

/// Accumulates `(name, type, source)` definitions.
#[derive(Default)]
pub struct Builder {
    definitions: Vec<Definition>,
}

impl Builder {
    pub fn add(&mut self, name: impl Into<String>, ty: Type, source: impl Into<String>) -> &mut Self {
        self.definitions.push(Definition {
            name: name.into(),
            ty,
            source: source.into(),
        });
        self
    }

    /// Compiles every definition independently. A definition that fails, or
    /// reuses an earlier name, is logged and reported in
    /// [`CustomUniforms::skipped`]; the others are unaffected.
    pub fn build(
        self,
        functions: &FunctionResolver,
        context: &dyn FunctionContext,
        options: ResolverOptions,
    ) -> CustomUniforms {
        let mut uniforms = Vec::with_capacity(self.definitions.len());
        let mut by_name = HashMap::new();
        let mut lengths: HashMap<Type, usize> = HashMap::new();
        let mut skipped = Vec::new();

        for Definition { name, ty, source } in self.definitions {
            let compiled = if by_name.contains_key(&name) {
                Err(Error::DuplicateDefinition { name: name.clone() })
            } else {
                compile(functions, context, options, ty, &source)
            };
            match compiled {
                Ok(expression) => {
                    let length = lengths.entry(ty).or_default();
                    let slot = *length;
                    *length += 1;
                    by_name.insert(name.clone(), uniforms.len());
                    uniforms.push(Uniform {
                        name,
                        ty,
                        slot,
                        expression,
                    });
                }
                Err(error) => {
                    tracing::warn!(%name, %ty, %error, "skipping custom uniform");
                    skipped.push(SkippedUniform {
                        name,
                        ty,
                        source,
                        error,
                    });
                }
            }
        }

        let storage = lengths
            .into_iter()
            .map(|(ty, length)| {
                let mut array = ty.create_array(length);
                // Vectors and matrices read as zero until the first update.
                if let TypedArray::Object(values) = &mut array {
                    values.fill(Object::zero(ty));
                }
                (ty, array)
            })
            .collect();
        tracing::debug!(
            compiled = uniforms.len(),
            skipped = skipped.len(),
            "built custom uniforms"
        );
        CustomUniforms {
            uniforms,
            by_name,
            storage,
            skipped,
            ret: FunctionReturn::default(),
        }
    }
}
