//! Overload registry: function name -> return type -> candidate overloads.

use crate::functions::{Signature, TypedFunction};
use crate::types::Type;
use hashbrown::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Builds a fresh overload on every resolution.
pub type FunctionFactory = Arc<dyn Fn() -> Arc<dyn TypedFunction> + Send + Sync>;

type Overloads<T> = HashMap<String, HashMap<Type, Vec<T>>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no such function: {name}")]
pub struct UnknownFunction {
    pub name: String,
}

/// Immutable lookup of static overloads and dynamic overload factories.
///
/// Built once through [`Builder`]; afterwards only read, so it can be shared
/// between threads.
pub struct FunctionResolver {
    functions: Overloads<Arc<dyn TypedFunction>>,
    dynamic_functions: Overloads<FunctionFactory>,
}

impl FunctionResolver {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// All overloads of `name` returning `return_type`: the static ones in
    /// insertion order, then one freshly built instance per dynamic factory.
    ///
    /// A known name without such an overload gives an empty list; only an
    /// unknown name is an error.
    pub fn resolve(
        &self,
        name: &str,
        return_type: Type,
    ) -> Result<Vec<Arc<dyn TypedFunction>>, UnknownFunction> {
        let functions = self.functions.get(name);
        let dynamic_functions = self.dynamic_functions.get(name);
        if functions.is_none() && dynamic_functions.is_none() {
            return Err(UnknownFunction {
                name: name.to_string(),
            });
        }

        let mut resolved: Vec<Arc<dyn TypedFunction>> = functions
            .and_then(|by_type| by_type.get(&return_type))
            .cloned()
            .unwrap_or_default();
        if let Some(factories) = dynamic_functions.and_then(|by_type| by_type.get(&return_type)) {
            resolved.extend(factories.iter().map(|factory| {
                let function = factory();
                debug_assert_eq!(function.return_type(), return_type);
                function
            }));
        }
        Ok(resolved)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name) || self.dynamic_functions.contains_key(name)
    }

    /// Every registered name, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .functions
            .keys()
            .chain(self.dynamic_functions.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Formatted signatures of every overload, grouped by name then return
    /// type. Dynamic overloads are materialised to be described.
    pub fn signatures(&self) -> Vec<String> {
        let mut signatures = Vec::new();
        for name in self.names() {
            let mut types: Vec<Type> = Vec::new();
            if let Some(by_type) = self.functions.get(name) {
                types.extend(by_type.keys());
            }
            if let Some(by_type) = self.dynamic_functions.get(name) {
                types.extend(by_type.keys());
            }
            types.sort_unstable();
            types.dedup();

            for ty in types {
                // The name is known, so this cannot fail.
                for function in self.resolve(name, ty).unwrap_or_default() {
                    signatures.push(Signature::new(name, function.as_ref()).to_string());
                }
            }
        }
        signatures
    }

    pub fn log_all_functions(&self) {
        for signature in self.signatures() {
            tracing::info!("{signature}");
        }
    }
}

/// Accumulates overloads. Duplicates are kept; disambiguation happens when an
/// expression is resolved.
#[derive(Default)]
pub struct Builder {
    functions: HashMap<String, Vec<Arc<dyn TypedFunction>>>,
    dynamic_functions: Overloads<FunctionFactory>,
}

impl Builder {
    pub fn add(&mut self, name: impl Into<String>, function: impl TypedFunction + 'static) -> &mut Self {
        self.add_shared(name, Arc::new(function))
    }

    pub fn add_shared(&mut self, name: impl Into<String>, function: Arc<dyn TypedFunction>) -> &mut Self {
        self.functions.entry(name.into()).or_default().push(function);
        self
    }

    /// Registers a factory invoked on every resolution of `name` for
    /// `return_type`, for overloads that carry per-use state.
    pub fn add_dynamic(
        &mut self,
        name: impl Into<String>,
        return_type: Type,
        factory: impl Fn() -> Arc<dyn TypedFunction> + Send + Sync + 'static,
    ) -> &mut Self {
        self.dynamic_functions
            .entry(name.into())
            .or_default()
            .entry(return_type)
            .or_default()
            .push(Arc::new(factory));
        self
    }

    pub fn build(self) -> FunctionResolver {
        let mut functions: Overloads<Arc<dyn TypedFunction>> = HashMap::new();
        for (name, overloads) in self.functions {
            let by_type = functions.entry(name).or_default();
            for function in overloads {
                by_type.entry(function.return_type()).or_default().push(function);
            }
        }
        tracing::debug!(
            names = functions.len(),
            dynamic_names = self.dynamic_functions.len(),
            "built function resolver"
        );
        FunctionResolver {
            functions,
            dynamic_functions: self.dynamic_functions,
        }
    }
}
