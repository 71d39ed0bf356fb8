use crate::ast::{Parser, RegistryError};
use log::debug;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type Computation = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// A named function with a fixed number of numeric arguments.
#[derive(Clone)]
pub struct Function {
    name: String,
    arity: usize,
    computation: Computation,
}

impl Function {
    pub fn new<F>(name: impl Into<String>, arity: usize, computation: F) -> Self
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            arity,
            computation: Arc::new(computation),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Invokes the computation. `args` must hold exactly `arity` values.
    pub fn call(&self, args: &[f64]) -> f64 {
        (self.computation)(args)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.arity == other.arity
            && Arc::ptr_eq(&self.computation, &other.computation)
    }
}

/// Name-keyed table of functions callable from expressions.
///
/// Registration goes through `&self` so a registry shared behind an `Arc` can be extended at
/// any time. Lookups take a read lock and never block each other. Trees that were already
/// compiled hold their own `Arc<Function>` and are not affected by later registrations.
pub struct FunctionRegistry {
    functions: RwLock<HashMap<String, Arc<Function>>>,
}

impl FunctionRegistry {
    /// Creates a registry holding the built-in functions.
    pub fn new() -> Self {
        let registry = Self::empty();
        super::register_builtins(&registry);
        registry
    }

    /// Creates a registry without any functions.
    pub fn empty() -> Self {
        Self {
            functions: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `computation` under `name`, replacing any function already registered under it.
    pub fn register<F>(&self, name: &str, arity: usize, computation: F) -> Result<(), RegistryError>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.insert(Function::new(name, arity, computation))
    }

    /// Validates and registers a prebuilt function, e.g. one produced by `#[arith_fn]`.
    pub fn insert(&self, function: Function) -> Result<(), RegistryError> {
        if !Parser::is_identifier(function.name()) {
            return Err(RegistryError::InvalidName {
                name: function.name().to_string(),
            });
        }
        if function.arity() == 0 {
            return Err(RegistryError::ZeroArity {
                name: function.name().to_string(),
            });
        }

        self.install(function);
        Ok(())
    }

    pub(crate) fn install(&self, function: Function) {
        let name = function.name().to_string();
        let arity = function.arity();
        let previous = self.functions.write().insert(name.clone(), Arc::new(function));
        match previous {
            Some(_) => debug!("Replaced function '{}' (arity {})", name, arity),
            None => debug!("Registered function '{}' (arity {})", name, arity),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<Function>> {
        self.functions.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.read().contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.read().keys().cloned().collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.read().is_empty()
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
