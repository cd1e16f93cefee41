//! Module resolution
//!
//! The runner resolves unit names through a [`ModuleResolver`]. How a
//! unit gets loaded is up to the host; [`ModuleRegistry`] is the
//! in-memory resolver used by the CLI and tests.

use crate::assert;
use crate::error::ResolveError;
use crate::value::Value;
use std::collections::HashMap;

/// Resolve a unit name into its exported value
pub trait ModuleResolver {
    fn resolve(&self, name: &str) -> Result<Value, ResolveError>;
}

impl<R: ModuleResolver + ?Sized> ModuleResolver for &R {
    fn resolve(&self, name: &str) -> Result<Value, ResolveError> {
        (**self).resolve(name)
    }
}

/// Registry of loaded units, keyed by name
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    modules: HashMap<String, Value>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the assertion module registered as `assert`
    pub fn with_stdlib() -> Self {
        let mut registry = Self::new();
        registry.register("assert", assert::module());
        registry
    }

    /// Register a unit, replacing any unit of the same name
    pub fn register(&mut self, name: impl Into<String>, module: impl Into<Value>) {
        self.modules.insert(name.into(), module.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    /// Registered unit names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.modules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl ModuleResolver for ModuleRegistry {
    fn resolve(&self, name: &str) -> Result<Value, ResolveError> {
        self.modules
            .get(name)
            .cloned()
            .ok_or_else(|| ResolveError::UnknownModule {
                name: name.to_string(),
            })
    }
}
