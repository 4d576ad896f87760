//! Adapter registry
//!
//! The [`AdapterRegistry`] maps benchmark identifiers (and aliases) to their
//! adapters. It is populated once at start-up and read-only afterwards; the
//! builtin set comes from [`crate::benchmarks::builtin_registry`].
//!
//! ```
//! use benchwrap_domain::benchmarks::builtin_registry;
//!
//! let registry = builtin_registry();
//! assert!(registry.get("fio").is_some());
//! assert_eq!(registry.resolve("iperf3"), Some("iperf"));
//! ```

use indexmap::IndexMap;
use std::collections::HashMap;

use super::traits::BenchmarkAdapter;
use crate::core::error::AdapterError;

#[derive(Default)]
pub struct AdapterRegistry {
    adapters: IndexMap<String, Box<dyn BenchmarkAdapter>>,
    /// Alias → canonical id mapping (e.g. "iperf3" → "iperf")
    aliases: HashMap<String, String>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, adapter: impl BenchmarkAdapter + 'static) -> Self {
        self.adapters
            .insert(adapter.id().to_string(), Box::new(adapter));
        self
    }

    pub fn register_alias(mut self, alias: impl Into<String>, canonical: impl Into<String>) -> Self {
        self.aliases.insert(alias.into(), canonical.into());
        self
    }

    /// Resolve an id or alias to the canonical id; registered ids win over aliases
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.adapters.contains_key(name) {
            Some(name)
        } else {
            self.aliases.get(name).map(|s| s.as_str())
        }
    }

    pub fn get(&self, name: &str) -> Option<&dyn BenchmarkAdapter> {
        self.resolve(name)
            .and_then(|id| self.adapters.get(id))
            .map(|a| a.as_ref())
    }

    /// Like [`get`](Self::get) but reports unknown ids as [`AdapterError::UnknownAdapter`]
    pub fn lookup(&self, name: &str) -> Result<&dyn BenchmarkAdapter, AdapterError> {
        self.get(name)
            .ok_or_else(|| AdapterError::UnknownAdapter(name.to_string()))
    }

    /// Adapters in registration order
    pub fn all(&self) -> impl Iterator<Item = &dyn BenchmarkAdapter> {
        self.adapters.values().map(|a| a.as_ref())
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.adapters.keys().map(|s| s.as_str())
    }

    /// Aliases pointing at `id`, sorted
    pub fn aliases_of(&self, id: &str) -> Vec<&str> {
        let mut aliases: Vec<&str> = self
            .aliases
            .iter()
            .filter(|(_, canonical)| canonical.as_str() == id)
            .map(|(alias, _)| alias.as_str())
            .collect();
        aliases.sort_unstable();
        aliases
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

impl std::fmt::Debug for AdapterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistry")
            .field("adapters", &self.adapters.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}
