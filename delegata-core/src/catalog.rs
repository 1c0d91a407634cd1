//! Concrete delegate implementations and their lookup
//!
//! The engine never implements an algorithm itself. A catalogue maps a
//! group's delegate identifiers to callable implementations.

use crate::{
    error::DelegateError,
    registry::CapabilityGroup,
    types::{DelegateId, Options, Value},
};
use std::collections::HashMap;
use std::sync::Arc;

/// A concrete algorithm or tool adapter for one capability
pub trait Delegate<E>: Send + Sync {
    /// Compute the raw result for `entity`
    fn invoke(&self, entity: &E, options: &Options) -> Result<Value, DelegateError>;
}

impl<E, F> Delegate<E> for F
where
    F: Fn(&E, &Options) -> Result<Value, DelegateError> + Send + Sync,
{
    fn invoke(&self, entity: &E, options: &Options) -> Result<Value, DelegateError> {
        self(entity, options)
    }
}

/// Identifier -> implementation resolution for a group
pub trait DelegateLookup<E> {
    /// Implementation of `id` within `group`, if any
    fn lookup(&self, group: &CapabilityGroup<E>, id: &DelegateId) -> Option<Arc<dyn Delegate<E>>>;
}

/// In-memory catalogue keyed by group method and delegate identifier
pub struct Catalog<E> {
    entries: HashMap<String, HashMap<DelegateId, Arc<dyn Delegate<E>>>>,
}

impl<E> Default for Catalog<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<E> std::fmt::Debug for Catalog<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (method, delegates) in &self.entries {
            let mut ids: Vec<&str> = delegates.keys().map(DelegateId::as_str).collect();
            ids.sort_unstable();
            map.entry(method, &ids);
        }
        map.finish()
    }
}

impl<E> Catalog<E> {
    /// An empty catalogue
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implementation for `method`'s delegate `id`
    pub fn register<D>(&mut self, method: impl Into<String>, id: impl Into<DelegateId>, delegate: D)
    where
        D: Delegate<E> + 'static,
    {
        self.entries
            .entry(method.into())
            .or_default()
            .insert(id.into(), Arc::new(delegate));
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<D>(mut self, method: impl Into<String>, id: impl Into<DelegateId>, delegate: D) -> Self
    where
        D: Delegate<E> + 'static,
    {
        self.register(method, id, delegate);
        self
    }

    /// Number of registered implementations
    pub fn len(&self) -> usize {
        self.entries.values().map(HashMap::len).sum()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E> DelegateLookup<E> for Catalog<E> {
    fn lookup(&self, group: &CapabilityGroup<E>, id: &DelegateId) -> Option<Arc<dyn Delegate<E>>> {
        self.entries
            .get(group.method())
            .and_then(|delegates| delegates.get(id))
            .cloned()
    }
}
