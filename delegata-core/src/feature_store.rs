//! Per-entity feature cache
//!
//! The store maps feature names to computed values. Computing a feature is
//! serialized per entity through one reentrant compute lock, so concurrent
//! callers on one entity compute each feature at most once while a delegate
//! may still call back into other operations on the same thread. Operations
//! that call each other from different threads never hold more than this one
//! lock per entity.

use crate::types::Value;
use parking_lot::{Mutex, ReentrantMutex, ReentrantMutexGuard};
use std::collections::HashMap;

/// Something features can be computed for
pub trait Entity: Send + Sync {
    /// Language identifier attached to the entity
    fn language(&self) -> &str;

    /// The entity's feature cache
    fn features(&self) -> &FeatureStore;
}

/// Feature name -> value cache owned by one entity
#[derive(Debug, Default)]
pub struct FeatureStore {
    entries: Mutex<HashMap<String, Value>>,
    compute: ReentrantMutex<()>,
}

/// Exclusive right to compute features of one entity on the current thread
pub type ComputeGuard<'a> = ReentrantMutexGuard<'a, ()>;

impl FeatureStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for a feature
    pub fn get(&self, name: &str) -> Option<Value> {
        self.entries.lock().get(name).cloned()
    }

    /// Whether a feature is cached
    pub fn contains(&self, name: &str) -> bool {
        self.entries.lock().contains_key(name)
    }

    /// Store a result under `name`, returning the previous value
    pub fn store(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.lock().insert(name.into(), value)
    }

    /// Move the entry under `from` to `to`
    ///
    /// After the call at most one of the two keys holds the value. Nothing
    /// happens when `from` is empty.
    pub fn relabel(&self, from: &str, to: &str) -> Option<Value> {
        let mut entries = self.entries.lock();
        let value = entries.remove(from)?;
        entries.insert(to.to_string(), value.clone());
        Some(value)
    }

    /// Evict one feature
    pub fn remove(&self, name: &str) -> Option<Value> {
        self.entries.lock().remove(name)
    }

    /// Evict everything
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Cached feature names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.lock().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Number of cached features
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Lock the entity for check-compute-store
    ///
    /// The same thread may lock it again while holding it.
    pub fn lock(&self) -> ComputeGuard<'_> {
        self.compute.lock()
    }
}
