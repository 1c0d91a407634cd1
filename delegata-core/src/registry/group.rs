//! Capability group definitions

use crate::{
    error::{ConfigError, ConfigResult, DelegateError},
    types::{Classification, DefaultDelegate, DelegateId, Kind, Options, Value},
};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// Transform run instead of delegate resolution
pub type Preprocessor<E> =
    Arc<dyn Fn(&E, Option<&DelegateId>, &Options) -> Result<Value, DelegateError> + Send + Sync>;

/// Post-processing of a delegate's raw result
pub type Decorator<E> = Arc<dyn Fn(&E, Value) -> Result<Value, DelegateError> + Send + Sync>;

/// A named unit of computable behavior with interchangeable delegates
pub struct CapabilityGroup<E> {
    method: String,
    name: String,
    kind: Kind,
    classification: Classification,
    delegates: Vec<DelegateId>,
    default: DefaultDelegate,
    presets: BTreeMap<String, Options>,
    preprocessors: BTreeMap<String, Preprocessor<E>>,
    decorators: BTreeMap<String, Decorator<E>>,
}

impl<E> Clone for CapabilityGroup<E> {
    fn clone(&self) -> Self {
        Self {
            method: self.method.clone(),
            name: self.name.clone(),
            kind: self.kind,
            classification: self.classification,
            delegates: self.delegates.clone(),
            default: self.default.clone(),
            presets: self.presets.clone(),
            preprocessors: self.preprocessors.clone(),
            decorators: self.decorators.clone(),
        }
    }
}

impl<E> fmt::Debug for CapabilityGroup<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityGroup")
            .field("method", &self.method)
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("classification", &self.classification)
            .field("delegates", &self.delegates)
            .field("default", &self.default)
            .field("presets", &self.presets)
            .field("preprocessors", &self.preprocessors.keys().collect::<Vec<_>>())
            .field("decorators", &self.decorators.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<E> CapabilityGroup<E> {
    /// Start a group with canonical `method`, table `name` and `kind`
    pub fn builder(
        method: impl Into<String>,
        name: impl Into<String>,
        kind: Kind,
    ) -> CapabilityGroupBuilder<E> {
        CapabilityGroupBuilder::new(method, name, kind)
    }

    /// Canonical method name, also the feature cache key
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Group name as used by the language tables
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Category in the language tables
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Annotator or plain
    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// Whether results are cached on the entity
    pub fn is_annotator(&self) -> bool {
        self.classification == Classification::Annotator
    }

    /// Valid delegate identifiers
    pub fn delegates(&self) -> &[DelegateId] {
        &self.delegates
    }

    /// Whether `id` is one of the group's delegates
    pub fn has_delegate(&self, id: &DelegateId) -> bool {
        self.delegates.contains(id)
    }

    /// Group-wide default policy
    pub fn default_delegate(&self) -> &DefaultDelegate {
        &self.default
    }

    /// Preset bundles by name
    pub fn presets(&self) -> &BTreeMap<String, Options> {
        &self.presets
    }

    /// One preprocessor
    pub fn preprocessor(&self, name: &str) -> Option<&Preprocessor<E>> {
        self.preprocessors.get(name)
    }

    /// Preprocessor names, sorted
    pub fn preprocessor_names(&self) -> impl Iterator<Item = &str> {
        self.preprocessors.keys().map(String::as_str)
    }

    /// One decorator
    pub fn decorator(&self, name: &str) -> Option<&Decorator<E>> {
        self.decorators.get(name)
    }

    /// Decorator names, sorted
    pub fn decorator_names(&self) -> impl Iterator<Item = &str> {
        self.decorators.keys().map(String::as_str)
    }

    /// Every operation name the group installs, base method first
    pub fn operation_names(&self) -> Vec<&str> {
        std::iter::once(self.method.as_str())
            .chain(self.presets.keys().map(String::as_str))
            .chain(self.preprocessor_names())
            .chain(self.decorator_names())
            .collect()
    }
}

/// Fluent builder for [`CapabilityGroup`]
pub struct CapabilityGroupBuilder<E> {
    group: CapabilityGroup<E>,
    /// Extra operation names in insertion order, for clash detection
    names: Vec<String>,
}

impl<E> CapabilityGroupBuilder<E> {
    /// Create a new builder
    pub fn new(method: impl Into<String>, name: impl Into<String>, kind: Kind) -> Self {
        Self {
            group: CapabilityGroup {
                method: method.into(),
                name: name.into(),
                kind,
                classification: Classification::default(),
                delegates: Vec::new(),
                default: DefaultDelegate::default(),
                presets: BTreeMap::new(),
                preprocessors: BTreeMap::new(),
                decorators: BTreeMap::new(),
            },
            names: Vec::new(),
        }
    }

    /// Set the classification
    pub fn classification(mut self, classification: Classification) -> Self {
        self.group.classification = classification;
        self
    }

    /// Mark the group plain (results are not cached)
    pub fn plain(self) -> Self {
        self.classification(Classification::Plain)
    }

    /// Set the valid delegate identifiers
    pub fn delegates<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DelegateId>,
    {
        self.group.delegates = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Always use `id` when the caller names no delegate
    pub fn default_delegate(mut self, id: impl Into<DelegateId>) -> Self {
        self.group.default = DefaultDelegate::Fixed(id.into());
        self
    }

    /// Require callers to name a delegate
    pub fn no_default(mut self) -> Self {
        self.group.default = DefaultDelegate::Forbidden;
        self
    }

    /// Set the default policy directly
    pub fn default_policy(mut self, policy: DefaultDelegate) -> Self {
        self.group.default = policy;
        self
    }

    /// Add a preset option bundle
    pub fn preset(mut self, name: impl Into<String>, options: Options) -> Self {
        let name = name.into();
        self.names.push(name.clone());
        self.group.presets.insert(name, options);
        self
    }

    /// Add a preprocessor
    pub fn preprocessor<F>(mut self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&E, Option<&DelegateId>, &Options) -> Result<Value, DelegateError>
            + Send
            + Sync
            + 'static,
    {
        let name = name.into();
        self.names.push(name.clone());
        self.group.preprocessors.insert(name, Arc::new(transform));
        self
    }

    /// Add a decorator
    pub fn decorator<F>(mut self, name: impl Into<String>, transform: F) -> Self
    where
        F: Fn(&E, Value) -> Result<Value, DelegateError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.names.push(name.clone());
        self.group.decorators.insert(name, Arc::new(transform));
        self
    }

    /// Validate and build the group
    pub fn build(self) -> ConfigResult<CapabilityGroup<E>> {
        let group = self.group;

        let mut seen: HashSet<&str> = HashSet::new();
        seen.insert(group.method.as_str());
        for name in &self.names {
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::NameClash {
                    group: group.name.clone(),
                    name: name.clone(),
                });
            }
        }

        if let Some(reserved) = group.delegates.iter().find(|id| id.is_reserved()) {
            return Err(ConfigError::ReservedDelegate {
                group: group.name.clone(),
                delegate: reserved.clone(),
            });
        }

        match &group.default {
            DefaultDelegate::Forbidden => {}
            _ if group.delegates.is_empty() => {
                return Err(ConfigError::EmptyDelegateList {
                    group: group.name.clone(),
                });
            }
            DefaultDelegate::Fixed(id) if !group.delegates.contains(id) => {
                return Err(ConfigError::UnknownDefault {
                    group: group.name.clone(),
                    delegate: id.clone(),
                });
            }
            _ => {}
        }

        Ok(group)
    }
}
