//! Registry of capability groups
//!
//! A group describes one capability: its canonical method name, the valid
//! delegate identifiers, its default policy and the presets, preprocessors
//! and decorators derived from it.

pub mod config;
mod group;

pub use config::{GroupConfig, RegistryConfig};
pub use group::{CapabilityGroup, CapabilityGroupBuilder, Decorator, Preprocessor};

use crate::error::{ConfigError, ConfigResult};
use std::collections::HashMap;

/// Capability groups keyed by canonical method name
pub struct Registry<E> {
    groups: Vec<CapabilityGroup<E>>,
    index: HashMap<String, usize>,
}

impl<E> Default for Registry<E> {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<E> std::fmt::Debug for Registry<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(&self.groups).finish()
    }
}

impl<E> Registry<E> {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every group of a configuration without closures
    pub fn from_config(config: &RegistryConfig) -> ConfigResult<Self> {
        let mut registry = Self::new();
        for group in &config.groups {
            registry.register(group.builder().build()?)?;
        }
        Ok(registry)
    }

    /// Add a group; method names must be unique
    pub fn register(&mut self, group: CapabilityGroup<E>) -> ConfigResult<()> {
        if self.index.contains_key(group.method()) {
            return Err(ConfigError::DuplicateGroup {
                method: group.method().to_string(),
            });
        }
        self.index.insert(group.method().to_string(), self.groups.len());
        self.groups.push(group);
        Ok(())
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, group: CapabilityGroup<E>) -> ConfigResult<Self> {
        self.register(group)?;
        Ok(self)
    }

    /// Group definition by capability name
    pub fn group(&self, method: &str) -> Option<&CapabilityGroup<E>> {
        self.index.get(method).map(|&i| &self.groups[i])
    }

    /// Groups in registration order
    pub fn groups(&self) -> &[CapabilityGroup<E>] {
        &self.groups
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether no group is registered
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;

    struct Token;

    fn stem() -> CapabilityGroup<Token> {
        CapabilityGroup::builder("stem", "stem", Kind::Inflectors)
            .delegates(["porter", "uea"])
            .build()
            .unwrap()
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = Registry::new().with(stem()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.group("stem").unwrap().name(), "stem");
        assert!(registry.group("tag").is_none());
    }

    #[test]
    fn test_duplicate_method_rejected() {
        let mut registry = Registry::new();
        registry.register(stem()).unwrap();
        assert!(matches!(
            registry.register(stem()),
            Err(ConfigError::DuplicateGroup { method }) if method == "stem"
        ));
    }

    #[test]
    fn test_from_config() {
        let config = RegistryConfig::from_toml_str(
            "registry.toml",
            r#"
[[group]]
method = "stem"
name = "stem"
kind = "inflectors"
delegates = ["porter"]

[[group]]
method = "tag"
name = "tag"
kind = "lexicalizers"
delegates = ["brill"]
"#,
        )
        .unwrap();

        let registry = Registry::<Token>::from_config(&config).unwrap();
        let methods: Vec<&str> = registry.groups().iter().map(|g| g.method()).collect();
        assert_eq!(methods, vec!["stem", "tag"]);
    }
}
