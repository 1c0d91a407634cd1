//! TOML schema for registry definitions
//!
//! Only the data half of a group can be configured: preprocessors and
//! decorators are closures and are attached in code through the builder
//! returned by [`GroupConfig::builder`].

use crate::{
    error::{ConfigError, ConfigResult},
    registry::CapabilityGroupBuilder,
    types::{Classification, DefaultDelegate, Kind, Options},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Root registry configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupConfig>,
}

/// One capability group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub method: String,
    pub name: String,
    pub kind: Kind,
    #[serde(default)]
    pub classification: Classification,
    #[serde(default)]
    pub delegates: Vec<String>,
    /// Fixed default delegate, `"none"` to forbid defaults
    #[serde(default)]
    pub default: Option<String>,
    #[serde(default)]
    pub presets: BTreeMap<String, Options>,
}

impl GroupConfig {
    /// Builder pre-filled with this definition
    pub fn builder<E>(&self) -> CapabilityGroupBuilder<E> {
        let mut builder = CapabilityGroupBuilder::new(&self.method, &self.name, self.kind)
            .classification(self.classification)
            .delegates(self.delegates.iter().map(String::as_str))
            .default_policy(DefaultDelegate::from_config(self.default.as_deref()));

        for (name, options) in &self.presets {
            builder = builder.preset(name, options.clone());
        }
        builder
    }
}

impl RegistryConfig {
    /// Parse from TOML
    pub fn from_toml_str(source_name: &str, toml_str: &str) -> ConfigResult<Self> {
        toml::from_str(toml_str).map_err(|error| ConfigError::Parse {
            source_name: source_name.to_string(),
            error,
        })
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml_str(&path.display().to_string(), &content)
    }

    /// Definition of one group by method name
    pub fn group(&self, method: &str) -> Option<&GroupConfig> {
        self.groups.iter().find(|g| g.method == method)
    }
}
