//! Configuration structures and validation
//!
//! This module defines the TOML schema for language default tables.

use crate::{
    error::{ConfigError, ConfigResult},
    language::Language,
    types::Kind,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Group name -> ordered candidate delegates
pub type DefaultChains = BTreeMap<String, Vec<String>>;

/// Root language table configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageConfig {
    pub metadata: Metadata,
    #[serde(default)]
    pub extractors: DefaultChains,
    #[serde(default)]
    pub processors: DefaultChains,
    #[serde(default)]
    pub lexicalizers: DefaultChains,
    #[serde(default)]
    pub inflectors: DefaultChains,
    #[serde(default)]
    pub common_words: CommonWords,
}

/// Language metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    pub code: String,
    pub name: String,
}

/// Frequent function words of the language
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommonWords {
    #[serde(default)]
    pub words: Vec<String>,
}

impl LanguageConfig {
    /// Chains configured for one kind
    pub fn section(&self, kind: Kind) -> &DefaultChains {
        match kind {
            Kind::Extractors => &self.extractors,
            Kind::Processors => &self.processors,
            Kind::Lexicalizers => &self.lexicalizers,
            Kind::Inflectors => &self.inflectors,
        }
    }

    /// Validate configuration and return the described language
    pub(crate) fn validate(&self) -> ConfigResult<Language> {
        let language =
            Language::describe(&self.metadata.code).map_err(|_| ConfigError::UnknownLanguage {
                code: self.metadata.code.clone(),
            })?;

        for kind in Kind::ALL {
            for (group, chain) in self.section(kind) {
                if chain.is_empty() {
                    return Err(ConfigError::EmptyDefaultChain {
                        language: language.name().to_string(),
                        kind,
                        group: group.clone(),
                    });
                }
            }
        }

        Ok(language)
    }
}
