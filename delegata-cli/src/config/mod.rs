//! Configuration module
//!
//! Settings come from `--config <FILE>` or, when absent, a `delegata.toml`
//! in the working directory. Relative paths inside the file are resolved
//! against the file's directory.

use crate::error::{CliError, CliResult};
use anyhow::Context as _;
use delegata_core::LanguageTables;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "delegata.toml";

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Language configuration
    #[serde(default)]
    pub language: LanguageSection,

    /// Registry configuration
    #[serde(default)]
    pub registry: RegistrySection,
}

/// Language-related configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageSection {
    /// Language used when a command is given none
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Extra language tables loaded on top of the embedded ones
    #[serde(default)]
    pub tables: Vec<PathBuf>,
}

fn default_language() -> String {
    "english".to_string()
}

impl Default for LanguageSection {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            tables: Vec::new(),
        }
    }
}

/// Registry-related configuration
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(deny_unknown_fields)]
pub struct RegistrySection {
    /// Registry definition file
    pub file: Option<PathBuf>,
}

impl CliConfig {
    /// Parse a configuration from TOML
    pub fn from_toml_str(toml_str: &str) -> CliResult<Self> {
        toml::from_str(toml_str).map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    /// Load an explicit file, or `delegata.toml` if present, or defaults
    pub fn load(path: Option<&Path>) -> CliResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)
                } else {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and parse a configuration file
    pub fn from_file(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        for table in &mut self.language.tables {
            if table.is_relative() {
                *table = base.join(&*table);
            }
        }
        if let Some(file) = &mut self.registry.file {
            if file.is_relative() {
                *file = base.join(&*file);
            }
        }
    }

    /// Embedded tables plus every configured table file
    pub fn language_tables(&self) -> CliResult<LanguageTables> {
        let mut tables = LanguageTables::with_embedded();
        for path in &self.language.tables {
            tables
                .load_file(path)
                .with_context(|| format!("Failed to load language table {}", path.display()))?;
        }
        Ok(tables)
    }
}
