//! Language table loader
//!
//! Manages embedded and file-based language tables.

use crate::{
    error::{ConfigError, ConfigResult},
    language::{config::LanguageConfig, LanguageDefaults, LanguageTables},
};
use std::path::Path;
use std::sync::OnceLock;

/// Embedded language tables
static EMBEDDED: OnceLock<LanguageTables> = OnceLock::new();

/// Tables shipped with the crate, parsed on first access
pub fn embedded() -> &'static LanguageTables {
    EMBEDDED.get_or_init(|| {
        let mut tables = LanguageTables::new();

        match parse_table("english.toml", include_str!("../../configs/languages/english.toml")) {
            Ok(defaults) => {
                tables.insert(defaults);
            }
            Err(e) => {
                log::warn!("Failed to load embedded English table: {e}");
            }
        }

        tables
    })
}

/// Parse a language table from TOML
pub fn parse_table(source_name: &str, toml_str: &str) -> ConfigResult<LanguageDefaults> {
    let config: LanguageConfig = toml::from_str(toml_str).map_err(|error| ConfigError::Parse {
        source_name: source_name.to_string(),
        error,
    })?;

    LanguageDefaults::from_config(&config)
}

/// Load a language table from a TOML file
pub fn load_file(path: impl AsRef<Path>) -> ConfigResult<LanguageDefaults> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
        path: path.to_path_buf(),
        error,
    })?;

    let defaults = parse_table(&path.display().to_string(), &content)?;
    log::debug!(
        "Loaded {} language table from {}",
        defaults.language(),
        path.display()
    );
    Ok(defaults)
}

impl LanguageDefaults {
    /// Parse and validate a table from TOML
    pub fn from_toml_str(source_name: &str, toml_str: &str) -> ConfigResult<Self> {
        parse_table(source_name, toml_str)
    }
}

impl LanguageTables {
    /// Shared embedded tables
    pub fn embedded() -> &'static LanguageTables {
        embedded()
    }

    /// A copy of the embedded tables, ready to extend
    pub fn with_embedded() -> Self {
        embedded().clone()
    }

    /// Load a file and add it, replacing any table for the same language
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> ConfigResult<()> {
        self.insert(load_file(path)?);
        Ok(())
    }
}
