//! Default delegate tables per language

use crate::{
    error::{ConfigResult, DispatchError, Result},
    language::{config::LanguageConfig, Language},
    types::{DelegateId, Kind},
};
use std::collections::{HashMap, HashSet};

/// Default delegate chains for one language
#[derive(Debug, Clone)]
pub struct LanguageDefaults {
    language: Language,
    chains: HashMap<Kind, HashMap<String, Vec<DelegateId>>>,
    common_words: HashSet<String>,
}

impl LanguageDefaults {
    /// An empty table for `language`
    pub fn new(language: Language) -> Self {
        Self {
            language,
            chains: HashMap::new(),
            common_words: HashSet::new(),
        }
    }

    /// Build from a validated configuration
    pub fn from_config(config: &LanguageConfig) -> ConfigResult<Self> {
        let language = config.validate()?;
        let mut defaults = Self::new(language);

        for kind in Kind::ALL {
            for (group, chain) in config.section(kind) {
                defaults = defaults.with_chain(
                    kind,
                    group.clone(),
                    chain.iter().map(|id| DelegateId::new(id.as_str())),
                );
            }
        }
        defaults.common_words = config
            .common_words
            .words
            .iter()
            .map(|w| w.to_lowercase())
            .collect();

        Ok(defaults)
    }

    /// Set the chain for one group
    pub fn with_chain<I>(mut self, kind: Kind, group: impl Into<String>, chain: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<DelegateId>,
    {
        self.chains
            .entry(kind)
            .or_default()
            .insert(group.into(), chain.into_iter().map(Into::into).collect());
        self
    }

    /// Language this table belongs to
    pub fn language(&self) -> Language {
        self.language
    }

    /// Ordered chain for a group, if configured
    pub fn chain(&self, kind: Kind, group: &str) -> Option<&[DelegateId]> {
        self.chains
            .get(&kind)
            .and_then(|groups| groups.get(group))
            .map(Vec::as_slice)
    }

    /// Group names configured for a kind, sorted
    pub fn groups(&self, kind: Kind) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .chains
            .get(&kind)
            .map(|groups| groups.keys().map(String::as_str).collect())
            .unwrap_or_default();
        names.sort_unstable();
        names
    }

    /// Primary default for a group
    pub fn primary(&self, kind: Kind, group: &str) -> Result<&DelegateId> {
        self.chain(kind, group)
            .and_then(|chain| chain.first())
            .ok_or_else(|| DispatchError::NoDefaultForCategory {
                language: self.language.name().to_string(),
                kind,
                group: group.to_string(),
            })
    }

    /// Whether `word` is one of the language's most frequent words
    pub fn is_common_word(&self, word: &str) -> bool {
        self.common_words.contains(&word.to_lowercase())
    }
}

/// All language tables known to an engine
#[derive(Debug, Clone, Default)]
pub struct LanguageTables {
    tables: HashMap<Language, LanguageDefaults>,
}

impl LanguageTables {
    /// No languages
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a language table
    pub fn insert(&mut self, defaults: LanguageDefaults) -> Option<LanguageDefaults> {
        self.tables.insert(defaults.language(), defaults)
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, defaults: LanguageDefaults) -> Self {
        self.insert(defaults);
        self
    }

    /// Table for a language identifier
    pub fn get(&self, language_id: &str) -> Result<&LanguageDefaults> {
        let language = Language::describe(language_id)?;
        self.tables
            .get(&language)
            .ok_or_else(|| DispatchError::UnsupportedLanguage {
                language: language.name().to_string(),
            })
    }

    /// Languages with a table, sorted
    pub fn languages(&self) -> Vec<Language> {
        let mut languages: Vec<Language> = self.tables.keys().copied().collect();
        languages.sort();
        languages
    }

    /// Whether the language identifier has a table
    pub fn supports(&self, language_id: &str) -> bool {
        self.get(language_id).is_ok()
    }

    /// Full chain for a group in a language
    pub fn chain(&self, language_id: &str, kind: Kind, group: &str) -> Result<&[DelegateId]> {
        let table = self.get(language_id)?;
        match table.chain(kind, group) {
            Some(chain) if !chain.is_empty() => Ok(chain),
            _ => Err(DispatchError::NoDefaultForCategory {
                language: table.language().name().to_string(),
                kind,
                group: group.to_string(),
            }),
        }
    }

    /// First delegate of the chain; later entries are never tried
    pub fn resolve_default(&self, language_id: &str, kind: Kind, group: &str) -> Result<DelegateId> {
        self.get(language_id)?.primary(kind, group).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn english() -> LanguageDefaults {
        LanguageDefaults::new(Language::English)
            .with_chain(Kind::Processors, "tokenizers", ["macintyre", "punkt"])
            .with_chain(Kind::Processors, "parsers", ["stanford", "enju"])
            .with_chain(Kind::Inflectors, "stem", ["porter"])
            .with_chain(Kind::Extractors, "roles", Vec::<DelegateId>::new())
    }

    #[test]
    fn test_resolve_primary() {
        let tables = LanguageTables::new().with(english());
        let id = tables
            .resolve_default("english", Kind::Processors, "tokenizers")
            .unwrap();
        assert_eq!(id.as_str(), "macintyre");

        let id = tables.resolve_default("en", Kind::Inflectors, "stem").unwrap();
        assert_eq!(id.as_str(), "porter");
    }

    #[test]
    fn test_unknown_language() {
        let tables = LanguageTables::new().with(english());
        assert!(matches!(
            tables.resolve_default("klingon", Kind::Processors, "tokenizers"),
            Err(DispatchError::UnsupportedLanguage { .. })
        ));
    }

    #[test]
    fn test_known_language_without_table() {
        let tables = LanguageTables::new().with(english());
        match tables.resolve_default("fr", Kind::Processors, "tokenizers") {
            Err(DispatchError::UnsupportedLanguage { language }) => assert_eq!(language, "French"),
            other => panic!("Expected UnsupportedLanguage, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_or_empty_chain() {
        let tables = LanguageTables::new().with(english());
        assert!(matches!(
            tables.resolve_default("en", Kind::Lexicalizers, "tag"),
            Err(DispatchError::NoDefaultForCategory { kind: Kind::Lexicalizers, .. })
        ));
        assert!(matches!(
            tables.resolve_default("en", Kind::Extractors, "roles"),
            Err(DispatchError::NoDefaultForCategory { .. })
        ));
        assert!(tables.chain("en", Kind::Extractors, "roles").is_err());
    }

    #[test]
    fn test_groups_and_languages() {
        let tables = LanguageTables::new().with(english());
        let table = tables.get("en").unwrap();
        assert_eq!(table.groups(Kind::Processors), vec!["parsers", "tokenizers"]);
        assert_eq!(tables.languages(), vec![Language::English]);
        assert!(tables.supports("eng"));
        assert!(!tables.supports("ja"));
    }
}
