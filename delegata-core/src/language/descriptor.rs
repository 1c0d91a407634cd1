//! Language descriptions
//!
//! Entities carry a free-form language identifier. Everything that consults
//! a language table first turns it into a typed [`Language`].

use crate::error::DispatchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Languages the engine can describe
///
/// Describing a language does not mean it has a default table; see
/// [`LanguageTables`](super::LanguageTables).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// English
    English,
    /// French
    French,
    /// German
    German,
    /// Spanish
    Spanish,
    /// Italian
    Italian,
    /// Dutch
    Dutch,
    /// Portuguese
    Portuguese,
    /// Russian
    Russian,
    /// Arabic
    Arabic,
    /// Chinese
    Chinese,
    /// Japanese
    Japanese,
}

impl Language {
    /// All describable languages
    pub const ALL: [Language; 11] = [
        Language::English,
        Language::French,
        Language::German,
        Language::Spanish,
        Language::Italian,
        Language::Dutch,
        Language::Portuguese,
        Language::Russian,
        Language::Arabic,
        Language::Chinese,
        Language::Japanese,
    ];

    /// Describe a language from an ISO 639-1 code, ISO 639-3 code or name
    pub fn describe(id: &str) -> Result<Language, DispatchError> {
        let needle = id.trim().to_lowercase();
        Language::ALL
            .into_iter()
            .find(|lang| {
                lang.code() == needle
                    || lang.iso639_3() == needle
                    || lang.name().to_lowercase() == needle
            })
            .ok_or_else(|| DispatchError::UnsupportedLanguage {
                language: id.to_string(),
            })
    }

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Italian => "it",
            Language::Dutch => "nl",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Arabic => "ar",
            Language::Chinese => "zh",
            Language::Japanese => "ja",
        }
    }

    /// ISO 639-3 code
    pub fn iso639_3(&self) -> &'static str {
        match self {
            Language::English => "eng",
            Language::French => "fra",
            Language::German => "deu",
            Language::Spanish => "spa",
            Language::Italian => "ita",
            Language::Dutch => "nld",
            Language::Portuguese => "por",
            Language::Russian => "rus",
            Language::Arabic => "ara",
            Language::Chinese => "zho",
            Language::Japanese => "jpn",
        }
    }

    /// Canonical English name
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::German => "German",
            Language::Spanish => "Spanish",
            Language::Italian => "Italian",
            Language::Dutch => "Dutch",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Arabic => "Arabic",
            Language::Chinese => "Chinese",
            Language::Japanese => "Japanese",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Language {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::describe(s)
    }
}
