//! Value types shared by the registry, the language tables and the dispatcher

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Result values produced by delegates and stored as features
pub type Value = serde_json::Value;

/// Option bundle passed to delegates
pub type Options = serde_json::Map<String, Value>;

/// Identifier of a concrete delegate implementation (e.g. `stanford`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DelegateId(String);

impl DelegateId {
    /// Caller-side sentinel asking the dispatcher to pick a delegate
    pub const DEFAULT: &'static str = "default";

    /// Table-side sentinel: intentionally no default delegate
    pub const NONE: &'static str = "none";

    /// Create an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for `default`, which callers use instead of omitting the delegate
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    /// True for `none`, the explicit "no default" marker
    pub fn is_none(&self) -> bool {
        self.0 == Self::NONE
    }

    /// True for either reserved sentinel
    pub fn is_reserved(&self) -> bool {
        self.is_default() || self.is_none()
    }
}

impl fmt::Display for DelegateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DelegateId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DelegateId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for DelegateId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Category a capability group belongs to in the language tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    /// Information extraction (time, topics, named entities)
    Extractors,
    /// Structural processing (tokenizing, parsing, segmenting)
    Processors,
    /// Word-level lexical information (tags, synsets)
    Lexicalizers,
    /// Morphology (stems, conjugations, declensions)
    Inflectors,
}

impl Kind {
    /// All kinds, in table order
    pub const ALL: [Kind; 4] = [
        Kind::Extractors,
        Kind::Processors,
        Kind::Lexicalizers,
        Kind::Inflectors,
    ];

    /// Section name used in configuration files
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Extractors => "extractors",
            Kind::Processors => "processors",
            Kind::Lexicalizers => "lexicalizers",
            Kind::Inflectors => "inflectors",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Kind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown group kind: {s}"))
    }
}

/// Whether a group's results are cached on the entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Results are stored as named features
    #[default]
    Annotator,
    /// Results are returned only
    Plain,
}

/// How a group picks a delegate when the caller names none
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DefaultDelegate {
    /// Consult the language default table
    #[default]
    Language,
    /// Always use this delegate
    Fixed(DelegateId),
    /// Callers must name a delegate explicitly
    Forbidden,
}

impl DefaultDelegate {
    /// Parse the optional `default` entry of a group definition
    pub fn from_config(value: Option<&str>) -> Self {
        match value {
            None => DefaultDelegate::Language,
            Some(DelegateId::NONE) => DefaultDelegate::Forbidden,
            Some(id) => DefaultDelegate::Fixed(DelegateId::new(id)),
        }
    }
}

/// Merge a preset bundle with caller options; caller values win
pub fn merge_options(preset: &Options, caller: Options) -> Options {
    let mut merged = preset.clone();
    merged.extend(caller);
    merged
}

/// Arguments of one operation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Call {
    /// Explicit delegate, `None` (or `default`) to resolve one
    pub delegate: Option<DelegateId>,
    /// Decorator to apply to the raw result
    pub decorator: Option<String>,
    /// Options forwarded to the delegate
    pub options: Options,
}

impl Call {
    /// A call with no delegate, decorator or options
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the delegate explicitly
    pub fn delegate(mut self, id: impl Into<DelegateId>) -> Self {
        self.delegate = Some(id.into());
        self
    }

    /// Request a decorator
    pub fn decorator(mut self, name: impl Into<String>) -> Self {
        self.decorator = Some(name.into());
        self
    }

    /// Set one option
    pub fn option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Replace all options
    pub fn options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}
