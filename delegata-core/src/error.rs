//! Layered error types
//!
//! `DispatchError` is raised when an operation is called; `ConfigError` when
//! registries, language tables or the operation table are assembled.

use crate::types::{DelegateId, Kind};
use std::path::PathBuf;
use thiserror::Error;

/// Error returned by a concrete delegate, passed through unmodified
pub type DelegateError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while dispatching an operation
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The entity's language is unknown or has no default table
    #[error("language '{language}' is not supported (yet)")]
    UnsupportedLanguage {
        /// The language identifier carried by the entity
        language: String,
    },

    /// The language has a table but no default chain for the group
    #[error("no delegate to find {group} ({kind}) is available for the {language} language")]
    NoDefaultForCategory {
        /// Canonical language name
        language: String,
        /// Group category
        kind: Kind,
        /// Group name within the category
        group: String,
    },

    /// The group intentionally has no default delegate
    #[error("there is intentionally no default delegate for {group}; name one explicitly")]
    NoDefaultAvailable {
        /// Group name
        group: String,
    },

    /// The requested delegate is not part of the group
    #[error(
        "delegate '{delegate}' couldn't be found in group {group}.{}",
        did_you_mean(.suggestions)
    )]
    DelegateNotFound {
        /// The identifier that was requested or resolved
        delegate: DelegateId,
        /// Group name
        group: String,
        /// Close matches among the group's delegates
        suggestions: Vec<DelegateId>,
    },

    /// No operation with that name is installed
    #[error("no operation named '{name}' is installed")]
    UnknownOperation {
        /// Requested operation name
        name: String,
    },

    /// The group has no decorator with that name
    #[error("group {group} has no decorator named '{decorator}'")]
    UnknownDecorator {
        /// Group name
        group: String,
        /// Requested decorator
        decorator: String,
    },

    /// Failure inside a concrete delegate, preprocessor or decorator
    #[error(transparent)]
    Delegate(DelegateError),
}

fn did_you_mean(suggestions: &[DelegateId]) -> String {
    match suggestions {
        [] => String::new(),
        [only] => format!(" Did you mean '{only}'?"),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(|s| format!("'{s}'"))
                .collect::<Vec<_>>()
                .join(", ");
            format!(" Did you mean {head} or '{last}'?")
        }
    }
}

/// Errors raised while loading or assembling configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// TOML could not be parsed
    #[error("failed to parse {source_name}: {error}")]
    Parse {
        /// File path or embedded table name
        source_name: String,
        /// Parser error
        #[source]
        error: toml::de::Error,
    },

    /// File could not be read
    #[error("failed to read {}: {error}", .path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        error: std::io::Error,
    },

    /// Language table names an unknown language
    #[error("language table declares unknown language '{code}'")]
    UnknownLanguage {
        /// Declared code
        code: String,
    },

    /// Language table has an empty default chain
    #[error("empty default chain for {kind}.{group} in the {language} table")]
    EmptyDefaultChain {
        /// Canonical language name
        language: String,
        /// Group category
        kind: Kind,
        /// Group name
        group: String,
    },

    /// Two groups share a canonical method name
    #[error("capability '{method}' is registered twice")]
    DuplicateGroup {
        /// Method name
        method: String,
    },

    /// Two installed operations share a name
    #[error("operation '{name}' is defined by both {first} and {second}")]
    DuplicateOperation {
        /// Operation name
        name: String,
        /// Group that installed it first
        first: String,
        /// Group that tried to install it again
        second: String,
    },

    /// A preset, preprocessor or decorator reuses a name within its group
    #[error("name '{name}' is used more than once in group {group}")]
    NameClash {
        /// Group name
        group: String,
        /// Clashing name
        name: String,
    },

    /// Group has no delegates but still expects a default
    #[error("group {group} lists no delegates")]
    EmptyDelegateList {
        /// Group name
        group: String,
    },

    /// Fixed default is not one of the group's delegates
    #[error("default delegate '{delegate}' is not listed in group {group}")]
    UnknownDefault {
        /// Group name
        group: String,
        /// Configured default
        delegate: DelegateId,
    },

    /// Delegate list uses `default` or `none`
    #[error("group {group} lists reserved identifier '{delegate}'")]
    ReservedDelegate {
        /// Group name
        group: String,
        /// Reserved identifier
        delegate: DelegateId,
    },

    /// A listed delegate has no implementation in the catalogue
    #[error("delegate '{delegate}' of group {group} has no implementation")]
    UnresolvedDelegate {
        /// Group name
        group: String,
        /// Listed identifier
        delegate: DelegateId,
    },
}

/// Result type for dispatch operations
pub type Result<T> = std::result::Result<T, DispatchError>;

/// Result type for configuration
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
