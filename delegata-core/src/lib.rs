//! Delegate dispatch engine for annotating text entities
//!
//! A capability (tokenizing, parsing, stemming, ...) is declared once as a
//! [`CapabilityGroup`] listing interchangeable delegates. Calling the
//! capability on an entity picks a delegate, runs it, optionally decorates
//! the result and caches it on the entity as a named feature.
//!
//! # Architecture
//!
//! - **Registry**: capability groups, built in code or from TOML
//! - **Language tables**: ordered default delegates per language
//! - **Dispatcher**: resolution, invocation, decoration and caching
//! - **Installer**: compiles groups into a table of named operations
//!
//! # Example
//!
//! ```rust
//! use delegata_core::{
//!     Call, Capabilities, CapabilityGroup, Catalog, DelegateError, Entity, FeatureStore, Kind,
//!     Options, Registry, Value,
//! };
//! use serde_json::json;
//!
//! struct Sentence {
//!     text: String,
//!     features: FeatureStore,
//! }
//!
//! impl Entity for Sentence {
//!     fn language(&self) -> &str {
//!         "en"
//!     }
//!
//!     fn features(&self) -> &FeatureStore {
//!         &self.features
//!     }
//! }
//!
//! fn whitespace(sentence: &Sentence, _options: &Options) -> Result<Value, DelegateError> {
//!     Ok(json!(sentence.text.split_whitespace().collect::<Vec<_>>()))
//! }
//!
//! let tokenizers = CapabilityGroup::<Sentence>::builder("tokenize", "tokenizers", Kind::Processors)
//!     .delegates(["macintyre", "punkt"])
//!     .build()
//!     .unwrap();
//!
//! let capabilities = Capabilities::builder()
//!     .registry(Registry::new().with(tokenizers).unwrap())
//!     .catalog(
//!         Catalog::new()
//!             .with("tokenize", "macintyre", whitespace)
//!             .with("tokenize", "punkt", whitespace),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let sentence = Sentence {
//!     text: "Hello world.".to_string(),
//!     features: FeatureStore::new(),
//! };
//!
//! // English tokenizers default to macintyre
//! let tokens = capabilities.call(&sentence, "tokenize", Call::new()).unwrap();
//! assert_eq!(tokens, json!(["Hello", "world."]));
//! assert!(sentence.features.contains("tokenize"));
//! ```

pub mod catalog;
pub mod dispatcher;
pub mod error;
pub mod feature_store;
pub mod installer;
pub mod language;
pub mod registry;
pub mod suggest;
pub mod types;

pub use catalog::{Catalog, Delegate, DelegateLookup};
pub use dispatcher::Dispatcher;
pub use error::{ConfigError, ConfigResult, DelegateError, DispatchError, Result};
pub use feature_store::{ComputeGuard, Entity, FeatureStore};
pub use installer::{Capabilities, CapabilitiesBuilder, OperationInfo, OperationKind};
pub use language::{Language, LanguageDefaults, LanguageTables};
pub use registry::{CapabilityGroup, CapabilityGroupBuilder, GroupConfig, Registry, RegistryConfig};
pub use types::{Call, Classification, DefaultDelegate, DelegateId, Kind, Options, Value};
