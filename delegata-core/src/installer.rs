//! Installs the operations of every registered group
//!
//! Each group contributes:
//! - its base method
//! - one operation per preset (options merged, result relabelled)
//! - one operation per preprocessor (transform instead of delegation)
//! - one operation per decorator (base method with the decorator applied)

use crate::{
    catalog::{Catalog, DelegateLookup},
    dispatcher::Dispatcher,
    error::{ConfigError, ConfigResult, DispatchError, Result},
    feature_store::Entity,
    language::LanguageTables,
    registry::{CapabilityGroup, Preprocessor, Registry},
    types::{merge_options, Call, Options, Value},
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// What an installed operation does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// The group's canonical method
    Base,
    /// Base method with a fixed option bundle, cached under its own name
    Preset,
    /// Transform computed without delegate resolution
    Preprocessor,
    /// Base method with a decorator applied
    Decorated,
}

impl OperationKind {
    /// Lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Base => "base",
            OperationKind::Preset => "preset",
            OperationKind::Preprocessor => "preprocessor",
            OperationKind::Decorated => "decorated",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum Action<E> {
    Base,
    Preset(Options),
    Preprocessor(Preprocessor<E>),
    Decorated,
}

struct Operation<E> {
    name: String,
    dispatcher: Arc<Dispatcher<E>>,
    action: Action<E>,
}

impl<E: Entity> Operation<E> {
    fn kind(&self) -> OperationKind {
        match self.action {
            Action::Base => OperationKind::Base,
            Action::Preset(_) => OperationKind::Preset,
            Action::Preprocessor(_) => OperationKind::Preprocessor,
            Action::Decorated => OperationKind::Decorated,
        }
    }

    fn run(&self, entity: &E, call: Call) -> Result<Value> {
        let dispatcher = &self.dispatcher;
        let method = dispatcher.group().method();

        match &self.action {
            Action::Base => dispatcher.dispatch(
                entity,
                call.delegate.as_ref(),
                call.decorator.as_deref(),
                &call.options,
            ),
            Action::Preset(bundle) => {
                let options = merge_options(bundle, call.options);
                let features = entity.features();
                let _guard = features.lock();

                let result = dispatcher.dispatch(
                    entity,
                    call.delegate.as_ref(),
                    call.decorator.as_deref(),
                    &options,
                )?;
                if features.relabel(method, &self.name).is_some() {
                    log::trace!("Feature '{method}' relabelled as '{}'", self.name);
                }
                Ok(result)
            }
            Action::Preprocessor(transform) => {
                let features = entity.features();
                let _guard = features.lock();

                let result = transform(entity, call.delegate.as_ref(), &call.options)
                    .map_err(DispatchError::Delegate)?;
                if dispatcher.group().is_annotator() {
                    features.store(method, result.clone());
                    features.relabel(method, &self.name);
                }
                Ok(result)
            }
            Action::Decorated => dispatcher.dispatch(
                entity,
                call.delegate.as_ref(),
                Some(self.name.as_str()),
                &call.options,
            ),
        }
    }
}

/// Summary of one installed operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationInfo {
    /// Operation name
    pub name: String,
    /// Canonical method of the owning group
    pub method: String,
    /// Group name
    pub group: String,
    /// What the operation does
    pub kind: OperationKind,
}

/// The installed operation table
pub struct Capabilities<E> {
    operations: HashMap<String, Operation<E>>,
    dispatchers: Vec<Arc<Dispatcher<E>>>,
    languages: Arc<LanguageTables>,
}

impl<E> fmt::Debug for Capabilities<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Capabilities")
            .field("operations", &names)
            .field("languages", &self.languages.languages())
            .finish()
    }
}

impl<E: Entity + 'static> Capabilities<E> {
    /// Start assembling a table
    pub fn builder() -> CapabilitiesBuilder<E> {
        CapabilitiesBuilder::new()
    }

    /// Run the operation `name` on `entity`
    pub fn call(&self, entity: &E, name: &str, call: Call) -> Result<Value> {
        let operation =
            self.operations
                .get(name)
                .ok_or_else(|| DispatchError::UnknownOperation {
                    name: name.to_string(),
                })?;
        operation.run(entity, call)
    }

    /// [`call`](Self::call) with default arguments
    pub fn run(&self, entity: &E, name: &str) -> Result<Value> {
        self.call(entity, name, Call::new())
    }

    /// Whether `name` is installed
    pub fn has_operation(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    /// Describe one operation
    pub fn operation(&self, name: &str) -> Option<OperationInfo> {
        self.operations.get(name).map(|operation| OperationInfo {
            name: operation.name.clone(),
            method: operation.dispatcher.group().method().to_string(),
            group: operation.dispatcher.group().name().to_string(),
            kind: operation.kind(),
        })
    }

    /// Every installed operation, sorted by name
    pub fn operations(&self) -> Vec<OperationInfo> {
        let mut names: Vec<&String> = self.operations.keys().collect();
        names.sort_unstable();
        names
            .into_iter()
            .filter_map(|name| self.operation(name))
            .collect()
    }

    /// Installed groups in registration order
    pub fn groups(&self) -> impl Iterator<Item = &CapabilityGroup<E>> {
        self.dispatchers.iter().map(|d| d.group())
    }

    /// Dispatcher of the group with canonical method `method`
    pub fn dispatcher(&self, method: &str) -> Option<&Dispatcher<E>> {
        self.dispatchers
            .iter()
            .find(|d| d.group().method() == method)
            .map(Arc::as_ref)
    }

    /// Language tables used for default resolution
    pub fn languages(&self) -> &LanguageTables {
        &self.languages
    }

    /// Evict the feature cached under `name` so the next call recomputes it
    pub fn invalidate(&self, entity: &E, name: &str) -> Option<Value> {
        let features = entity.features();
        let _guard = features.lock();
        features.remove(name)
    }
}

/// Assembles [`Capabilities`] from a registry, language tables and a catalogue
pub struct CapabilitiesBuilder<E> {
    registry: Registry<E>,
    languages: Option<LanguageTables>,
    lookup: Option<Box<dyn DelegateLookup<E>>>,
}

impl<E> Default for CapabilitiesBuilder<E> {
    fn default() -> Self {
        Self {
            registry: Registry::new(),
            languages: None,
            lookup: None,
        }
    }
}

impl<E: Entity + 'static> CapabilitiesBuilder<E> {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups to install
    pub fn registry(mut self, registry: Registry<E>) -> Self {
        self.registry = registry;
        self
    }

    /// Language tables; the embedded tables are used when unset
    pub fn languages(mut self, languages: LanguageTables) -> Self {
        self.languages = Some(languages);
        self
    }

    /// Delegate implementations
    pub fn lookup(mut self, lookup: impl DelegateLookup<E> + 'static) -> Self {
        self.lookup = Some(Box::new(lookup));
        self
    }

    /// Shorthand for [`lookup`](Self::lookup) with a [`Catalog`]
    pub fn catalog(self, catalog: Catalog<E>) -> Self {
        self.lookup(catalog)
    }

    /// Resolve every delegate and install every operation
    pub fn build(self) -> ConfigResult<Capabilities<E>> {
        let languages = Arc::new(self.languages.unwrap_or_else(LanguageTables::with_embedded));
        let lookup = self
            .lookup
            .unwrap_or_else(|| Box::new(Catalog::<E>::new()));

        let mut operations: HashMap<String, Operation<E>> = HashMap::new();
        let mut dispatchers = Vec::with_capacity(self.registry.len());

        for group in self.registry.groups() {
            let dispatcher = Arc::new(Dispatcher::new(
                group.clone(),
                lookup.as_ref(),
                languages.clone(),
            )?);

            let mut actions: BTreeMap<String, Action<E>> = BTreeMap::new();
            actions.insert(group.method().to_string(), Action::Base);
            for (name, bundle) in group.presets() {
                actions.insert(name.clone(), Action::Preset(bundle.clone()));
            }
            for name in group.preprocessor_names() {
                if let Some(transform) = group.preprocessor(name) {
                    actions.insert(name.to_string(), Action::Preprocessor(transform.clone()));
                }
            }
            for name in group.decorator_names() {
                actions.insert(name.to_string(), Action::Decorated);
            }

            for (name, action) in actions {
                if let Some(existing) = operations.get(&name) {
                    return Err(ConfigError::DuplicateOperation {
                        name,
                        first: existing.dispatcher.group().name().to_string(),
                        second: group.name().to_string(),
                    });
                }
                operations.insert(
                    name.clone(),
                    Operation {
                        name,
                        dispatcher: dispatcher.clone(),
                        action,
                    },
                );
            }

            log::debug!(
                "Installed group {} with delegates [{}]",
                group.name(),
                group
                    .delegates()
                    .iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
            dispatchers.push(dispatcher);
        }

        log::info!(
            "Installed {} operations from {} groups",
            operations.len(),
            dispatchers.len()
        );

        Ok(Capabilities {
            operations,
            dispatchers,
            languages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::DelegateError,
        feature_store::FeatureStore,
        types::{DelegateId, Kind},
    };
    use serde_json::json;

    struct Word {
        text: String,
        features: FeatureStore,
    }

    impl Word {
        fn new(text: &str) -> Self {
            Self {
                text: text.to_string(),
                features: FeatureStore::new(),
            }
        }
    }

    impl Entity for Word {
        fn language(&self) -> &str {
            "en"
        }

        fn features(&self) -> &FeatureStore {
            &self.features
        }
    }

    fn echo_options(_word: &Word, options: &Options) -> std::result::Result<Value, DelegateError> {
        Ok(Value::Object(options.clone()))
    }

    fn capabilities() -> Capabilities<Word> {
        let tag = CapabilityGroup::builder("tag", "tag", Kind::Lexicalizers)
            .delegates(["brill", "stanford"])
            .preset("fast_tag", json!({"x": 1, "y": 2}).as_object().cloned().unwrap())
            .preprocessor(
                "pretag",
                |word: &Word, _delegate: Option<&DelegateId>, _options: &Options| {
                    Ok(json!(format!("{}/NN", word.text)))
                },
            )
            .decorator("tally", |_word: &Word, raw: Value| {
                Ok(json!(raw.as_object().map(|o| o.len()).unwrap_or(0)))
            })
            .build()
            .unwrap();
        let catalog = Catalog::new()
            .with("tag", "brill", echo_options)
            .with("tag", "stanford", echo_options);

        Capabilities::builder()
            .registry(Registry::new().with(tag).unwrap())
            .catalog(catalog)
            .build()
            .unwrap()
    }

    #[test]
    fn test_operations_installed() {
        let caps = capabilities();
        let names: Vec<String> = caps.operations().into_iter().map(|o| o.name).collect();
        assert_eq!(names, vec!["fast_tag", "pretag", "tag", "tally"]);
        assert_eq!(caps.operation("pretag").unwrap().kind, OperationKind::Preprocessor);
        assert!(caps.dispatcher("tag").is_some());
    }

    #[test]
    fn test_preset_merges_and_relabels() {
        let caps = capabilities();
        let word = Word::new("run");
        let value = caps
            .call(&word, "fast_tag", Call::new().delegate("brill").option("y", 3))
            .unwrap();
        assert_eq!(value, json!({"x": 1, "y": 3}));
        assert_eq!(word.features.get("fast_tag"), Some(json!({"x": 1, "y": 3})));
        assert!(!word.features.contains("tag"));
    }

    #[test]
    fn test_preprocessor_stores_under_own_name() {
        let caps = capabilities();
        let word = Word::new("run");
        let value = caps.run(&word, "pretag").unwrap();
        assert_eq!(value, json!("run/NN"));
        assert_eq!(word.features.names(), vec!["pretag".to_string()]);
    }

    #[test]
    fn test_decorated_operation() {
        let caps = capabilities();
        let word = Word::new("run");
        let value = caps
            .call(&word, "tally", Call::new().delegate("stanford").option("a", 1))
            .unwrap();
        assert_eq!(value, json!(1));
        assert_eq!(word.features.get("tally"), Some(json!(1)));
    }

    #[test]
    fn test_unknown_operation() {
        let caps = capabilities();
        assert!(matches!(
            caps.run(&Word::new("run"), "lemmatize"),
            Err(DispatchError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn test_invalidate_allows_recompute() {
        let caps = capabilities();
        let word = Word::new("run");
        caps.call(&word, "tag", Call::new().delegate("brill").option("k", 1))
            .unwrap();
        let cached = caps
            .call(&word, "tag", Call::new().delegate("stanford"))
            .unwrap();
        assert_eq!(cached, json!({"k": 1}));

        assert!(caps.invalidate(&word, "tag").is_some());
        let fresh = caps
            .call(&word, "tag", Call::new().delegate("stanford"))
            .unwrap();
        assert_eq!(fresh, json!({}));
    }

    #[test]
    fn test_invalidate_unknown_name_is_noop() {
        let caps = capabilities();
        let word = Word::new("run");
        caps.run(&word, "pretag").unwrap();

        for name in ["lemmatize", "tag", "no such feature"] {
            assert!(caps.invalidate(&word, name).is_none());
        }
        assert_eq!(word.features.names(), vec!["pretag".to_string()]);
        assert_eq!(caps.run(&word, "pretag").unwrap(), json!("run/NN"));
    }

    #[test]
    fn test_duplicate_operation_across_groups() {
        let first = CapabilityGroup::<Word>::builder("stem", "stem", Kind::Inflectors)
            .delegates(["porter"])
            .decorator("normalize", |_word: &Word, raw: Value| Ok(raw))
            .build()
            .unwrap();
        let second = CapabilityGroup::<Word>::builder("normalize", "normalizers", Kind::Inflectors)
            .delegates(["porter"])
            .build()
            .unwrap();
        let catalog = Catalog::new()
            .with("stem", "porter", echo_options)
            .with("normalize", "porter", echo_options);

        let result = Capabilities::builder()
            .registry(Registry::new().with(first).unwrap().with(second).unwrap())
            .catalog(catalog)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::DuplicateOperation { name, .. }) if name == "normalize"
        ));
    }

    #[test]
    fn test_missing_catalog_entry() {
        let group = CapabilityGroup::<Word>::builder("stem", "stem", Kind::Inflectors)
            .delegates(["porter"])
            .build()
            .unwrap();
        let result = Capabilities::builder()
            .registry(Registry::new().with(group).unwrap())
            .build();
        assert!(matches!(result, Err(ConfigError::UnresolvedDelegate { .. })));
    }
}
