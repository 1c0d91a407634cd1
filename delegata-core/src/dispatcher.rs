//! Delegate resolution, invocation, decoration and caching for one group
//!
//! Resolution order when the caller names no delegate:
//! 1. the group's fixed default
//! 2. the primary entry of the language table for the entity's language
//!
//! A cached feature short-circuits everything, including an explicit
//! delegate argument. Use [`FeatureStore::remove`](crate::FeatureStore::remove)
//! or [`Capabilities::invalidate`](crate::Capabilities::invalidate) to
//! recompute with a different delegate.

use crate::{
    catalog::{Delegate, DelegateLookup},
    error::{ConfigError, ConfigResult, DispatchError, Result},
    feature_store::Entity,
    language::LanguageTables,
    registry::CapabilityGroup,
    suggest,
    types::{DefaultDelegate, DelegateId, Options, Value},
};
use std::collections::HashMap;
use std::sync::Arc;

/// Dispatcher bound to one capability group
pub struct Dispatcher<E> {
    group: CapabilityGroup<E>,
    implementations: HashMap<DelegateId, Arc<dyn Delegate<E>>>,
    languages: Arc<LanguageTables>,
}

impl<E> std::fmt::Debug for Dispatcher<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("group", &self.group)
            .field("languages", &self.languages.languages())
            .finish()
    }
}

impl<E: Entity> Dispatcher<E> {
    /// Bind a group, resolving every listed delegate through `lookup`
    pub fn new(
        group: CapabilityGroup<E>,
        lookup: &dyn DelegateLookup<E>,
        languages: Arc<LanguageTables>,
    ) -> ConfigResult<Self> {
        let mut implementations = HashMap::with_capacity(group.delegates().len());
        for id in group.delegates() {
            let implementation =
                lookup
                    .lookup(&group, id)
                    .ok_or_else(|| ConfigError::UnresolvedDelegate {
                        group: group.name().to_string(),
                        delegate: id.clone(),
                    })?;
            implementations.insert(id.clone(), implementation);
        }

        Ok(Self {
            group,
            implementations,
            languages,
        })
    }

    /// The bound group
    pub fn group(&self) -> &CapabilityGroup<E> {
        &self.group
    }

    /// Compute the group's feature for `entity`
    ///
    /// `delegate` of `None` or `default` resolves one. With a `decorator`
    /// the decorated result is returned and, for annotators, cached under
    /// the decorator's name instead of the method name.
    pub fn dispatch(
        &self,
        entity: &E,
        delegate: Option<&DelegateId>,
        decorator: Option<&str>,
        options: &Options,
    ) -> Result<Value> {
        let method = self.group.method();
        let features = entity.features();
        let _guard = features.lock();

        if let Some(cached) = features.get(method) {
            log::trace!("Feature '{method}' served from cache");
            return Ok(cached);
        }

        let decorate = match decorator {
            Some(name) => Some(self.group.decorator(name).ok_or_else(|| {
                DispatchError::UnknownDecorator {
                    group: self.group.name().to_string(),
                    decorator: name.to_string(),
                }
            })?),
            None => None,
        };

        let id = match delegate {
            Some(id) if !id.is_default() => id.clone(),
            _ => self.resolve_missing_delegate(entity)?,
        };
        let implementation = self.implementation(&id)?;

        log::debug!("Dispatching '{method}' to delegate '{id}'");
        let raw = implementation
            .invoke(entity, options)
            .map_err(DispatchError::Delegate)?;

        let result = match decorate {
            Some(transform) => transform(entity, raw).map_err(DispatchError::Delegate)?,
            None => raw,
        };

        if self.group.is_annotator() {
            features.store(decorator.unwrap_or(method), result.clone());
        }

        Ok(result)
    }

    /// Delegate to use when the caller names none
    pub fn resolve_missing_delegate(&self, entity: &E) -> Result<DelegateId> {
        let id = match self.group.default_delegate() {
            DefaultDelegate::Fixed(id) => id.clone(),
            DefaultDelegate::Forbidden => DelegateId::new(DelegateId::NONE),
            DefaultDelegate::Language => self.languages.resolve_default(
                entity.language(),
                self.group.kind(),
                self.group.name(),
            )?,
        };

        if id.is_none() {
            return Err(DispatchError::NoDefaultAvailable {
                group: self.group.name().to_string(),
            });
        }
        Ok(id)
    }

    fn implementation(&self, id: &DelegateId) -> Result<&Arc<dyn Delegate<E>>> {
        self.implementations
            .get(id)
            .filter(|_| self.group.has_delegate(id))
            .ok_or_else(|| DispatchError::DelegateNotFound {
                delegate: id.clone(),
                group: self.group.name().to_string(),
                suggestions: suggest::did_you_mean(self.group.delegates(), id.as_str()),
            })
    }
}
