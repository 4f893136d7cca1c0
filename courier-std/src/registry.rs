//! Handler registry.
//!
//! This module provides a builder that turns a finalized list of
//! [`HandlerDescriptor`]s into a frozen [`Registry`], an immutable
//! key-to-entry mapping that can be shared across tasks without locking.

use crate::{
    descriptor::{HandlerDescriptor, HandlerKind, SharedFilter},
    unwind::{contain, contain_sync},
};
use courier_core::{
    CommandKey, ConfigurationError, Filter, HandlerError, HandlerInfo, KeyComparer, KeyedMessage,
    NaturalEq, RawKey,
};
use std::{any::type_name, collections::HashMap, sync::Arc};

// ============================================================================
// HandlerEntry - one resolved command
// ============================================================================

/// A registered command: its identity, its handler and its filter chain.
///
/// Global filters precede the handler's own filters.
pub struct HandlerEntry<S: ?Sized, M: KeyedMessage> {
    info: HandlerInfo<M::Key>,
    kind: HandlerKind<S, M>,
    filters: Vec<SharedFilter<S, M>>,
}

impl<S, M> HandlerEntry<S, M>
where
    S: ?Sized + Sync + 'static,
    M: KeyedMessage,
{
    /// Key, name and variant of this command.
    pub fn info(&self) -> &HandlerInfo<M::Key> {
        &self.info
    }

    /// The key this command is registered under.
    pub fn key(&self) -> &M::Key {
        self.info.key()
    }

    /// The command name.
    pub fn name(&self) -> &str {
        self.info.name()
    }

    /// The handler variant.
    pub fn kind(&self) -> &HandlerKind<S, M> {
        &self.kind
    }

    /// The ordered filter list.
    pub fn filters(&self) -> &[SharedFilter<S, M>] {
        &self.filters
    }

    /// Run the handler once, containing errors and panics.
    pub async fn invoke(&self, session: &S, message: &M) -> Result<(), HandlerError> {
        let result = match &self.kind {
            HandlerKind::Async(provider) => {
                contain(async move {
                    let handler = provider.acquire();
                    handler.execute_dyn(session, message).await
                })
                .await
            }
            HandlerKind::Sync(provider) => {
                contain_sync(|| provider.acquire().execute(session, message))
            }
        };

        match result {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => Err(HandlerError::Failed(error)),
            Err(panic) => Err(HandlerError::Panicked(panic)),
        }
    }
}

// ============================================================================
// RegistryBuilder - for constructing registries
// ============================================================================

/// Builder for constructing a [`Registry`].
///
/// Collect descriptors and global filters, then call `.build()` to resolve
/// every command's key and freeze the mapping.
///
/// # Example
/// ```ignore
/// let registry = RegistryBuilder::new()
///     .global_filter(LoggingFilter::new())
///     .register(HandlerDescriptor::sync(Echo))
///     .register(HandlerDescriptor::from_async(Login).keyed("LOGIN"))
///     .build()?;
/// ```
pub struct RegistryBuilder<S: ?Sized, M: KeyedMessage> {
    descriptors: Vec<HandlerDescriptor<S, M>>,
    global_filters: Vec<SharedFilter<S, M>>,
    comparer: Arc<dyn KeyComparer<M::Key>>,
}

impl<S, M> RegistryBuilder<S, M>
where
    S: ?Sized + Sync + 'static,
    M: KeyedMessage,
{
    /// Create a new empty builder using the key type's natural equality.
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            global_filters: Vec::new(),
            comparer: Arc::new(NaturalEq),
        }
    }

    /// Register a command.
    pub fn register(mut self, descriptor: HandlerDescriptor<S, M>) -> Self {
        self.register_mut(descriptor);
        self
    }

    /// Register a command (mutable version).
    pub fn register_mut(&mut self, descriptor: HandlerDescriptor<S, M>) {
        self.descriptors.push(descriptor);
    }

    /// Register several commands, keeping their order.
    pub fn register_all(
        mut self,
        descriptors: impl IntoIterator<Item = HandlerDescriptor<S, M>>,
    ) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// Add a filter applied to every command, ahead of its own filters.
    pub fn global_filter<F: Filter<S, M>>(self, filter: F) -> Self {
        self.shared_global_filter(Arc::new(filter))
    }

    /// Add an already shared global filter.
    pub fn shared_global_filter(mut self, filter: SharedFilter<S, M>) -> Self {
        self.global_filters.push(filter);
        self
    }

    /// Use a custom key equality policy.
    pub fn comparer<C: KeyComparer<M::Key>>(mut self, comparer: C) -> Self {
        self.comparer = Arc::new(comparer);
        self
    }

    /// Get the number of registered commands.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the builder has no commands.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Build the immutable registry.
    ///
    /// Fails on the first command whose key is missing, cannot be converted,
    /// or collides with an earlier command.
    pub fn build(self) -> Result<Registry<S, M>, ConfigurationError> {
        let Self {
            descriptors,
            global_filters,
            comparer,
        } = self;

        let mut entries: Vec<HandlerEntry<S, M>> = Vec::with_capacity(descriptors.len());
        let mut index: HashMap<M::Key, usize> = HashMap::with_capacity(descriptors.len());

        for descriptor in descriptors {
            let (name, raw_key, kind, own_filters) = descriptor.into_parts();
            let key = resolve_key::<M::Key>(&name, raw_key)?;

            let canonical = comparer.canonicalize(&key).into_owned();
            if let Some(&existing) = index.get(&canonical) {
                return Err(ConfigurationError::DuplicateKey {
                    key: format!("{key:?}"),
                    name,
                    existing: entries[existing].name().to_string(),
                });
            }

            let filters: Vec<SharedFilter<S, M>> = global_filters
                .iter()
                .cloned()
                .chain(own_filters)
                .collect();
            let kind = kind
                .resolve()
                .map_err(|panic| ConfigurationError::FactoryPanicked {
                    name: name.clone(),
                    panic,
                })?;

            #[cfg(feature = "tracing")]
            tracing::debug!(
                command = %name,
                key = ?key,
                mode = ?kind.mode(),
                filters = filters.len(),
                "Registered command"
            );

            index.insert(canonical, entries.len());
            entries.push(HandlerEntry {
                info: HandlerInfo::new(key, name, kind.mode()),
                kind,
                filters,
            });
        }

        #[cfg(feature = "tracing")]
        tracing::info!(commands = entries.len(), "Command registry built");

        Ok(Registry {
            entries,
            index,
            comparer,
        })
    }
}

impl<S, M> Default for RegistryBuilder<S, M>
where
    S: ?Sized + Sync + 'static,
    M: KeyedMessage,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a command's typed key from its explicit raw key or its name.
fn resolve_key<K: CommandKey>(name: &str, raw: Option<RawKey>) -> Result<K, ConfigurationError> {
    let raw = match raw {
        Some(raw) => raw,
        None if K::TEXTUAL => RawKey::Text(name.to_string()),
        None => {
            return Err(ConfigurationError::MissingKey {
                name: name.to_string(),
                key_type: type_name::<K>(),
            });
        }
    };

    K::from_raw(&raw).ok_or_else(|| ConfigurationError::KeyConversion {
        name: name.to_string(),
        raw,
        key_type: type_name::<K>(),
    })
}

// ============================================================================
// Registry - immutable, thread-safe command storage
// ============================================================================

/// An immutable, thread-safe key-to-command mapping.
///
/// Created by calling [`RegistryBuilder::build`]. There is no API to add or
/// remove commands afterwards; share it through an `Arc`.
pub struct Registry<S: ?Sized, M: KeyedMessage> {
    entries: Vec<HandlerEntry<S, M>>,
    index: HashMap<M::Key, usize>,
    comparer: Arc<dyn KeyComparer<M::Key>>,
}

impl<S, M> Registry<S, M>
where
    S: ?Sized + Sync + 'static,
    M: KeyedMessage,
{
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder<S, M> {
        RegistryBuilder::new()
    }

    /// Build a registry in one call.
    pub fn build(
        descriptors: impl IntoIterator<Item = HandlerDescriptor<S, M>>,
        global_filters: impl IntoIterator<Item = SharedFilter<S, M>>,
        comparer: impl KeyComparer<M::Key>,
    ) -> Result<Self, ConfigurationError> {
        let builder = global_filters
            .into_iter()
            .fold(RegistryBuilder::new(), RegistryBuilder::shared_global_filter);
        builder.register_all(descriptors).comparer(comparer).build()
    }

    /// Look up the command for `key` under the registry's comparer.
    pub fn get(&self, key: &M::Key) -> Option<&HandlerEntry<S, M>> {
        let canonical = self.comparer.canonicalize(key);
        self.index
            .get(&*canonical)
            .map(|&position| &self.entries[position])
    }

    /// Whether a command is registered for `key`.
    pub fn contains_key(&self, key: &M::Key) -> bool {
        self.get(key).is_some()
    }

    /// Iterate over commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &HandlerEntry<S, M>> {
        self.entries.iter()
    }

    /// Get the number of commands.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
