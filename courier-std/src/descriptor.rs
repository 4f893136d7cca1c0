//! Handler descriptors: the registration-time description of a command.
//!
//! A descriptor bundles how to obtain the handler, the optional explicit name
//! and key, and the filters declared for that command. Descriptors are
//! consumed once by [`RegistryBuilder::build`](crate::registry::RegistryBuilder::build).

use crate::unwind::contain_sync;
use courier_core::{
    AsyncHandler, CommandMeta, DynAsyncHandler, DynFilter, Filter, InvocationMode, KeyedMessage,
    RawKey, SyncHandler,
};
use std::{any::type_name, sync::Arc};

/// How long a factory-built handler instance lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifetime {
    /// Built once while the registry is constructed and shared by every call.
    #[default]
    Singleton,
    /// Built anew for every dispatch.
    PerCall,
}

/// Factory closure producing a handler instance.
pub type Factory<T> = Arc<dyn Fn() -> Arc<T> + Send + Sync>;

/// Source of a handler instance.
pub enum Provider<T: ?Sized> {
    /// A ready-made instance.
    Shared(Arc<T>),
    /// A factory that has not run yet; resolved into `Shared` at build time.
    Singleton(Factory<T>),
    /// A factory run on every dispatch.
    PerCall(Factory<T>),
}

impl<T: ?Sized> Provider<T> {
    fn from_factory(lifetime: Lifetime, factory: Factory<T>) -> Self {
        match lifetime {
            Lifetime::Singleton => Provider::Singleton(factory),
            Lifetime::PerCall => Provider::PerCall(factory),
        }
    }

    /// Run pending singleton factories, returning the panic message if one
    /// panics.
    pub(crate) fn resolve(self) -> Result<Self, String> {
        match self {
            Provider::Singleton(factory) => contain_sync(factory.as_ref()).map(Provider::Shared),
            other => Ok(other),
        }
    }

    /// Get the instance for one call.
    pub fn acquire(&self) -> Arc<T> {
        match self {
            Provider::Shared(instance) => Arc::clone(instance),
            Provider::Singleton(factory) | Provider::PerCall(factory) => factory(),
        }
    }

    /// The lifetime of instances handed out by [`acquire`](Self::acquire).
    pub fn lifetime(&self) -> Lifetime {
        match self {
            Provider::PerCall(_) => Lifetime::PerCall,
            Provider::Shared(_) | Provider::Singleton(_) => Lifetime::Singleton,
        }
    }
}

/// Exactly one executable handler variant.
pub enum HandlerKind<S: ?Sized, M> {
    /// A synchronous handler.
    Sync(Provider<dyn SyncHandler<S, M>>),
    /// An asynchronous handler.
    Async(Provider<dyn DynAsyncHandler<S, M>>),
}

impl<S: ?Sized, M> HandlerKind<S, M> {
    /// The variant tag.
    pub fn mode(&self) -> InvocationMode {
        match self {
            HandlerKind::Sync(_) => InvocationMode::Sync,
            HandlerKind::Async(_) => InvocationMode::Async,
        }
    }

    pub(crate) fn resolve(self) -> Result<Self, String> {
        match self {
            HandlerKind::Sync(provider) => provider.resolve().map(HandlerKind::Sync),
            HandlerKind::Async(provider) => provider.resolve().map(HandlerKind::Async),
        }
    }
}

/// Shared, type-erased filter.
pub type SharedFilter<S, M> = Arc<dyn DynFilter<S, M>>;

/// Registration-time description of one command.
///
/// # Example
/// ```ignore
/// let descriptors = vec![
///     HandlerDescriptor::sync(Echo).keyed("ECHO"),
///     HandlerDescriptor::from_async(Login::default())
///         .named("LOGIN")
///         .filter(RequireTls),
///     HandlerDescriptor::sync_factory(Lifetime::PerCall, Stats::new),
/// ];
/// ```
pub struct HandlerDescriptor<S: ?Sized, M: KeyedMessage> {
    kind: HandlerKind<S, M>,
    declared_name: String,
    name: Option<String>,
    key: Option<RawKey>,
    filters: Vec<SharedFilter<S, M>>,
}

impl<S, M> HandlerDescriptor<S, M>
where
    S: ?Sized + Sync + 'static,
    M: KeyedMessage,
{
    fn new<H: ?Sized>(kind: HandlerKind<S, M>) -> Self {
        Self {
            kind,
            declared_name: short_type_name::<H>().to_string(),
            name: None,
            key: None,
            filters: Vec::new(),
        }
    }

    /// Describe a synchronous handler instance.
    pub fn sync<H: SyncHandler<S, M>>(handler: H) -> Self {
        let handler: Arc<dyn SyncHandler<S, M>> = Arc::new(handler);
        Self::new::<H>(HandlerKind::Sync(Provider::Shared(handler)))
    }

    /// Describe an asynchronous handler instance.
    pub fn from_async<H: AsyncHandler<S, M>>(handler: H) -> Self {
        let handler: Arc<dyn DynAsyncHandler<S, M>> = Arc::new(handler);
        Self::new::<H>(HandlerKind::Async(Provider::Shared(handler)))
    }

    /// Describe a synchronous handler built by `factory`.
    ///
    /// A panicking singleton factory fails registry construction; a panicking
    /// per-call factory fails that one dispatch like a panicking handler.
    pub fn sync_factory<H, F>(lifetime: Lifetime, factory: F) -> Self
    where
        H: SyncHandler<S, M>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let factory: Factory<dyn SyncHandler<S, M>> =
            Arc::new(move || Arc::new(factory()) as Arc<dyn SyncHandler<S, M>>);
        Self::new::<H>(HandlerKind::Sync(Provider::from_factory(lifetime, factory)))
    }

    /// Describe an asynchronous handler built by `factory`.
    ///
    /// Factory panics are handled as in [`sync_factory`](Self::sync_factory).
    pub fn async_factory<H, F>(lifetime: Lifetime, factory: F) -> Self
    where
        H: AsyncHandler<S, M>,
        F: Fn() -> H + Send + Sync + 'static,
    {
        let factory: Factory<dyn DynAsyncHandler<S, M>> =
            Arc::new(move || Arc::new(factory()) as Arc<dyn DynAsyncHandler<S, M>>);
        Self::new::<H>(HandlerKind::Async(Provider::from_factory(lifetime, factory)))
    }

    /// Set the command name. An empty name counts as unset.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.name = (!name.is_empty()).then_some(name);
        self
    }

    /// Set the raw key.
    pub fn keyed(mut self, key: impl Into<RawKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Append a handler-specific filter.
    pub fn filter<F: Filter<S, M>>(self, filter: F) -> Self {
        self.shared_filter(Arc::new(filter))
    }

    /// Append an already shared filter.
    pub fn shared_filter(mut self, filter: SharedFilter<S, M>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Apply the name and key declared by `T`, without overriding values
    /// already set on this descriptor.
    pub fn annotated<T: CommandMeta>(mut self) -> Self {
        self.name = self
            .name
            .or_else(|| T::NAME.filter(|name| !name.is_empty()).map(str::to_string));
        self.key = self.key.or_else(T::key);
        self
    }

    /// The handler's declared name: its short type name.
    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    /// The resolved command name: explicit name, else declared name.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.declared_name)
    }

    /// The explicit raw key, if any.
    pub fn key(&self) -> Option<&RawKey> {
        self.key.as_ref()
    }

    /// The handler variant tag.
    pub fn mode(&self) -> InvocationMode {
        self.kind.mode()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (String, Option<RawKey>, HandlerKind<S, M>, Vec<SharedFilter<S, M>>) {
        let name = self.name.unwrap_or(self.declared_name);
        (name, self.key, self.kind, self.filters)
    }
}

/// Last path segment of a type name, without generic arguments.
fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
