//! # Command Handlers
//!
//! Handlers are the application logic bound to a routing key. A handler comes
//! in exactly one of two variants:
//!
//! - [`SyncHandler`] - runs to completion on the dispatching task
//! - [`AsyncHandler`] - may suspend while it awaits I/O
//!
//! Both receive the session and the message by reference. The session is owned
//! by the transport layer and is only borrowed for the duration of the call.
//!
//! # Usage Patterns
//!
//! 1. **Closure**: `|session: &Conn, msg: &Package<String>| Ok(())` is a sync handler
//! 2. **Struct implementation**: `impl AsyncHandler<Conn, Package<String>> for Login`

use crate::error::BoxError;
use std::{future::Future, pin::Pin};

/// Result of a handler invocation.
pub type HandlerResult = Result<(), BoxError>;

/// Boxed future used by the object-safe traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A synchronous command handler.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle `{M}` synchronously",
    label = "missing `SyncHandler<S, {M}>` implementation",
    note = "Sync handlers implement `execute(&self, session, message)`."
)]
pub trait SyncHandler<S: ?Sized, M>: Send + Sync + 'static {
    /// Handle `message` received on `session`.
    fn execute(&self, session: &S, message: &M) -> HandlerResult;
}

impl<S, M, F> SyncHandler<S, M> for F
where
    S: ?Sized,
    F: Fn(&S, &M) -> HandlerResult + Send + Sync + 'static,
{
    fn execute(&self, session: &S, message: &M) -> HandlerResult {
        (self)(session, message)
    }
}

/// An asynchronous command handler.
///
/// Implementors usually write `async fn execute`. For storage in a registry,
/// the object-safe [`DynAsyncHandler`] is implemented automatically.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle `{M}` asynchronously",
    label = "missing `AsyncHandler<S, {M}>` implementation",
    note = "Async handlers implement `async fn execute(&self, session, message)`."
)]
pub trait AsyncHandler<S: ?Sized + Sync, M: Sync>: Send + Sync + 'static {
    /// Handle `message` received on `session`.
    fn execute(&self, session: &S, message: &M) -> impl Future<Output = HandlerResult> + Send;
}

/// Dynamic object-safe version of [`AsyncHandler`].
pub trait DynAsyncHandler<S: ?Sized, M>: Send + Sync + 'static {
    /// Handle `message` received on `session` (dynamic dispatch version).
    fn execute_dyn<'a>(&'a self, session: &'a S, message: &'a M) -> BoxFuture<'a, HandlerResult>;
}

impl<S, M, T> DynAsyncHandler<S, M> for T
where
    S: ?Sized + Sync,
    M: Sync,
    T: AsyncHandler<S, M>,
{
    fn execute_dyn<'a>(&'a self, session: &'a S, message: &'a M) -> BoxFuture<'a, HandlerResult> {
        Box::pin(self.execute(session, message))
    }
}
