//! Per-dispatch invocation context.
//!
//! An [`InvocationContext`] lives for exactly one pass through a filter chain.
//! It borrows the session, the message and the metadata of the handler being
//! invoked, and records the two facts produced during the pass: whether the
//! chain was allowed to reach the handler, and what error the handler raised.

use crate::{error::HandlerError, message::KeyedMessage};
use std::fmt;

/// Which handler variant a command was registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// A [`SyncHandler`](crate::SyncHandler).
    Sync,
    /// An [`AsyncHandler`](crate::AsyncHandler).
    Async,
}

/// Resolved identity of a registered command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerInfo<K> {
    key: K,
    name: String,
    mode: InvocationMode,
}

impl<K> HandlerInfo<K> {
    /// Create handler metadata.
    pub fn new(key: K, name: impl Into<String>, mode: InvocationMode) -> Self {
        Self {
            key,
            name: name.into(),
            mode,
        }
    }

    /// The key the command is registered under.
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The command name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The handler variant.
    pub fn mode(&self) -> InvocationMode {
        self.mode
    }
}

/// Context passed to filter hooks.
pub struct InvocationContext<'a, S: ?Sized, M: KeyedMessage> {
    session: &'a S,
    message: &'a M,
    handler: &'a HandlerInfo<M::Key>,
    error: Option<HandlerError>,
    continued: bool,
}

impl<'a, S: ?Sized, M: KeyedMessage> InvocationContext<'a, S, M> {
    /// Create a fresh context for one dispatch.
    pub fn new(session: &'a S, message: &'a M, handler: &'a HandlerInfo<M::Key>) -> Self {
        Self {
            session,
            message,
            handler,
            error: None,
            continued: true,
        }
    }

    /// The session the message arrived on.
    pub fn session(&self) -> &'a S {
        self.session
    }

    /// The message being dispatched.
    pub fn message(&self) -> &'a M {
        self.message
    }

    /// The command being invoked.
    pub fn handler(&self) -> &'a HandlerInfo<M::Key> {
        self.handler
    }

    /// The error captured from the handler, if any.
    pub fn error(&self) -> Option<&HandlerError> {
        self.error.as_ref()
    }

    /// Whether no pre-hook halted the chain.
    pub fn is_continued(&self) -> bool {
        self.continued
    }

    /// Whether a pre-hook halted the chain before the handler ran.
    pub fn is_halted(&self) -> bool {
        !self.continued
    }

    /// Record that the chain stops before the handler.
    pub fn halt(&mut self) {
        self.continued = false;
    }

    /// Record the handler's error.
    pub fn capture(&mut self, error: HandlerError) {
        self.error = Some(error);
    }

    /// Take the captured error, consuming the context.
    pub fn into_error(self) -> Option<HandlerError> {
        self.error
    }
}

impl<S: ?Sized, M: KeyedMessage> fmt::Debug for InvocationContext<'_, S, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationContext")
            .field("key", self.handler.key())
            .field("handler", &self.handler.name())
            .field("error", &self.error)
            .field("continued", &self.continued)
            .finish_non_exhaustive()
    }
}
