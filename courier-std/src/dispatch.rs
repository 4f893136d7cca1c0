//! Message dispatch.
//!
//! The [`Dispatcher`] is the per-message entry point: it looks up the command
//! for a message's key and runs the handler, through its filter chain when the
//! command has filters. It holds no mutable state, so one dispatcher (or any
//! number of clones) can serve every session concurrently.

use crate::{chain::FilterChain, mapping::PackageHandler, registry::Registry};
use courier_core::{DispatchError, KeyedMessage, PackageMapper};
use std::sync::Arc;

/// What happens to a handler error once every filter has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log the error and complete normally.
    #[default]
    Swallow,
    /// Return the error to the caller as a [`DispatchError`].
    Propagate,
}

/// What a dispatch did with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// No command is registered for the message's key.
    Unrouted,
    /// The handler ran. Under [`ErrorPolicy::Swallow`] it may have failed.
    Invoked,
    /// A filter halted the chain before the handler.
    Halted,
    /// The wire package could not be mapped into a message.
    Unmapped,
}

/// Routes keyed messages to the commands of a frozen [`Registry`].
///
/// # Example
/// ```ignore
/// let dispatcher = Dispatcher::new(registry).propagate_errors();
///
/// match dispatcher.handle_message(&session, &message).await? {
///     DispatchOutcome::Unrouted => session.reply("unknown command").await,
///     _ => {}
/// }
/// ```
pub struct Dispatcher<S: ?Sized, M: KeyedMessage> {
    registry: Arc<Registry<S, M>>,
    policy: ErrorPolicy,
}

impl<S: ?Sized, M: KeyedMessage> Clone for Dispatcher<S, M> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            policy: self.policy,
        }
    }
}

impl<S, M> Dispatcher<S, M>
where
    S: ?Sized + Sync + 'static,
    M: KeyedMessage,
{
    /// Create a dispatcher over `registry` that swallows handler errors.
    pub fn new(registry: impl Into<Arc<Registry<S, M>>>) -> Self {
        Self {
            registry: registry.into(),
            policy: ErrorPolicy::default(),
        }
    }

    /// Set the error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Shorthand for `with_error_policy(ErrorPolicy::Propagate)`.
    pub fn propagate_errors(self) -> Self {
        self.with_error_policy(ErrorPolicy::Propagate)
    }

    /// The error policy in effect.
    pub fn error_policy(&self) -> ErrorPolicy {
        self.policy
    }

    /// The registry this dispatcher routes into.
    pub fn registry(&self) -> &Registry<S, M> {
        &self.registry
    }

    /// Put `mapper` in front of this dispatcher.
    pub fn with_mapper<W, P>(self, mapper: P) -> PackageHandler<W, S, M, P>
    where
        P: PackageMapper<W, M>,
    {
        PackageHandler::new(self, mapper)
    }

    /// Dispatch one message received on `session`.
    ///
    /// The handler runs at most once. With filters present, every visited
    /// filter's post-hook runs before this returns, whatever the handler did.
    ///
    /// # Errors
    ///
    /// Only under [`ErrorPolicy::Propagate`], when the handler failed or
    /// panicked.
    pub async fn handle_message(
        &self,
        session: &S,
        message: &M,
    ) -> Result<DispatchOutcome, DispatchError> {
        let Some(entry) = self.registry.get(message.key()) else {
            #[cfg(feature = "tracing")]
            tracing::trace!(key = ?message.key(), "No command registered for key");
            return Ok(DispatchOutcome::Unrouted);
        };

        let (outcome, error, observed) = if entry.filters().is_empty() {
            let error = entry.invoke(session, message).await.err();
            (DispatchOutcome::Invoked, error, false)
        } else {
            let chain = FilterChain::new(entry).execute(session, message).await;
            let outcome = if chain.halted {
                DispatchOutcome::Halted
            } else {
                DispatchOutcome::Invoked
            };
            (outcome, chain.error, true)
        };

        let Some(error) = error else {
            return Ok(outcome);
        };

        match self.policy {
            ErrorPolicy::Propagate => Err(DispatchError::Handler {
                key: format!("{:?}", entry.key()),
                name: entry.name().to_string(),
                source: error,
            }),
            ErrorPolicy::Swallow => {
                #[cfg(feature = "tracing")]
                {
                    let command = entry.name();
                    if observed {
                        tracing::debug!(command, %error, "Command failed; error handled by filters");
                    } else {
                        tracing::warn!(command, %error, "Command failed with no filter to observe the error");
                    }
                }
                #[cfg(not(feature = "tracing"))]
                {
                    let _ = (error, observed);
                }
                Ok(outcome)
            }
        }
    }
}
