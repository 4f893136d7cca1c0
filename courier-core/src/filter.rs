//! # Command Filters
//!
//! A filter wraps handler invocation with two hooks:
//!
//! - `on_executing` runs before the handler and may halt the chain
//! - `on_executed` runs after the handler (or after the halt) and observes
//!   the outcome through the [`InvocationContext`]
//!
//! There is a single filter interface. A filter with nothing to await simply
//! writes an `async fn` that never suspends.
//!
//! # Ordering
//!
//! Pre-hooks run in configured order, stopping at the first [`FilterResult::Halt`].
//! Post-hooks run in the same forward order, but only for filters whose
//! pre-hook actually ran.

use crate::{context::InvocationContext, handler::BoxFuture, message::KeyedMessage};
use std::future::Future;

/// Decision returned by a filter's pre-hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterResult {
    /// Run the next filter, then the handler.
    #[default]
    Continue,
    /// Stop here; neither later pre-hooks nor the handler run.
    Halt,
}

impl From<bool> for FilterResult {
    fn from(proceed: bool) -> Self {
        if proceed {
            FilterResult::Continue
        } else {
            FilterResult::Halt
        }
    }
}

/// An interceptor around handler invocation.
///
/// # Example
///
/// ```rust,ignore
/// struct RequireAuth;
///
/// impl Filter<Conn, Package<String>> for RequireAuth {
///     async fn on_executing(&self, ctx: &InvocationContext<'_, Conn, Package<String>>) -> FilterResult {
///         ctx.session().is_authenticated().into()
///     }
/// }
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a command filter for `{M}`",
    label = "missing `Filter<S, {M}>` implementation",
    note = "Filters implement `on_executing` and/or `on_executed`."
)]
pub trait Filter<S: ?Sized + Sync, M: KeyedMessage>: Send + Sync + 'static {
    /// Called before the handler runs.
    fn on_executing(
        &self,
        ctx: &InvocationContext<'_, S, M>,
    ) -> impl Future<Output = FilterResult> + Send {
        let _ = ctx;
        async { FilterResult::Continue }
    }

    /// Called after the handler ran or the chain halted.
    fn on_executed(&self, ctx: &InvocationContext<'_, S, M>) -> impl Future<Output = ()> + Send {
        let _ = ctx;
        async {}
    }
}

/// Dynamic object-safe version of [`Filter`].
pub trait DynFilter<S: ?Sized, M: KeyedMessage>: Send + Sync + 'static {
    /// Pre-hook (dynamic dispatch version).
    fn on_executing_dyn<'a>(
        &'a self,
        ctx: &'a InvocationContext<'a, S, M>,
    ) -> BoxFuture<'a, FilterResult>;

    /// Post-hook (dynamic dispatch version).
    fn on_executed_dyn<'a>(&'a self, ctx: &'a InvocationContext<'a, S, M>) -> BoxFuture<'a, ()>;
}

impl<S, M, T> DynFilter<S, M> for T
where
    S: ?Sized + Sync,
    M: KeyedMessage,
    T: Filter<S, M>,
{
    fn on_executing_dyn<'a>(
        &'a self,
        ctx: &'a InvocationContext<'a, S, M>,
    ) -> BoxFuture<'a, FilterResult> {
        Box::pin(self.on_executing(ctx))
    }

    fn on_executed_dyn<'a>(&'a self, ctx: &'a InvocationContext<'a, S, M>) -> BoxFuture<'a, ()> {
        Box::pin(self.on_executed(ctx))
    }
}
