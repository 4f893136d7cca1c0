//! Logging filter for command observation.

use courier_core::{Filter, FilterResult, InvocationContext, KeyedMessage};

/// A filter that logs every command it wraps.
///
/// Logs at `info` before and after the handler, and at `warn` when the handler
/// failed. Register it as a global filter to trace every dispatch.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingFilter;

impl LoggingFilter {
    /// Create a new logging filter.
    pub fn new() -> Self {
        Self
    }
}

impl<S, M> Filter<S, M> for LoggingFilter
where
    S: ?Sized + Sync,
    M: KeyedMessage,
{
    async fn on_executing(&self, ctx: &InvocationContext<'_, S, M>) -> FilterResult {
        #[cfg(feature = "tracing")]
        {
            let handler = ctx.handler();
            tracing::info!(
                command = %handler.name(),
                key = ?handler.key(),
                mode = ?handler.mode(),
                "Executing command"
            );
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = ctx;
        }
        FilterResult::Continue
    }

    async fn on_executed(&self, ctx: &InvocationContext<'_, S, M>) {
        #[cfg(feature = "tracing")]
        {
            let command = ctx.handler().name();
            match ctx.error() {
                Some(error) => tracing::warn!(command, %error, "Command failed"),
                None if ctx.is_halted() => tracing::info!(command, "Command halted by a filter"),
                None => tracing::info!(command, "Command executed"),
            }
        }
        #[cfg(not(feature = "tracing"))]
        let _ = ctx;
    }
}
