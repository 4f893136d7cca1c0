//! Filter chain execution.
//!
//! One pass through a chain moves linearly through four phases:
//!
//! 1. **Before**: pre-hooks in order, stopping at the first halt
//! 2. **Invoking**: the handler, only if nothing halted; errors are captured
//! 3. **After**: post-hooks in forward order for every visited filter
//! 4. **Done**: the context is dropped and the outcome handed back
//!
//! A filter is *visited* once its pre-hook has run, whatever it returned.

use crate::{descriptor::SharedFilter, registry::HandlerEntry, unwind::contain};
use courier_core::{FilterResult, HandlerError, InvocationContext, KeyedMessage};

/// What a pass through a filter chain produced.
#[derive(Debug)]
pub struct ChainOutcome {
    /// Number of filters whose pre-hook ran.
    pub visited: usize,
    /// Whether a pre-hook halted the chain before the handler.
    pub halted: bool,
    /// The error captured from the handler.
    pub error: Option<HandlerError>,
}

/// An ordered list of filters wrapped around one handler.
pub struct FilterChain<'e, S: ?Sized, M: KeyedMessage> {
    entry: &'e HandlerEntry<S, M>,
}

impl<'e, S, M> FilterChain<'e, S, M>
where
    S: ?Sized + Sync + 'static,
    M: KeyedMessage,
{
    /// Wrap the filters registered on `entry`.
    pub fn new(entry: &'e HandlerEntry<S, M>) -> Self {
        Self { entry }
    }

    /// The filters in execution order.
    pub fn filters(&self) -> &'e [SharedFilter<S, M>] {
        self.entry.filters()
    }

    /// Run one pass of the chain for `message`.
    ///
    /// Never fails: handler errors end up in the returned outcome, and panics
    /// raised by filters are contained and logged.
    pub async fn execute(&self, session: &S, message: &M) -> ChainOutcome {
        let filters = self.filters();
        let mut ctx = InvocationContext::new(session, message, self.entry.info());

        // Before
        let mut visited = 0;
        for filter in filters {
            visited += 1;
            let flow = match contain(filter.on_executing_dyn(&ctx)).await {
                Ok(flow) => flow,
                Err(_panic) => {
                    #[cfg(feature = "tracing")]
                    tracing::error!(
                        command = %ctx.handler().name(),
                        panic = %_panic,
                        "Command filter panicked before execution; halting chain"
                    );
                    FilterResult::Halt
                }
            };
            if flow == FilterResult::Halt {
                ctx.halt();
                break;
            }
        }

        // Invoking
        if ctx.is_continued() {
            if let Err(error) = self.entry.invoke(session, message).await {
                ctx.capture(error);
            }
        }

        // After
        for filter in &filters[..visited] {
            if let Err(_panic) = contain(filter.on_executed_dyn(&ctx)).await {
                #[cfg(feature = "tracing")]
                tracing::error!(
                    command = %ctx.handler().name(),
                    panic = %_panic,
                    "Command filter panicked after execution"
                );
            }
        }

        // Done
        let halted = ctx.is_halted();
        ChainOutcome {
            visited,
            halted,
            error: ctx.into_error(),
        }
    }
}
