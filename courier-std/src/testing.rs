//! Testing utilities for Courier.
//!
//! This module provides handlers and filters that record what the dispatcher
//! did with them, so tests can assert on ordering and invocation counts.
//!
//! # Features
//!
//! - [`RecordingFilter`]: writes its pre/post hook calls into a shared journal
//! - [`CountingHandler`]: a sync handler that counts invocations
//! - [`CountingAsyncHandler`]: an async handler that counts invocations

use courier_core::{
    AsyncHandler, Filter, FilterResult, HandlerResult, InvocationContext, KeyedMessage,
    SyncHandler,
};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

/// Shared, ordered record of filter hook calls.
pub type Journal = Arc<Mutex<Vec<String>>>;

// ============================================================================
// Recording Filter
// ============================================================================

/// A filter that appends one line per hook call to a [`Journal`].
///
/// Pre-hooks record `before:<label>`. Post-hooks record `after:<label>`,
/// followed by ` halted` if the chain was halted and ` error=<error>` if the
/// handler failed.
///
/// # Example
///
/// ```rust,ignore
/// let journal = RecordingFilter::journal();
/// let descriptor = HandlerDescriptor::sync(handler)
///     .filter(RecordingFilter::new("auth", &journal).halting())
///     .filter(RecordingFilter::new("audit", &journal));
///
/// // dispatch...
///
/// assert_eq!(*journal.lock().unwrap(), vec!["before:auth", "after:auth halted"]);
/// ```
#[derive(Clone)]
pub struct RecordingFilter {
    label: String,
    journal: Journal,
    result: FilterResult,
}

impl RecordingFilter {
    /// Create an empty journal.
    pub fn journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    /// Create a filter that continues the chain.
    pub fn new(label: impl Into<String>, journal: &Journal) -> Self {
        Self {
            label: label.into(),
            journal: Arc::clone(journal),
            result: FilterResult::Continue,
        }
    }

    /// Make this filter halt the chain.
    pub fn halting(mut self) -> Self {
        self.result = FilterResult::Halt;
        self
    }

    fn record(&self, line: String) {
        if let Ok(mut journal) = self.journal.lock() {
            journal.push(line);
        }
    }
}

impl<S, M> Filter<S, M> for RecordingFilter
where
    S: ?Sized + Sync,
    M: KeyedMessage,
{
    async fn on_executing(&self, _ctx: &InvocationContext<'_, S, M>) -> FilterResult {
        self.record(format!("before:{}", self.label));
        self.result
    }

    async fn on_executed(&self, ctx: &InvocationContext<'_, S, M>) {
        let mut line = format!("after:{}", self.label);
        if ctx.is_halted() {
            line.push_str(" halted");
        }
        if let Some(error) = ctx.error() {
            line.push_str(&format!(" error={error}"));
        }
        self.record(line);
    }
}

// ============================================================================
// Counting Handlers
// ============================================================================

/// A sync handler that counts invocations.
///
/// Clones share the same counter.
#[derive(Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl CountingHandler {
    /// Create a handler that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler that counts, then fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            count: Arc::default(),
            failure: Some(message.into()),
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }

    fn hit(&self) -> HandlerResult {
        self.count.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(message.clone().into()),
            None => Ok(()),
        }
    }
}

impl<S: ?Sized, M> SyncHandler<S, M> for CountingHandler {
    fn execute(&self, _session: &S, _message: &M) -> HandlerResult {
        self.hit()
    }
}

/// An async handler that counts invocations.
///
/// Clones share the same counter.
#[derive(Clone, Default)]
pub struct CountingAsyncHandler {
    inner: CountingHandler,
}

impl CountingAsyncHandler {
    /// Create a handler that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a handler that counts, then fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            inner: CountingHandler::failing(message),
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.inner.count()
    }
}

impl<S: ?Sized + Sync, M: Sync> AsyncHandler<S, M> for CountingAsyncHandler {
    async fn execute(&self, _session: &S, _message: &M) -> HandlerResult {
        self.inner.hit()
    }
}
