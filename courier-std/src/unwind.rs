//! Panic containment for user code run by the dispatcher.

use futures::FutureExt;
use std::{any::Any, future::Future, panic::AssertUnwindSafe};

/// Run `future`, turning a panic into its message.
pub(crate) async fn contain<F: Future>(future: F) -> Result<F::Output, String> {
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(panic_message)
}

/// Run `f`, turning a panic into its message.
pub(crate) fn contain_sync<T>(f: impl FnOnce() -> T) -> Result<T, String> {
    std::panic::catch_unwind(AssertUnwindSafe(f)).map_err(panic_message)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
