//! The entry point from the decoding layer.

use crate::dispatch::{DispatchOutcome, Dispatcher, ErrorPolicy};
use courier_core::{DispatchError, KeyedMessage, PackageMapper};
use std::marker::PhantomData;

/// A [`Dispatcher`] fronted by a [`PackageMapper`].
///
/// The transport hands every decoded wire package to [`handle`](Self::handle).
/// A package that fails to map is dropped on its own; the session and every
/// later package are unaffected.
///
/// # Example
/// ```ignore
/// let handler = Dispatcher::new(registry).with_mapper(|line: String| parse_line(&line));
///
/// while let Some(line) = lines.next().await {
///     handler.handle(&session, line?).await?;
/// }
/// ```
pub struct PackageHandler<W, S: ?Sized, M: KeyedMessage, P> {
    dispatcher: Dispatcher<S, M>,
    mapper: P,
    _wire: PhantomData<fn(W)>,
}

impl<W, S, M, P> PackageHandler<W, S, M, P>
where
    S: ?Sized + Sync + 'static,
    M: KeyedMessage,
    P: PackageMapper<W, M>,
{
    /// Front `dispatcher` with `mapper`.
    pub fn new(dispatcher: Dispatcher<S, M>, mapper: P) -> Self {
        Self {
            dispatcher,
            mapper,
            _wire: PhantomData,
        }
    }

    /// The dispatcher mapped messages are handed to.
    pub fn dispatcher(&self) -> &Dispatcher<S, M> {
        &self.dispatcher
    }

    /// The mapper applied to each package.
    pub fn mapper(&self) -> &P {
        &self.mapper
    }

    /// Map `package` and dispatch the resulting message.
    ///
    /// # Errors
    ///
    /// Only under [`ErrorPolicy::Propagate`]: a mapping failure as
    /// [`DispatchError::Mapping`], or the handler's error.
    pub async fn handle(&self, session: &S, package: W) -> Result<DispatchOutcome, DispatchError> {
        match self.mapper.map(package) {
            Ok(message) => self.dispatcher.handle_message(session, &message).await,
            Err(error) => match self.dispatcher.error_policy() {
                ErrorPolicy::Propagate => Err(error.into()),
                ErrorPolicy::Swallow => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(%error, "Dropping package that could not be mapped");
                    #[cfg(not(feature = "tracing"))]
                    let _ = error;
                    Ok(DispatchOutcome::Unmapped)
                }
            },
        }
    }
}

impl<W, S: ?Sized, M: KeyedMessage, P: Clone> Clone for PackageHandler<W, S, M, P> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            mapper: self.mapper.clone(),
            _wire: PhantomData,
        }
    }
}
