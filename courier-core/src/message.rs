//! Message traits for dispatched packages.

use crate::key::CommandKey;

/// A marker trait for decoded application-level messages.
///
/// Messages must be `Send + Sync + 'static` so that a dispatch future holding
/// a reference to one can move between worker threads.
///
/// # Example
///
/// ```rust,ignore
/// struct LoginRequest { user: String }
///
/// impl Message for LoginRequest {}
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Message",
    label = "must be `Send + Sync + 'static`",
    note = "All messages in Courier must be thread-safe and static."
)]
pub trait Message: Send + Sync + 'static {}

impl Message for () {}
impl Message for String {}
impl Message for &'static str {}
impl<T: Message> Message for Box<T> {}
impl<T: Message> Message for std::sync::Arc<T> {}
impl<T: Message> Message for Vec<T> {}

/// A message carrying the routing key that selects its handler.
///
/// The key is extracted by the decoding layer before the message reaches the
/// dispatcher.
#[diagnostic::on_unimplemented(
    message = "`{Self}` does not carry a routing key",
    label = "missing `KeyedMessage` implementation",
    note = "Implement `KeyedMessage` to expose the key used for handler lookup."
)]
pub trait KeyedMessage: Message {
    /// The routing key type.
    type Key: CommandKey;

    /// Returns the routing key of this message.
    fn key(&self) -> &Self::Key;
}

/// A generic keyed package: a routing key plus an opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package<K, P = Vec<u8>> {
    /// The routing key.
    pub key: K,
    /// The decoded body.
    pub payload: P,
}

impl<K, P> Package<K, P> {
    /// Create a new package.
    pub fn new(key: K, payload: P) -> Self {
        Self { key, payload }
    }

    /// Split the package into its key and payload.
    pub fn into_parts(self) -> (K, P) {
        (self.key, self.payload)
    }
}

impl<K, P> Message for Package<K, P>
where
    K: Send + Sync + 'static,
    P: Send + Sync + 'static,
{
}

impl<K, P> KeyedMessage for Package<K, P>
where
    K: CommandKey,
    P: Send + Sync + 'static,
{
    type Key = K;

    fn key(&self) -> &K {
        &self.key
    }
}
