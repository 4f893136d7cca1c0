//! Declarative command metadata.

use crate::key::RawKey;

/// Name and key declared on a command type.
///
/// Usually generated with `#[derive(Command)]` and applied to a descriptor
/// with `HandlerDescriptor::annotated`. Both items are optional: a missing
/// name falls back to the type name, a missing key to the command name when
/// the registry's key type is textual.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Command)]
/// #[command(name = "LOGIN", key = 0x01)]
/// struct Login;
/// ```
pub trait CommandMeta {
    /// Declared command name.
    const NAME: Option<&'static str> = None;

    /// Declared raw key.
    fn key() -> Option<RawKey> {
        None
    }
}
