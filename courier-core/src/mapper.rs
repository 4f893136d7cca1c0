//! Package mapping seam between wire decoding and dispatch.

use crate::{error::MappingError, message::KeyedMessage};

/// Adapts a decoded wire package into the message type handlers consume.
///
/// Mapping must be pure and deterministic. A failure affects only the package
/// being mapped.
///
/// Closures `Fn(W) -> Result<M, MappingError>` implement this trait.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot map `{W}` into `{M}`",
    label = "missing `PackageMapper<{W}, {M}>` implementation",
    note = "Implement `map` or pass a closure `Fn({W}) -> Result<{M}, MappingError>`."
)]
pub trait PackageMapper<W, M: KeyedMessage>: Send + Sync + 'static {
    /// Map one wire package.
    fn map(&self, package: W) -> Result<M, MappingError>;
}

impl<W, M, F> PackageMapper<W, M> for F
where
    M: KeyedMessage,
    F: Fn(W) -> Result<M, MappingError> + Send + Sync + 'static,
{
    fn map(&self, package: W) -> Result<M, MappingError> {
        (self)(package)
    }
}

/// Identity mapper for pipelines whose decoded package already is the message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransparentMapper;

impl<M: KeyedMessage> PackageMapper<M, M> for TransparentMapper {
    fn map(&self, package: M) -> Result<M, MappingError> {
        Ok(package)
    }
}
