//! Error types for Courier.
//!
//! Every error is scoped to the smallest unit it affects:
//!
//! - [`ConfigurationError`] - registry construction; fatal at startup
//! - [`MappingError`] - a single wire package that could not become a message
//! - [`HandlerError`] - a single handler invocation
//! - [`DispatchError`] - what the dispatcher surfaces when errors propagate
//! - [`CourierError`] - top-level error type

use crate::key::RawKey;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Courier operations.
#[derive(Error, Debug)]
pub enum CourierError {
    /// The handler registry could not be built.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// A message could not be dispatched.
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised while building a handler registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// The command has no key and its name cannot serve as one.
    #[error("command `{name}` needs an explicit key of type `{key_type}`")]
    MissingKey {
        /// Resolved command name.
        name: String,
        /// Name of the registry's key type.
        key_type: &'static str,
    },

    /// The command's key does not fit the registry's key type.
    #[error("key {raw} of command `{name}` cannot be converted to `{key_type}`")]
    KeyConversion {
        /// Resolved command name.
        name: String,
        /// The raw key that failed to convert.
        raw: RawKey,
        /// Name of the registry's key type.
        key_type: &'static str,
    },

    /// Two commands resolve to the same key.
    #[error("command `{name}` uses key {key}, already registered by `{existing}`")]
    DuplicateKey {
        /// The conflicting key, debug-formatted.
        key: String,
        /// The command being registered.
        name: String,
        /// The command that already owns the key.
        existing: String,
    },

    /// A singleton factory panicked while the registry was built.
    #[error("factory of command `{name}` panicked: {panic}")]
    FactoryPanicked {
        /// Resolved command name.
        name: String,
        /// The panic message.
        panic: String,
    },
}

/// Errors raised while mapping a wire package into a message.
#[derive(Error, Debug)]
pub enum MappingError {
    /// The package is structurally invalid.
    #[error("malformed package: {0}")]
    Malformed(String),

    /// The package carries no routing key.
    #[error("package has no routing key")]
    MissingKey,

    /// A custom mapping error.
    #[error(transparent)]
    Custom(BoxError),
}

/// An error raised by a handler invocation.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The handler returned an error.
    #[error(transparent)]
    Failed(BoxError),

    /// The handler panicked.
    #[error("handler panicked: {0}")]
    Panicked(String),
}

impl HandlerError {
    /// Whether the handler panicked rather than returning an error.
    pub fn is_panic(&self) -> bool {
        matches!(self, HandlerError::Panicked(_))
    }
}

/// Errors surfaced to the caller of a dispatch.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// A handler failed and the dispatcher propagates handler errors.
    #[error("command `{name}` (key {key}) failed")]
    Handler {
        /// The routing key, debug-formatted.
        key: String,
        /// The command name.
        name: String,
        /// The captured handler error.
        #[source]
        source: HandlerError,
    },

    /// The wire package could not be mapped.
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),
}

impl From<BoxError> for CourierError {
    fn from(err: BoxError) -> Self {
        CourierError::Custom(err)
    }
}

impl From<BoxError> for MappingError {
    fn from(err: BoxError) -> Self {
        MappingError::Custom(err)
    }
}

impl From<BoxError> for HandlerError {
    fn from(err: BoxError) -> Self {
        HandlerError::Failed(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_configuration_error_messages() {
        let err = ConfigurationError::MissingKey {
            name: "Login".into(),
            key_type: "u16",
        };
        assert_eq!(err.to_string(), "command `Login` needs an explicit key of type `u16`");

        let err = ConfigurationError::KeyConversion {
            name: "Echo".into(),
            raw: RawKey::Text("ECHO".into()),
            key_type: "u16",
        };
        assert_eq!(
            err.to_string(),
            "key \"ECHO\" of command `Echo` cannot be converted to `u16`"
        );

        let err = ConfigurationError::FactoryPanicked {
            name: "Stats".into(),
            panic: "pool unavailable".into(),
        };
        assert_eq!(
            err.to_string(),
            "factory of command `Stats` panicked: pool unavailable"
        );
    }

    #[test]
    fn test_handler_failure_reports_inner_message_once() {
        let err = HandlerError::from(BoxError::from("disk full"));
        assert_eq!(err.to_string(), "disk full");
        assert!(err.source().is_none());
        assert!(!err.is_panic());

        let err = DispatchError::Handler {
            key: "\"SAVE\"".into(),
            name: "Save".into(),
            source: err,
        };
        assert_eq!(err.to_string(), "command `Save` (key \"SAVE\") failed");
        assert_eq!(err.source().map(ToString::to_string), Some("disk full".into()));
    }

    #[test]
    fn test_boxed_error_becomes_custom() {
        let err = CourierError::from(BoxError::from("shutdown requested"));
        assert!(matches!(err, CourierError::Custom(_)));
        assert_eq!(err.to_string(), "shutdown requested");
    }

    #[test]
    fn test_dispatch_error_keeps_source() {
        let err = DispatchError::Handler {
            key: "\"LOGIN\"".into(),
            name: "Login".into(),
            source: HandlerError::Panicked("boom".into()),
        };
        let source = err.source().expect("handler error is the source");
        assert_eq!(source.to_string(), "handler panicked: boom");
    }
}
