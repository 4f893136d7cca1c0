//! # courier - Keyed Command Dispatch
//!
//! `courier` routes decoded protocol messages to the handler registered for
//! their command key, wrapping each invocation in an ordered chain of filters.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! type Line = Package<String, String>;
//!
//! struct Echo;
//!
//! impl AsyncHandler<Connection, Line> for Echo {
//!     async fn execute(&self, conn: &Connection, msg: &Line) -> HandlerResult {
//!         conn.send(&msg.payload).await?;
//!         Ok(())
//!     }
//! }
//!
//! let registry = RegistryBuilder::new()
//!     .global_filter(LoggingFilter)
//!     .register(HandlerDescriptor::from_async(Echo).named("ECHO"))
//!     .build()?;
//!
//! let packages = Dispatcher::new(registry).with_mapper(parse_line);
//! packages.handle(&conn, line).await?;
//! ```
//!
//! ## Crates
//!
//! - `courier-core`: traits and error types, for crates that only define
//!   handlers and filters
//! - `courier-std`: registry, filter chain and dispatcher
//! - `courier-macros`: `#[derive(Message)]` and `#[derive(Command)]`
//!   (enable the `macros` feature)

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use courier_core::{
    // Handlers
    AsyncHandler,
    // Error types
    BoxError,
    BoxFuture,
    // Keys
    CommandKey,
    // Metadata
    CommandMeta,
    ConfigurationError,
    CourierError,
    DispatchError,
    DynAsyncHandler,
    // Filters
    DynFilter,
    Filter,
    FilterResult,
    HandlerError,
    // Context
    HandlerInfo,
    HandlerResult,
    IgnoreAsciiCase,
    InvocationContext,
    InvocationMode,
    KeyComparer,
    // Messages
    KeyedMessage,
    MappingError,
    Message,
    NaturalEq,
    Package,
    // Mapping
    PackageMapper,
    RawKey,
    SyncHandler,
    TransparentMapper,
};

// Registration and dispatch
pub use courier_std::{
    chain::{ChainOutcome, FilterChain},
    descriptor::{Factory, HandlerDescriptor, HandlerKind, Lifetime, Provider, SharedFilter},
    dispatch::{DispatchOutcome, Dispatcher, ErrorPolicy},
    mapping::PackageHandler,
    registry::{HandlerEntry, Registry, RegistryBuilder},
};

/// Standard filter implementations.
pub mod filters {
    pub use courier_std::filters::logging::LoggingFilter;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use courier_std::testing::*;
}

/// Prelude module - common imports for Courier.
///
/// # Usage
///
/// ```rust,ignore
/// use courier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Handlers
        AsyncHandler,
        // Errors
        BoxError,
        CommandKey,
        CommandMeta,
        CourierError,
        DispatchError,
        // Dispatch
        DispatchOutcome,
        Dispatcher,
        ErrorPolicy,
        // Filters
        Filter,
        FilterResult,
        HandlerDescriptor,
        HandlerResult,
        InvocationContext,
        KeyedMessage,
        Lifetime,
        Message,
        Package,
        PackageMapper,
        RawKey,
        // Registration
        RegistryBuilder,
        SyncHandler,
        filters::LoggingFilter,
    };
}

#[cfg(feature = "macros")]
pub use courier_macros::{Command, Message};
