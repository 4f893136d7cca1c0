//! # courier-core
//!
//! Core traits for the Courier command dispatch engine.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! applications and extensions that define handlers and filters without
//! depending on the `courier-std` dispatcher.
//!
//! # Pipeline
//!
//! ```text
//! wire package ──PackageMapper──▶ KeyedMessage ──key──▶ registry lookup
//!                                                        │
//!                               Filter pre-hooks ◀───────┘
//!                                      │
//!                        SyncHandler / AsyncHandler
//!                                      │
//!                               Filter post-hooks
//! ```
//!
//! - [`PackageMapper`] - adapts a decoded wire package into a message
//! - [`KeyedMessage`] / [`CommandKey`] - the routing key and its conversions
//! - [`SyncHandler`] / [`AsyncHandler`] - the two handler variants
//! - [`Filter`] - pre/post interceptors around a handler
//! - [`InvocationContext`] - the per-dispatch record filters observe
//!
//! # Error Types
//!
//! - [`CourierError`] - Top-level error type
//! - [`ConfigurationError`] - Registry construction errors
//! - [`MappingError`] - Package mapping errors
//! - [`HandlerError`] - Captured handler failures
//! - [`DispatchError`] - Errors surfaced by the dispatcher

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod filter;
mod handler;
mod key;
mod mapper;
mod message;
mod meta;

// Re-exports
pub use context::{HandlerInfo, InvocationContext, InvocationMode};
pub use error::{
    BoxError, ConfigurationError, CourierError, DispatchError, HandlerError, MappingError,
};
pub use filter::{DynFilter, Filter, FilterResult};
pub use handler::{AsyncHandler, BoxFuture, DynAsyncHandler, HandlerResult, SyncHandler};
pub use key::{CommandKey, IgnoreAsciiCase, KeyComparer, NaturalEq, RawKey};
pub use mapper::{PackageMapper, TransparentMapper};
pub use message::{KeyedMessage, Message, Package};
pub use meta::CommandMeta;
