//! # courier-std
//!
//! Standard implementations for the Courier command dispatch engine.
//!
//! This crate provides:
//! - **Registration**: [`descriptor::HandlerDescriptor`], [`registry::RegistryBuilder`]
//! - **Lookup**: [`registry::Registry`], an immutable key-to-command mapping
//! - **Execution**: [`chain::FilterChain`], [`dispatch::Dispatcher`]
//! - **Decoding seam**: [`mapping::PackageHandler`]
//! - **Standard filters**: Logging
//! - **Testing**: recording filters and counting handlers

#![deny(clippy::pub_use, clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use courier_core;

// Modules
pub mod chain;
pub mod descriptor;
pub mod dispatch;
pub mod filters;
pub mod mapping;
pub mod registry;
pub mod testing;

mod unwind;
