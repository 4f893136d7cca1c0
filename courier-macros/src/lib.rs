//! Derive macros for Courier.
//!
//! - `#[derive(Message)]` - implements the `Message` marker trait
//! - `#[derive(Command)]` - declares a command's name and key through `CommandMeta`

use proc_macro::TokenStream;

mod command;
mod message;

/// Derive macro for implementing the `Message` trait.
#[proc_macro_derive(Message)]
pub fn derive_message(input: TokenStream) -> TokenStream {
    message::derive_message_impl(input)
}

/// Derive macro for implementing the `CommandMeta` trait.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Command)]
/// #[command(name = "LOGIN", key = 0x01)]
/// struct Login;
///
/// let descriptor = HandlerDescriptor::sync(Login).annotated::<Login>();
/// ```
///
/// Both arguments are optional. `key` takes any expression convertible into
/// `RawKey` (a string or an integer).
#[proc_macro_derive(Command, attributes(command))]
pub fn derive_command(input: TokenStream) -> TokenStream {
    command::derive_command_impl(input)
}
