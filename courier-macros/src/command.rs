//! `#[derive(Command)]`.
//!
//! Reads every `#[command(...)]` attribute on the type and generates a
//! `CommandMeta` implementation. Later attributes override earlier ones.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, DeriveInput, Expr, LitStr, parse_macro_input};

/// Arguments collected from `#[command(...)]`.
#[derive(Default)]
struct CommandArgs {
    name: Option<LitStr>,
    key: Option<Expr>,
}

impl CommandArgs {
    fn from_attributes(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut args = CommandArgs::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("command")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    args.name = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("key") {
                    args.key = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown command attribute, expected `name` or `key`"))
                }
            })?;
        }

        Ok(args)
    }
}

pub fn derive_command_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let args = match CommandArgs::from_attributes(&input.attrs) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let name: TokenStream2 = match &args.name {
        Some(name) => quote! { ::core::option::Option::Some(#name) },
        None => quote! { ::core::option::Option::None },
    };
    let key: TokenStream2 = match &args.key {
        Some(key) => quote! {
            ::core::option::Option::Some(::courier::RawKey::from(#key))
        },
        None => quote! { ::core::option::Option::None },
    };

    let expanded = quote! {
        impl #impl_generics ::courier::CommandMeta for #ident #ty_generics #where_clause {
            const NAME: ::core::option::Option<&'static str> = #name;

            fn key() -> ::core::option::Option<::courier::RawKey> {
                #key
            }
        }
    };

    TokenStream::from(expanded)
}
