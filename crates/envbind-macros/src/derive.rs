//! `EnvConfig` derive implementation.
//!
//! This module contains the core logic for expanding `#[derive(EnvConfig)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use crate::parse::{ConfigField, ConfigStruct};

/// Expands `#[derive(EnvConfig)]`.
///
/// 1. Parse the struct and its `#[env(...)]` field options
/// 2. Generate the cached schema builder
/// 3. Generate the positional field accessor
/// 4. Generate the `EnvField` impl so the struct can nest as a group
pub fn expand_env_config(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let config = ConfigStruct::parse(input)?;

    Ok(generate_impls(&config))
}

fn generate_impls(config: &ConfigStruct) -> TokenStream {
    let ident = &config.ident;
    let schema_name = ident.to_string();
    let fields = config.fields.iter().map(generate_schema_field);
    let slots = config.fields.iter().enumerate().map(|(index, field)| {
        let field_ident = &field.ident;
        quote! {
            #index => ::core::option::Option::Some(::envbind::EnvField::slot(&mut self.#field_ident)),
        }
    });

    quote! {
        impl ::envbind::EnvConfig for #ident {
            fn schema() -> &'static ::envbind::Schema {
                static SCHEMA: ::std::sync::OnceLock<::envbind::Schema> = ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    ::envbind::Schema::builder(#schema_name)
                        #(#fields)*
                        .build()
                })
            }

            fn env_schema(&self) -> &'static ::envbind::Schema {
                <Self as ::envbind::EnvConfig>::schema()
            }

            #[allow(clippy::match_single_binding)]
            fn field_slot(&mut self, index: usize) -> ::core::option::Option<::envbind::Slot<'_>> {
                match index {
                    #(#slots)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl ::envbind::EnvField for #ident {
            fn kind() -> ::envbind::FieldKind {
                ::envbind::FieldKind::Group(<Self as ::envbind::EnvConfig>::schema().clone())
            }

            fn slot(&mut self) -> ::envbind::Slot<'_> {
                ::envbind::Slot::Group(self)
            }
        }
    }
}

/// Generates the `.field(...)` builder call for one field.
fn generate_schema_field(field: &ConfigField) -> TokenStream {
    let name = &field.name;
    let ty = &field.ty;
    let default = field.default.as_ref().map(|d| quote! { .with_default(#d) });

    quote! {
        .field(
            ::envbind::Field::new(#name, <#ty as ::envbind::EnvField>::kind())
                #default
        )
    }
}
