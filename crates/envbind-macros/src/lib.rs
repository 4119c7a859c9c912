//! Derive macro for envbind configuration structs.
//!
//! `#[derive(EnvConfig)]` generates, at compile time, everything envbind would
//! otherwise need runtime reflection for:
//!
//! - the type's `Schema` (field names, leaf types, defaults, nested groups),
//!   built on first use and cached in a `OnceLock`
//! - a positional accessor handing out mutable access to one field
//! - an `EnvField` impl so the struct can itself be nested as a group
//!
//! # Example
//!
//! ```rust,ignore
//! use envbind::EnvConfig;
//!
//! #[derive(Default, EnvConfig)]
//! struct Database {
//!     #[env(d = "localhost")]
//!     host: String,
//!     #[env(d = "5432")]
//!     port: u16,
//!     #[env(skip)]
//!     replicas: Vec<String>,
//! }
//! ```

mod derive;
mod parse;

use proc_macro::TokenStream;

/// Derives `envbind::EnvConfig` and `envbind::EnvField` for a struct.
///
/// Every field must be a leaf type (`String`, `bool`, a primitive integer,
/// or a type registered with `envbind::env_leaf!`) or another struct that
/// derives `EnvConfig`.
///
/// # Field Attributes
///
/// - `d = "..."` / `default = "..."`: default literal, coerced like an
///   environment value
/// - `rename = "..."`: name segment to use instead of the field name
/// - `skip`: leave the field out of the schema
///
/// # Errors
///
/// Compilation fails for enums, unions, tuple structs, generic structs and
/// unknown `env` options.
#[proc_macro_derive(EnvConfig, attributes(env))]
pub fn derive_env_config(item: TokenStream) -> TokenStream {
    derive::expand_env_config(item.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
