//! Bind nested, strongly-typed configuration structs to environment variables.
//!
//! The shape of a configuration struct decides the variable names: every leaf
//! field is read from the uppercase, `_`-joined path of field names leading to
//! it. Values are coerced into the field's type and written in place.
//!
//! # Overview
//!
//! - [`Schema`] - the static shape of a configuration type, generated by
//!   `#[derive(EnvConfig)]` and cached per type
//! - [`derive_keys`] - the flattened variable names of a schema
//! - [`bind`] - coerce one raw value into the leaf named by a key
//! - [`Loader`] / [`load`] / [`try_load`] - populate a whole configuration
//!
//! # Example
//!
//! ```
//! use envbind::EnvConfig;
//!
//! #[derive(Debug, Default, EnvConfig)]
//! struct Database {
//!     #[env(d = "localhost")]
//!     host: String,
//!     #[env(d = "5432")]
//!     port: u16,
//!     max_conns: u32,
//! }
//!
//! #[derive(Debug, Default, EnvConfig)]
//! struct AppConfig {
//!     database: Database,
//!     #[env(d = "false")]
//!     debug: bool,
//! }
//!
//! let mut config = AppConfig::default();
//! envbind::load(&mut config);
//!
//! // Reads DATABASE_HOST, DATABASE_PORT, DATABASE_MAX_CONNS and DEBUG.
//! assert_eq!(
//!     AppConfig::schema().keys().collect::<Vec<_>>(),
//!     ["DATABASE_HOST", "DATABASE_PORT", "DATABASE_MAX_CONNS", "DEBUG"]
//! );
//! ```
//!
//! # Field Attributes
//!
//! - `#[env(d = "...")]` (or `default = "..."`) - literal used when the
//!   variable is not set. A variable that is set, even to the empty string,
//!   always wins over the default.
//! - `#[env(rename = "...")]` - use another name for this path segment.
//! - `#[env(skip)]` - leave the field out of the schema entirely.
//!
//! # Leaf Types
//!
//! `String`, `bool` and every primitive integer type. Other types join by
//! implementing [`EnvValue`] and registering with [`env_leaf!`]. Booleans
//! accept `true`/`false`, `t`/`f`, `1`/`0`, `yes`/`no` and `on`/`off` in any
//! case.
//!
//! # Name Collisions
//!
//! Two paths can flatten to the same name, for example a field `a_b` next to
//! a group `a` holding `b`. The first in declaration order owns the variable;
//! the other can never be set. [`Schema::collisions`] lists such leaves.

#![warn(missing_docs)]

extern crate self as envbind;

mod binder;
mod config;
mod error;
mod keys;
mod loader;
mod schema;
mod value;

pub use binder::{bind, Target};
pub use config::{EnvConfig, EnvField, Slot};
pub use error::{BindError, KeyFailure, LoadError};
pub use keys::{derive_keys, KeyEntry};
pub use loader::{load, try_load, EnvSource, LoadReport, Loader, ProcessEnv, ValueOrigin};
pub use schema::*;
pub use value::{EnvValue, LeafSlot};

/// Derive [`EnvConfig`] and [`EnvField`] for a struct with named fields.
pub use envbind_macros::EnvConfig;
