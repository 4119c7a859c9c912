//! Configuration traits.
//!
//! [`EnvConfig`] is implemented by `#[derive(EnvConfig)]` for every
//! configuration struct. It exposes the type's cached [`Schema`] and a
//! positional accessor, [`EnvConfig::field_slot`], that hands out mutable
//! access to one field at a time. [`EnvField`] is what lets the derive treat
//! any field type uniformly: leaf types report [`FieldKind::Leaf`], derived
//! structs report [`FieldKind::Group`].

use crate::{FieldKind, LeafSlot, Schema};

/// A configuration struct whose fields can be bound from the environment.
///
/// Implement it with `#[derive(EnvConfig)]`:
///
/// ```
/// use envbind::EnvConfig;
///
/// #[derive(Debug, Default, EnvConfig)]
/// struct Database {
///     #[env(d = "localhost")]
///     host: String,
///     #[env(d = "5432")]
///     port: u16,
/// }
///
/// #[derive(Debug, Default, EnvConfig)]
/// struct AppConfig {
///     database: Database,
///     debug: bool,
/// }
///
/// let keys: Vec<_> = AppConfig::schema().keys().collect();
/// assert_eq!(keys, ["DATABASE_HOST", "DATABASE_PORT", "DEBUG"]);
/// ```
pub trait EnvConfig {
    /// The schema of this type, built on first use and cached.
    fn schema() -> &'static Schema
    where
        Self: Sized;

    /// The schema of this value's type, usable through `dyn EnvConfig`.
    fn env_schema(&self) -> &'static Schema;

    /// Mutable access to the field at `index` in schema order.
    fn field_slot(&mut self, index: usize) -> Option<Slot<'_>>;
}

/// Mutable access to one field of a configuration.
pub enum Slot<'a> {
    /// A primitive value.
    Leaf(&'a mut dyn LeafSlot),
    /// A nested configuration.
    Group(&'a mut dyn EnvConfig),
}

/// A type usable as a field of an [`EnvConfig`] struct.
pub trait EnvField {
    /// How the field appears in the parent schema.
    fn kind() -> FieldKind
    where
        Self: Sized;

    /// Mutable access to the field.
    fn slot(&mut self) -> Slot<'_>;
}

/// Register [`EnvValue`](crate::EnvValue) types as leaf fields.
///
/// ```
/// use envbind::{EnvField, EnvValue, FieldKind, LeafType};
///
/// struct Level(u8);
///
/// impl EnvValue for Level {
///     const LEAF_TYPE: LeafType = LeafType::Integer;
///
///     fn parse_env(raw: &str) -> Result<Self, String> {
///         raw.parse().map(Level).map_err(|e| format!("{e}"))
///     }
/// }
///
/// envbind::env_leaf!(Level);
///
/// assert!(matches!(Level::kind(), FieldKind::Leaf(LeafType::Integer)));
/// ```
#[macro_export]
macro_rules! env_leaf {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::EnvField for $ty {
                fn kind() -> $crate::FieldKind {
                    $crate::FieldKind::Leaf(<$ty as $crate::EnvValue>::LEAF_TYPE)
                }

                fn slot(&mut self) -> $crate::Slot<'_> {
                    $crate::Slot::Leaf(self)
                }
            }
        )+
    };
}

env_leaf!(String, bool, i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
