//! Leaf value coercion.
//!
//! Each supported leaf type registers its parser by implementing
//! [`EnvValue`]. The binder only ever talks to a leaf through the
//! object-safe [`LeafSlot`], so adding a leaf type never touches the binder:
//! implement [`EnvValue`] and register the type with [`env_leaf!`].
//!
//! Accepted boolean literals, case-insensitive: `true`/`false`, `t`/`f`,
//! `1`/`0`, `yes`/`no`, `on`/`off`.
//!
//! [`env_leaf!`]: crate::env_leaf

use crate::LeafType;

/// A type that can be parsed from an environment string.
///
/// ```
/// use envbind::{EnvValue, LeafType};
///
/// /// Milliseconds, written as a plain integer.
/// #[derive(Debug, Default, PartialEq)]
/// struct Millis(u64);
///
/// impl EnvValue for Millis {
///     const LEAF_TYPE: LeafType = LeafType::Integer;
///
///     fn parse_env(raw: &str) -> Result<Self, String> {
///         raw.parse().map(Millis).map_err(|e| format!("{e}"))
///     }
/// }
///
/// envbind::env_leaf!(Millis);
///
/// assert_eq!(Millis::parse_env("250"), Ok(Millis(250)));
/// ```
pub trait EnvValue: Sized {
    /// Type tag recorded in the schema.
    const LEAF_TYPE: LeafType;

    /// Parse the raw string.
    fn parse_env(raw: &str) -> Result<Self, String>;
}

/// Object-safe handle to a leaf field inside a live configuration.
pub trait LeafSlot {
    /// Declared type of the leaf.
    fn leaf_type(&self) -> LeafType;

    /// Parse `raw` and overwrite the leaf. On error the leaf is untouched.
    fn assign(&mut self, raw: &str) -> Result<(), String>;
}

impl<T: EnvValue> LeafSlot for T {
    fn leaf_type(&self) -> LeafType {
        T::LEAF_TYPE
    }

    fn assign(&mut self, raw: &str) -> Result<(), String> {
        *self = T::parse_env(raw)?;
        Ok(())
    }
}

impl EnvValue for String {
    const LEAF_TYPE: LeafType = LeafType::String;

    fn parse_env(raw: &str) -> Result<Self, String> {
        Ok(raw.to_owned())
    }
}

impl EnvValue for bool {
    const LEAF_TYPE: LeafType = LeafType::Boolean;

    fn parse_env(raw: &str) -> Result<Self, String> {
        parse_bool(raw).ok_or_else(|| {
            "expected one of true/false, t/f, 1/0, yes/no, on/off".to_string()
        })
    }
}

macro_rules! integer_values {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl EnvValue for $ty {
                const LEAF_TYPE: LeafType = LeafType::Integer;

                fn parse_env(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }
            }
        )+
    };
}

integer_values!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Parse a boolean from a string.
fn parse_bool(s: &str) -> Option<bool> {
    match s.to_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "on" => Some(true),
        "false" | "f" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
