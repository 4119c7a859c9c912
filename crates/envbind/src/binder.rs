//! Binding a single flattened key into a live configuration.

use crate::{BindError, EnvConfig, KeyEntry, Slot};

/// The configuration a value is bound into.
///
/// Only a mutable borrow is addressable. A shared borrow converts into
/// [`Target::ReadOnly`], which every bind rejects with
/// [`BindError::NotAddressable`].
pub enum Target<'a> {
    /// Writable configuration.
    Mutable(&'a mut dyn EnvConfig),
    /// Read-only configuration.
    ReadOnly(&'a dyn EnvConfig),
}

impl<'a, C: EnvConfig> From<&'a mut C> for Target<'a> {
    fn from(config: &'a mut C) -> Self {
        Self::Mutable(config)
    }
}

impl<'a, C: EnvConfig> From<&'a C> for Target<'a> {
    fn from(config: &'a C) -> Self {
        Self::ReadOnly(config)
    }
}

/// Coerce `raw` into the leaf named by `key` and write it in place.
///
/// `key` is matched case-insensitively against the flattened keys of the
/// target's schema. Exactly one leaf is written on success; nothing is
/// written on error.
///
/// ```
/// use envbind::{bind, BindError, EnvConfig};
///
/// #[derive(Default, EnvConfig)]
/// struct Database {
///     host: String,
///     port: i64,
/// }
///
/// #[derive(Default, EnvConfig)]
/// struct Config {
///     database: Database,
/// }
///
/// let mut config = Config::default();
/// bind("DATABASE_PORT", &mut config, "5432").unwrap();
/// assert_eq!(config.database.port, 5432);
///
/// assert_eq!(bind("DATABASE_HOST", &config, "db"), Err(BindError::NotAddressable));
/// ```
pub fn bind<'a>(key: &str, target: impl Into<Target<'a>>, raw: &str) -> Result<(), BindError> {
    let config = match target.into() {
        Target::Mutable(config) => config,
        Target::ReadOnly(_) => return Err(BindError::NotAddressable),
    };

    let entry = config
        .env_schema()
        .lookup(key)
        .ok_or_else(|| BindError::field_not_found(key))?;

    bind_entry(config, entry, raw)
}

// Walks the entry's path through the groups, then assigns the leaf.
pub(crate) fn bind_entry(
    config: &mut dyn EnvConfig,
    entry: &KeyEntry,
    raw: &str,
) -> Result<(), BindError> {
    let Some((&leaf, groups)) = entry.path().split_last() else {
        return Err(BindError::field_not_found(entry.key()));
    };

    let mut current = config;
    for &index in groups {
        current = match current.field_slot(index) {
            Some(Slot::Group(group)) => group,
            _ => return Err(BindError::field_not_found(entry.key())),
        };
    }

    match current.field_slot(leaf) {
        Some(Slot::Leaf(slot)) => slot
            .assign(raw)
            .map_err(|reason| BindError::type_coercion(entry.key(), entry.leaf_type(), reason)),
        _ => Err(BindError::field_not_found(entry.key())),
    }
}
