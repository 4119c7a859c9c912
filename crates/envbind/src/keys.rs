//! Flattened key derivation.
//!
//! Every leaf of a schema is named by the uppercase, `_`-joined path of
//! field names from the root, outermost first. A group `Database` holding a
//! leaf `Host` yields `DATABASE_HOST`.
//!
//! Keys are de-duplicated stably: when two paths flatten to the same key
//! (a top-level `a_b` and a group `a` with field `b`), the first one in
//! declaration order owns the key and the other is recorded as shadowed.

use std::collections::HashMap;

use crate::{Field, FieldKind, LeafType, Schema};

/// A resolvable leaf: its key, where it lives, and how it is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntry {
    key: String,
    path: Vec<usize>,
    leaf_type: LeafType,
    default: Option<String>,
}

impl KeyEntry {
    /// Flattened key, e.g. `DATABASE_HOST`.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Field positions from the root down to the leaf.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Declared type of the leaf.
    pub fn leaf_type(&self) -> LeafType {
        self.leaf_type
    }

    /// Default literal, if declared.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }
}

/// Key-to-leaf table built once per schema.
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyIndex {
    entries: Vec<KeyEntry>,
    by_key: HashMap<String, usize>,
    shadowed: Vec<KeyEntry>,
}

impl KeyIndex {
    pub(crate) fn build(fields: &[Field]) -> Self {
        let mut flat = Vec::new();
        flatten(fields, "", &mut Vec::new(), &mut flat);

        let mut index = Self::default();
        for entry in flat {
            if index.by_key.contains_key(&entry.key) {
                index.shadowed.push(entry);
            } else {
                index.by_key.insert(entry.key.clone(), index.entries.len());
                index.entries.push(entry);
            }
        }
        index
    }

    pub(crate) fn entries(&self) -> &[KeyEntry] {
        &self.entries
    }

    pub(crate) fn shadowed(&self) -> &[KeyEntry] {
        &self.shadowed
    }

    pub(crate) fn get(&self, key: &str) -> Option<&KeyEntry> {
        self.by_key
            .get(&key.to_uppercase())
            .map(|&position| &self.entries[position])
    }
}

// Depth-first walk in declaration order, emitting every leaf.
fn flatten(fields: &[Field], prefix: &str, path: &mut Vec<usize>, out: &mut Vec<KeyEntry>) {
    for (position, field) in fields.iter().enumerate() {
        let name = field.name().to_uppercase();
        let key = if prefix.is_empty() {
            name
        } else {
            format!("{prefix}_{name}")
        };

        path.push(position);
        match field.kind() {
            FieldKind::Leaf(leaf_type) => out.push(KeyEntry {
                key,
                path: path.clone(),
                leaf_type: *leaf_type,
                default: field.default().map(str::to_owned),
            }),
            FieldKind::Group(schema) => flatten(schema.fields(), &key, path, out),
        }
        path.pop();
    }
}

/// Derive the ordered, duplicate-free set of flattened keys for a schema.
///
/// ```
/// use envbind::{derive_keys, LeafType, Schema};
///
/// let schema = Schema::builder("Config")
///     .leaf("A", LeafType::String)
///     .leaf("B", LeafType::Integer)
///     .group(
///         "C",
///         Schema::builder("Inner")
///             .leaf("F", LeafType::String)
///             .leaf("G", LeafType::Integer)
///             .build(),
///     )
///     .build();
///
/// assert_eq!(derive_keys(&schema), ["A", "B", "C_F", "C_G"]);
/// ```
pub fn derive_keys(schema: &Schema) -> Vec<String> {
    schema.keys().map(str::to_owned).collect()
}
