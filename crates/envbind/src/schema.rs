//! Schema types.
//!
//! A [`Schema`] describes the static shape of a configuration struct: its
//! fields in declaration order, which of them are leaves and which are
//! nested groups, and the default literal attached to each leaf.
//!
//! Schemas are normally produced by `#[derive(EnvConfig)]` and cached for the
//! lifetime of the process. They can also be assembled by hand:
//!
//! ```
//! use envbind::{LeafType, Schema};
//!
//! let database = Schema::builder("Database")
//!     .leaf_with_default("host", LeafType::String, "localhost")
//!     .leaf_with_default("port", LeafType::Integer, "5432")
//!     .build();
//!
//! let schema = Schema::builder("AppConfig").group("database", database).build();
//!
//! assert_eq!(schema.keys().collect::<Vec<_>>(), ["DATABASE_HOST", "DATABASE_PORT"]);
//! ```

use std::fmt;

use crate::keys::{KeyEntry, KeyIndex};

/// The primitive type of a leaf field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafType {
    /// Free-form text, assigned verbatim.
    String,
    /// Base-10 signed integer.
    Integer,
    /// Boolean literal.
    Boolean,
}

impl LeafType {
    /// Lowercase name of the type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for LeafType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a field holds a value or a nested schema.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// A primitive value.
    Leaf(LeafType),
    /// A nested configuration section.
    Group(Schema),
}

/// One field of a schema.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    kind: FieldKind,
    default: Option<String>,
}

impl Field {
    /// Create a field without a default literal.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    /// Attach a default literal, coerced at load time when the environment
    /// has no value for this field. Ignored on groups.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Declared name, case preserved.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Leaf or group.
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Default literal, if declared.
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Returns `true` for leaf fields.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, FieldKind::Leaf(_))
    }
}

/// Static shape of a configuration struct.
///
/// The flattened key index is computed once, when the schema is built.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    fields: Vec<Field>,
    index: KeyIndex,
}

impl Schema {
    /// Start building a schema for the named type.
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Name of the configuration type.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Every flattened key, in traversal order, duplicates removed.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.entries().iter().map(KeyEntry::key)
    }

    /// Every resolvable leaf with its key, path, type and default.
    pub fn entries(&self) -> &[KeyEntry] {
        self.index.entries()
    }

    /// Resolve a key, ignoring case.
    pub fn lookup(&self, key: &str) -> Option<&KeyEntry> {
        self.index.get(key)
    }

    /// Number of resolvable leaves.
    pub fn leaf_count(&self) -> usize {
        self.index.entries().len()
    }

    /// Leaves whose flattened key was already taken by an earlier field.
    ///
    /// These leaves can never be bound from the environment.
    pub fn collisions(&self) -> &[KeyEntry] {
        self.index.shadowed()
    }
}

/// Builder for [`Schema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a leaf without a default.
    #[must_use]
    pub fn leaf(self, name: impl Into<String>, ty: LeafType) -> Self {
        self.field(Field::new(name, FieldKind::Leaf(ty)))
    }

    /// Append a leaf with a default literal.
    #[must_use]
    pub fn leaf_with_default(
        self,
        name: impl Into<String>,
        ty: LeafType,
        default: impl Into<String>,
    ) -> Self {
        self.field(Field::new(name, FieldKind::Leaf(ty)).with_default(default))
    }

    /// Append a nested group.
    #[must_use]
    pub fn group(self, name: impl Into<String>, schema: Schema) -> Self {
        self.field(Field::new(name, FieldKind::Group(schema)))
    }

    /// Finish the schema and compute its key index.
    pub fn build(self) -> Schema {
        let index = KeyIndex::build(&self.fields);
        tracing::trace!(
            schema = %self.name,
            keys = index.entries().len(),
            collisions = index.shadowed().len(),
            "built configuration schema"
        );

        Schema {
            name: self.name,
            fields: self.fields,
            index,
        }
    }
}
