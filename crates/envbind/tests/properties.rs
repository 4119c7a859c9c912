//! Property tests over arbitrary, runtime-built schemas.

use std::collections::HashSet;

use envbind::{bind, derive_keys, EnvConfig, FieldKind, LeafType, Schema, Slot};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Shape {
    Leaf(LeafType),
    Group(Vec<(String, Shape)>),
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    Int(i64),
    Flag(bool),
}

enum Node {
    Text(String),
    Int(i64),
    Flag(bool),
    Group(DynConfig),
}

/// A configuration instance whose shape is only known at runtime.
struct DynConfig {
    schema: &'static Schema,
    nodes: Vec<Node>,
}

impl DynConfig {
    fn new(schema: &'static Schema) -> Self {
        let nodes = schema
            .fields()
            .iter()
            .map(|field| match field.kind() {
                FieldKind::Leaf(LeafType::String) => Node::Text(String::new()),
                FieldKind::Leaf(LeafType::Integer) => Node::Int(0),
                FieldKind::Leaf(LeafType::Boolean) => Node::Flag(false),
                FieldKind::Group(nested) => Node::Group(DynConfig::new(nested)),
            })
            .collect();
        Self { schema, nodes }
    }

    fn read(&self, path: &[usize]) -> Value {
        match (&self.nodes[path[0]], path.len()) {
            (Node::Text(v), 1) => Value::Text(v.clone()),
            (Node::Int(v), 1) => Value::Int(*v),
            (Node::Flag(v), 1) => Value::Flag(*v),
            (Node::Group(group), _) => group.read(&path[1..]),
            _ => panic!("path does not end at a leaf"),
        }
    }
}

impl EnvConfig for DynConfig {
    fn schema() -> &'static Schema {
        unimplemented!("runtime schemas belong to the instance")
    }

    fn env_schema(&self) -> &'static Schema {
        self.schema
    }

    fn field_slot(&mut self, index: usize) -> Option<Slot<'_>> {
        Some(match self.nodes.get_mut(index)? {
            Node::Text(v) => Slot::Leaf(v),
            Node::Int(v) => Slot::Leaf(v),
            Node::Flag(v) => Slot::Leaf(v),
            Node::Group(group) => Slot::Group(group),
        })
    }
}

fn build(name: &str, fields: &[(String, Shape)]) -> Schema {
    fields
        .iter()
        .fold(Schema::builder(name), |builder, (field, shape)| match shape {
            Shape::Leaf(ty) => builder.leaf(field.as_str(), *ty),
            Shape::Group(nested) => builder.group(field.as_str(), build(field, nested)),
        })
        .build()
}

// Every leaf path, flattened, duplicates kept.
fn flattened(fields: &[(String, Shape)], prefix: &str, out: &mut Vec<String>) {
    for (field, shape) in fields {
        let key = if prefix.is_empty() {
            field.to_uppercase()
        } else {
            format!("{prefix}_{}", field.to_uppercase())
        };
        match shape {
            Shape::Leaf(_) => out.push(key),
            Shape::Group(nested) => flattened(nested, &key, out),
        }
    }
}

fn leaf_type() -> impl Strategy<Value = LeafType> {
    prop_oneof![
        Just(LeafType::String),
        Just(LeafType::Integer),
        Just(LeafType::Boolean),
    ]
}

fn field_name() -> impl Strategy<Value = String> {
    "[a-c]{1,2}(_[a-c])?"
}

fn fields() -> impl Strategy<Value = Vec<(String, Shape)>> {
    let shape = leaf_type().prop_map(Shape::Leaf).prop_recursive(3, 32, 4, |inner| {
        prop::collection::vec((field_name(), inner), 0..4).prop_map(Shape::Group)
    });
    prop::collection::vec((field_name(), shape), 0..6)
}

fn value_for(ty: LeafType) -> BoxedStrategy<Value> {
    match ty {
        LeafType::String => ".*".prop_map(Value::Text).boxed(),
        LeafType::Integer => any::<i64>().prop_map(Value::Int).boxed(),
        LeafType::Boolean => any::<bool>().prop_map(Value::Flag).boxed(),
    }
}

fn raw(value: &Value) -> String {
    match value {
        Value::Text(v) => v.clone(),
        Value::Int(v) => v.to_string(),
        Value::Flag(v) => v.to_string(),
    }
}

fn leak(schema: Schema) -> &'static Schema {
    Box::leak(Box::new(schema))
}

proptest! {
    #[test]
    fn keys_are_unique_and_cover_every_leaf_path(fields in fields()) {
        let schema = build("Root", &fields);
        let keys = derive_keys(&schema);

        let unique: HashSet<_> = keys.iter().collect();
        prop_assert_eq!(unique.len(), keys.len());

        let mut paths = Vec::new();
        flattened(&fields, "", &mut paths);
        let mut first_seen = Vec::new();
        for path in paths {
            if !first_seen.contains(&path) {
                first_seen.push(path);
            }
        }
        prop_assert_eq!(keys, first_seen);
    }

    #[test]
    fn every_key_binds_on_a_fresh_instance(fields in fields()) {
        let schema = leak(build("Root", &fields));
        let mut config = DynConfig::new(schema);

        for entry in schema.entries() {
            let raw = match entry.leaf_type() {
                LeafType::String => "",
                LeafType::Integer => "0",
                LeafType::Boolean => "false",
            };
            prop_assert!(bind(entry.key(), &mut config, raw).is_ok());
        }
    }

    #[test]
    fn bound_values_read_back_unchanged(
        (fields, values) in fields().prop_flat_map(|fields| {
            let types: Vec<_> = build("Root", &fields)
                .entries()
                .iter()
                .map(|entry| value_for(entry.leaf_type()))
                .collect();
            (Just(fields), types)
        })
    ) {
        let schema = leak(build("Root", &fields));
        let mut config = DynConfig::new(schema);

        for (entry, value) in schema.entries().iter().zip(&values) {
            prop_assert!(bind(entry.key(), &mut config, &raw(value)).is_ok());
        }
        for (entry, value) in schema.entries().iter().zip(&values) {
            prop_assert_eq!(&config.read(entry.path()), value);
        }
    }

    #[test]
    fn bind_writes_exactly_one_leaf(fields in fields(), pick in any::<prop::sample::Index>()) {
        let schema = leak(build("Root", &fields));
        prop_assume!(schema.leaf_count() > 0);

        let mut config = DynConfig::new(schema);
        let target = &schema.entries()[pick.index(schema.leaf_count())];
        let raw = match target.leaf_type() {
            LeafType::String => "changed",
            LeafType::Integer => "42",
            LeafType::Boolean => "true",
        };
        bind(target.key(), &mut config, raw).unwrap();

        let fresh = DynConfig::new(schema);
        for entry in schema.entries() {
            let changed = config.read(entry.path()) != fresh.read(entry.path());
            prop_assert_eq!(changed, entry.key() == target.key());
        }
    }
}
