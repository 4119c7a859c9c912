//! Binding and loading error types.

use std::fmt;

use thiserror::Error;

use crate::LeafType;

/// Errors returned when binding a single value into a configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    /// The bind target was borrowed immutably and cannot be written.
    #[error("configuration target is not addressable: a mutable reference is required")]
    NotAddressable,

    /// The key does not resolve to a leaf field of the configuration.
    #[error("no configuration field matches key {key}")]
    FieldNotFound {
        /// The key that failed to resolve.
        key: String,
    },

    /// The raw value could not be parsed into the leaf's type.
    #[error("cannot coerce value for {key} into {expected}: {reason}")]
    TypeCoercion {
        /// The key whose value was rejected.
        key: String,
        /// The declared type of the leaf.
        expected: LeafType,
        /// Parser explanation.
        reason: String,
    },
}

impl BindError {
    /// Create a new field not found error.
    pub fn field_not_found(key: impl Into<String>) -> Self {
        Self::FieldNotFound { key: key.into() }
    }

    /// Create a new type coercion error.
    pub fn type_coercion(key: impl Into<String>, expected: LeafType, reason: impl Into<String>) -> Self {
        Self::TypeCoercion {
            key: key.into(),
            expected,
            reason: reason.into(),
        }
    }
}

/// A binder failure absorbed while loading, tagged with its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyFailure {
    /// Flattened key that failed.
    pub key: String,
    /// Why it failed.
    pub error: BindError,
}

impl fmt::Display for KeyFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.error)
    }
}

/// Aggregate error for a strict load: every key that failed to bind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} configuration key(s) failed to bind: {}", .failures.len(), join_failures(.failures))]
pub struct LoadError {
    failures: Vec<KeyFailure>,
}

impl LoadError {
    /// Create a load error from the collected failures.
    pub fn new(failures: Vec<KeyFailure>) -> Self {
        Self { failures }
    }

    /// The individual failures, in key order.
    pub fn failures(&self) -> &[KeyFailure] {
        &self.failures
    }

    /// Consume the error, returning the failures.
    pub fn into_failures(self) -> Vec<KeyFailure> {
        self.failures
    }
}

fn join_failures(failures: &[KeyFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
