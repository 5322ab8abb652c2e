//! Named transforms.
//!
//! A [`TransformCatalog`] maps names to [`Transform`]s so declarations can
//! refer to transforms by name, e.g. from a manifest loaded at startup.

use herald_core::{Payload, Transform};
use std::{collections::HashMap, fmt};
use thiserror::Error;

/// Name under which every catalog holds the identity transform.
pub const PASS_THROUGH: &str = "pass_through";

/// Rejection raised by the standard validators.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("argument {position}: expected {expected}, found {found}")]
pub struct TransformError {
    /// Position of the rejected argument.
    pub position: usize,
    /// What the validator accepts.
    pub expected: &'static str,
    /// What it got instead.
    pub found: &'static str,
}

/// Transforms addressable by name.
pub struct TransformCatalog<V> {
    transforms: HashMap<String, Transform<V>>,
}

impl<V: Payload> TransformCatalog<V> {
    /// A catalog holding only [`PASS_THROUGH`].
    pub fn new() -> Self {
        let mut transforms = HashMap::new();
        transforms.insert(PASS_THROUGH.to_string(), Transform::pass_through());
        Self { transforms }
    }

    /// Add a transform, returning the catalog.
    pub fn with(mut self, name: impl Into<String>, transform: Transform<V>) -> Self {
        self.insert(name, transform);
        self
    }

    /// Add a transform, returning the one it replaced.
    pub fn insert(&mut self, name: impl Into<String>, transform: Transform<V>) -> Option<Transform<V>> {
        self.transforms.insert(name.into(), transform)
    }

    /// Look up a transform.
    pub fn get(&self, name: &str) -> Option<&Transform<V>> {
        self.transforms.get(name)
    }

    /// Whether `name` is known.
    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }

    /// Known names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.transforms.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl<V: Payload> Default for TransformCatalog<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for TransformCatalog<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.transforms.keys()).finish()
    }
}

#[cfg(feature = "manifest")]
mod json {
    use super::{TransformCatalog, TransformError};
    use crate::manifest::kind_of;
    use herald_core::Transform;
    use serde_json::Value;

    fn expect(expected: &'static str, accepts: fn(&Value) -> bool) -> Transform<Value> {
        Transform::fallible(move |value: Value, position| {
            if accepts(&value) {
                Ok(value)
            } else {
                Err(TransformError {
                    position,
                    expected,
                    found: kind_of(&value),
                })
            }
        })
    }

    impl TransformCatalog<Value> {
        /// A catalog with validators for JSON values.
        ///
        /// | name         | accepts                         |
        /// |--------------|---------------------------------|
        /// | `string`     | strings                         |
        /// | `number`     | any number                      |
        /// | `integer`    | integral numbers                |
        /// | `boolean`    | `true` / `false`                |
        /// | `array`      | arrays                          |
        /// | `object`     | objects                         |
        /// | `non_null`   | anything but `null`             |
        /// | `to_string`  | anything; non-strings become their JSON text |
        pub fn json() -> Self {
            Self::new()
                .with("string", expect("string", Value::is_string))
                .with("number", expect("number", Value::is_number))
                .with(
                    "integer",
                    expect("integer", |v| v.is_i64() || v.is_u64()),
                )
                .with("boolean", expect("boolean", Value::is_boolean))
                .with("array", expect("array", Value::is_array))
                .with("object", expect("object", Value::is_object))
                .with("non_null", expect("non-null value", |v| !v.is_null()))
                .with(
                    "to_string",
                    Transform::new(|value: Value, _| match value {
                        Value::String(_) => value,
                        other => Value::String(other.to_string()),
                    }),
                )
        }
    }
}
