//! Declarations loaded from JSON.
//!
//! A manifest is plain configuration data describing which events exist and
//! how their arguments are checked. Transforms are referenced by name and
//! resolved through a [`TransformCatalog`].
//!
//! Accepted shapes:
//!
//! ```json
//! "ready"
//! ["ready", "shutdown"]
//! { "userSaved": ["string", "integer"], "log": "to_string" }
//! ```
//!
//! A string or a list of strings declares pass-through events. An object maps
//! each event to either one transform name (applied to every argument) or a
//! list of transform names (one per position).

use crate::{catalog::TransformCatalog, registry::Registrations};
use herald_core::{ArgSpec, Payload, RegistrationError};
use serde_json::Value;

/// Human-readable JSON type of `value`.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<V: Payload> Registrations<V> {
    /// Build registrations from a parsed manifest.
    ///
    /// Fails with [`RegistrationError::InvalidRegistrationInput`] when the
    /// manifest has an unsupported shape, and with
    /// [`RegistrationError::InvalidArgSpec`] when an event's spec does not
    /// resolve to catalog transforms.
    pub fn from_manifest(
        manifest: &Value,
        catalog: &TransformCatalog<V>,
    ) -> Result<Self, RegistrationError> {
        match manifest {
            Value::String(name) => Ok(Registrations::Names(vec![name.clone()])),
            Value::Array(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| match item {
                    Value::String(name) => Ok(name.clone()),
                    other => Err(RegistrationError::InvalidRegistrationInput(format!(
                        "expected an event name at index {i}, found {}",
                        kind_of(other)
                    ))),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Registrations::Names),
            Value::Object(entries) => entries
                .iter()
                .map(|(name, reference)| {
                    resolve_spec(name, reference, catalog).map(|spec| (name.clone(), spec))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Registrations::Specs),
            other => Err(RegistrationError::InvalidRegistrationInput(format!(
                "expected event name string(s) or an object mapping event names to arg specs, found {}",
                kind_of(other)
            ))),
        }
    }

    /// Parse `text` as JSON and build registrations from it.
    pub fn from_manifest_str(
        text: &str,
        catalog: &TransformCatalog<V>,
    ) -> Result<Self, RegistrationError> {
        let manifest: Value = serde_json::from_str(text).map_err(|err| {
            RegistrationError::InvalidRegistrationInput(format!("malformed manifest: {err}"))
        })?;
        Self::from_manifest(&manifest, catalog)
    }
}

fn resolve_spec<V: Payload>(
    event: &str,
    reference: &Value,
    catalog: &TransformCatalog<V>,
) -> Result<ArgSpec<V>, RegistrationError> {
    let invalid = |reason: String| RegistrationError::InvalidArgSpec {
        event: event.to_string(),
        reason,
    };
    let lookup = |name: &str| {
        catalog
            .get(name)
            .cloned()
            .ok_or_else(|| invalid(format!("unknown transform `{name}`")))
    };

    match reference {
        Value::String(name) => lookup(name.as_str()).map(ArgSpec::Uniform),
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(name) => lookup(name.as_str()),
                other => Err(invalid(format!(
                    "expected a transform name at position {i} but saw {}",
                    kind_of(other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(ArgSpec::Positional),
        other => Err(invalid(format!(
            "expected a transform name or a list of transform names but saw {}",
            kind_of(other)
        ))),
    }
}
