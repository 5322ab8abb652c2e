//! # Argument Specs
//!
//! An [`ArgSpec`] describes how the raw arguments handed to an emit entry
//! point are validated and shaped before they are published. Listeners only
//! ever see the transformed values.
//!
//! Two shapes exist:
//!
//! - [`ArgSpec::Uniform`] - one [`Transform`] applied to every position
//! - [`ArgSpec::Positional`] - one [`Transform`] per position
//!
//! Every transform receives the raw value together with its position:
//!
//! ```rust,ignore
//! let spec = ArgSpec::positional([
//!     Transform::new(|name: Arg, _| name),
//!     Transform::fallible(|age: Arg, pos| age.require_positive(pos)),
//! ]);
//! ```

use crate::{
    error::{BoxError, EmitError},
    payload::Payload,
};
use std::{fmt, sync::Arc};

type TransformFn<V> = dyn Fn(V, usize) -> Result<V, BoxError> + Send + Sync;

/// The identity transform: returns the argument unchanged.
pub fn pass_through<V>(value: V, _position: usize) -> V {
    value
}

/// A shared transform `(raw value, position) -> value`.
///
/// Cloning is O(1).
pub struct Transform<V> {
    func: Arc<TransformFn<V>>,
}

impl<V: Payload> Transform<V> {
    /// Create a transform that cannot fail.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(V, usize) -> V + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(move |value, position| Ok(func(value, position))),
        }
    }

    /// Create a transform that validates its input and may reject it.
    pub fn fallible<F, E>(func: F) -> Self
    where
        F: Fn(V, usize) -> Result<V, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        Self {
            func: Arc::new(move |value, position| func(value, position).map_err(Into::into)),
        }
    }

    /// The identity transform.
    pub fn pass_through() -> Self {
        Self::new(pass_through)
    }

    /// Apply the transform to one argument.
    pub fn apply(&self, value: V, position: usize) -> Result<V, BoxError> {
        (self.func)(value, position)
    }
}

impl<V> Clone for Transform<V> {
    fn clone(&self) -> Self {
        Self {
            func: Arc::clone(&self.func),
        }
    }
}

impl<V> fmt::Debug for Transform<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// How raw arguments are turned into published arguments.
pub enum ArgSpec<V> {
    /// The same transform for every position.
    Uniform(Transform<V>),
    /// One transform per position. Emitting more arguments than transforms
    /// is an [`EmitError::ArgumentSpecMismatch`].
    Positional(Vec<Transform<V>>),
}

impl<V: Payload> ArgSpec<V> {
    /// A uniform spec that publishes arguments unchanged.
    pub fn pass_through() -> Self {
        ArgSpec::Uniform(Transform::pass_through())
    }

    /// A uniform spec from an infallible closure.
    pub fn uniform<F>(func: F) -> Self
    where
        F: Fn(V, usize) -> V + Send + Sync + 'static,
    {
        ArgSpec::Uniform(Transform::new(func))
    }

    /// A positional spec from a sequence of transforms.
    pub fn positional(transforms: impl IntoIterator<Item = Transform<V>>) -> Self {
        ArgSpec::Positional(transforms.into_iter().collect())
    }

    /// Maximum number of arguments accepted, or `None` when unbounded.
    pub fn arity(&self) -> Option<usize> {
        match self {
            ArgSpec::Uniform(_) => None,
            ArgSpec::Positional(transforms) => Some(transforms.len()),
        }
    }

    /// Run `raw` through the spec.
    ///
    /// The argument count is checked before any transform runs, so a
    /// mismatch never leaves a transform half-applied. Transform errors
    /// stop evaluation and are returned unchanged inside
    /// [`EmitError::Transform`].
    pub fn evaluate(&self, event: &str, raw: Vec<V>) -> Result<Vec<V>, EmitError> {
        match self {
            ArgSpec::Uniform(transform) => raw
                .into_iter()
                .enumerate()
                .map(|(i, value)| transform.apply(value, i).map_err(EmitError::Transform))
                .collect(),
            ArgSpec::Positional(transforms) => {
                if raw.len() > transforms.len() {
                    return Err(EmitError::ArgumentSpecMismatch {
                        event: event.to_string(),
                        expected: transforms.len(),
                        supplied: raw.len(),
                    });
                }
                raw.into_iter()
                    .zip(transforms)
                    .enumerate()
                    .map(|(i, (value, transform))| {
                        transform.apply(value, i).map_err(EmitError::Transform)
                    })
                    .collect()
            }
        }
    }
}

impl<V> Clone for ArgSpec<V> {
    fn clone(&self) -> Self {
        match self {
            ArgSpec::Uniform(t) => ArgSpec::Uniform(t.clone()),
            ArgSpec::Positional(ts) => ArgSpec::Positional(ts.clone()),
        }
    }
}

impl<V> fmt::Debug for ArgSpec<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgSpec::Uniform(_) => f.write_str("Uniform"),
            ArgSpec::Positional(ts) => write!(f, "Positional({})", ts.len()),
        }
    }
}

impl<V: Payload> Default for ArgSpec<V> {
    fn default() -> Self {
        Self::pass_through()
    }
}

impl<V> From<Transform<V>> for ArgSpec<V> {
    fn from(transform: Transform<V>) -> Self {
        ArgSpec::Uniform(transform)
    }
}

impl<V> From<Vec<Transform<V>>> for ArgSpec<V> {
    fn from(transforms: Vec<Transform<V>>) -> Self {
        ArgSpec::Positional(transforms)
    }
}

impl<V, const N: usize> From<[Transform<V>; N]> for ArgSpec<V> {
    fn from(transforms: [Transform<V>; N]) -> Self {
        ArgSpec::Positional(transforms.into())
    }
}
