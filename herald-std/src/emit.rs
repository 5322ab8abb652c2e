//! Emit entry points.
//!
//! An [`Emitter`] is bound to one event name, one [`ArgSpec`] and one bus.
//! Every call runs the raw arguments through the spec and, only if that
//! succeeds, publishes the transformed arguments.

use herald_core::{ArgSpec, Bus, EmitError, Payload};
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

struct EmitterInner<V, B> {
    name: String,
    spec: ArgSpec<V>,
    bus: Arc<B>,
    count: AtomicUsize,
}

/// The emit entry point of a registered event.
///
/// Cloning is O(1); clones share the invocation counter.
///
/// # Example
///
/// ```rust,ignore
/// let saved = registry.emitter("userSaved").unwrap();
/// saved.emit([json!("ada"), json!(36)])?;
/// assert_eq!(saved.count(), 1);
/// ```
pub struct Emitter<V, B> {
    inner: Arc<EmitterInner<V, B>>,
}

impl<V: Payload, B: Bus<V>> Emitter<V, B> {
    /// Create an emitter for `name` publishing through `bus`.
    pub fn new(name: impl Into<String>, spec: ArgSpec<V>, bus: Arc<B>) -> Self {
        Self {
            inner: Arc::new(EmitterInner {
                name: name.into(),
                spec,
                bus,
                count: AtomicUsize::new(0),
            }),
        }
    }

    /// The event name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The spec applied to raw arguments.
    pub fn spec(&self) -> &ArgSpec<V> {
        &self.inner.spec
    }

    /// How many times [`emit`](Self::emit) has been called, including calls
    /// rejected by the spec.
    pub fn count(&self) -> usize {
        self.inner.count.load(Ordering::SeqCst)
    }

    /// Validate `args` against the spec and publish the result.
    ///
    /// Returns the bus receipt unchanged. Nothing is published when the spec
    /// rejects the arguments.
    pub fn emit<I>(&self, args: I) -> Result<B::Receipt, EmitError>
    where
        I: IntoIterator<Item = V>,
    {
        self.inner.count.fetch_add(1, Ordering::SeqCst);

        let inner = &*self.inner;
        let args = match inner.spec.evaluate(&inner.name, args.into_iter().collect()) {
            Ok(args) => args,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(event = %inner.name, error = %err, "emit rejected by arg spec");
                return Err(err);
            }
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(event = %inner.name, args = args.len(), "emitting event");

        inner
            .bus
            .publish(&inner.name, args)
            .map_err(EmitError::Delivery)
    }

    /// Emit the event without arguments.
    pub fn emit_empty(&self) -> Result<B::Receipt, EmitError> {
        self.emit(std::iter::empty())
    }
}

impl<V, B> Clone for Emitter<V, B> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V, B> fmt::Debug for Emitter<V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("name", &self.inner.name)
            .field("count", &self.inner.count.load(Ordering::SeqCst))
            .finish()
    }
}
