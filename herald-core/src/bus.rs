//! # Transport Layer (Bus)
//!
//! Herald does not deliver events itself. Entry points publish and subscribe
//! through a [`Bus`], the publish/subscribe transport supplied by the host
//! application. `herald-std` ships an in-process implementation.
//!
//! # Contract
//!
//! - `publish` delivers synchronously to every listener currently subscribed
//!   to the name, in subscription order, before returning.
//! - `subscribe` registers a [`BusCallback`] and returns a handle that
//!   removes it again.
//! - The callback receives the transport's delivery context and the
//!   published arguments as two separate parameters.

use crate::{error::BoxError, payload::Payload};
use std::fmt;

/// Callback registered with a bus: `(delivery context, published arguments)`.
pub type BusCallback<C, V> = Box<dyn Fn(&C, &[V]) -> Result<(), BoxError> + Send + Sync>;

/// A publish/subscribe transport keyed by event name.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Bus` for payload `{V}`",
    label = "missing `Bus` implementation",
    note = "A Bus must implement `publish` and `subscribe` for `{V}`."
)]
pub trait Bus<V: Payload>: Send + Sync + 'static {
    /// Per-delivery context handed to callbacks next to the payload.
    type Context: 'static;

    /// What `publish` reports back. Emit entry points return it unchanged.
    type Receipt;

    /// Handle returned by `subscribe`. Listen entry points return it unchanged.
    type Subscription;

    /// Publish `args` under `name` to every current subscriber.
    fn publish(&self, name: &str, args: Vec<V>) -> Result<Self::Receipt, BoxError>;

    /// Subscribe `callback` to `name`.
    fn subscribe(&self, name: &str, callback: BusCallback<Self::Context, V>)
    -> Self::Subscription;
}

/// A one-shot handle that removes a subscription.
///
/// Dropping the handle keeps the subscription alive; the owner decides when
/// to call [`Unsubscribe::unsubscribe`].
#[must_use = "keep the handle to be able to unsubscribe later"]
pub struct Unsubscribe {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Unsubscribe {
    /// Create a handle that runs `release` when unsubscribing.
    pub fn new<F>(release: F) -> Self
    where
        F: FnOnce() + Send + Sync + 'static,
    {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A handle that does nothing.
    pub fn noop() -> Self {
        Self { release: None }
    }

    /// Remove the subscription.
    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    /// Turn the handle into a plain closure.
    pub fn into_fn(self) -> impl FnOnce() + Send + Sync {
        move || self.unsubscribe()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    #[test]
    fn test_unsubscribe_runs_release_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let handle = Unsubscribe::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        handle.unsubscribe();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_does_not_release() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let handle = Unsubscribe::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });
        drop(handle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_into_fn() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let release = Unsubscribe::new(move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        })
        .into_fn();
        release();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
