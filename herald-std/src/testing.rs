//! Testing utilities for Herald.
//!
//! This module provides utilities to make testing emitters, listeners and
//! transports easier.
//!
//! # Features
//!
//! - [`RecordingHandler`]: A handler that records the arguments of every delivery
//! - [`CountingHandler`]: A handler that only counts deliveries
//! - [`FailingHandler`]: A handler that always fails
//! - [`TransformProbe`]: A transform that records the positions it was applied to

use herald_core::{BoxError, Handler, Payload, Transform};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Recording Handler
// ============================================================================

/// A handler that records the arguments of every delivery it receives.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = RecordingHandler::<Value>::new();
/// let _sub = on_saved.listen(recorder.clone());
///
/// saved.emit([json!("ada")])?;
///
/// assert_eq!(recorder.calls(), vec![vec![json!("ada")]]);
/// ```
pub struct RecordingHandler<V> {
    calls: Arc<Mutex<Vec<Vec<V>>>>,
}

impl<V: Clone> RecordingHandler<V> {
    /// Create a new recording handler.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a clone of the recorded argument lists.
    pub fn calls(&self) -> Vec<Vec<V>> {
        self.calls.lock().unwrap().clone()
    }

    /// Get the arguments of the most recent delivery.
    pub fn last(&self) -> Option<Vec<V>> {
        self.calls.lock().unwrap().last().cloned()
    }

    /// Get the number of recorded deliveries.
    pub fn count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Clear all recorded deliveries.
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl<V: Clone> Default for RecordingHandler<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for RecordingHandler<V> {
    fn clone(&self) -> Self {
        Self {
            calls: self.calls.clone(),
        }
    }
}

impl<V: Payload> Handler<V> for RecordingHandler<V> {
    fn handle(&self, args: &[V]) -> Result<(), BoxError> {
        self.calls.lock().unwrap().push(args.to_vec());
        Ok(())
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingHandler::new();
/// let _sub = on_tick.listen(counter.clone());
///
/// tick.emit_empty()?;
///
/// assert_eq!(counter.count(), 1);
/// ```
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self {
            count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }
}

impl Default for CountingHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CountingHandler {
    fn clone(&self) -> Self {
        Self {
            count: self.count.clone(),
        }
    }
}

impl<V> Handler<V> for CountingHandler {
    fn handle(&self, _args: &[V]) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ============================================================================
// Failing Handler
// ============================================================================

/// A handler that fails every delivery with a fixed message.
#[derive(Clone)]
pub struct FailingHandler {
    message: String,
    attempts: Arc<AtomicUsize>,
}

impl FailingHandler {
    /// Create a handler failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of deliveries attempted.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl<V> Handler<V> for FailingHandler {
    fn handle(&self, _args: &[V]) -> Result<(), BoxError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(self.message.clone().into())
    }
}

// ============================================================================
// Transform Probe
// ============================================================================

/// A pass-through transform that records the positions it is applied to.
///
/// Useful to assert that a rejected emit never reached a transform.
#[derive(Clone, Default)]
pub struct TransformProbe {
    positions: Arc<Mutex<Vec<usize>>>,
}

impl TransformProbe {
    /// Create a new probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// A pass-through transform reporting to this probe.
    pub fn transform<V: Payload>(&self) -> Transform<V> {
        let positions = self.positions.clone();
        Transform::new(move |value, position| {
            positions.lock().unwrap().push(position);
            value
        })
    }

    /// Positions seen so far, in call order.
    pub fn positions(&self) -> Vec<usize> {
        self.positions.lock().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_handler_shares_state() {
        let recorder = RecordingHandler::<i32>::new();
        let clone = recorder.clone();
        clone.handle(&[1, 2]).unwrap();
        assert_eq!(recorder.calls(), vec![vec![1, 2]]);
        assert_eq!(recorder.last(), Some(vec![1, 2]));
        recorder.clear();
        assert_eq!(clone.count(), 0);
    }

    #[test]
    fn test_failing_handler() {
        let handler = FailingHandler::new("bad input");
        let err = Handler::<i32>::handle(&handler, &[]).unwrap_err();
        assert_eq!(err.to_string(), "bad input");
        assert_eq!(handler.attempts(), 1);
    }

    #[test]
    fn test_probe_records_positions() {
        let probe = TransformProbe::new();
        let transform = probe.transform::<i32>();
        transform.apply(1, 0).unwrap();
        transform.apply(1, 4).unwrap();
        assert_eq!(probe.positions(), vec![0, 4]);
    }
}
