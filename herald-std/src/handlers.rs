//! Handler wrappers.

use herald_core::{BoxError, Handler};
use std::fmt::Debug;

/// A handler wrapper that logs every delivery before passing it on.
///
/// Logging needs the `tracing` feature; without it the wrapper only
/// delegates.
pub struct LoggingHandler<H> {
    inner: H,
    label: &'static str,
}

impl<H> LoggingHandler<H> {
    /// Wrap `inner`, tagging log lines with `label`.
    pub const fn new(inner: H, label: &'static str) -> Self {
        Self { inner, label }
    }

    /// The label used in log lines.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl<V, H> Handler<V> for LoggingHandler<H>
where
    V: Debug,
    H: Handler<V>,
{
    fn handle(&self, args: &[V]) -> Result<(), BoxError> {
        #[cfg(feature = "tracing")]
        tracing::info!(handler = self.label, ?args, "handling event");

        let result = self.inner.handle(args);

        #[cfg(feature = "tracing")]
        if let Err(err) = &result {
            tracing::warn!(handler = self.label, error = %err, "handler failed");
        }

        result
    }
}
