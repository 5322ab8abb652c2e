//! Payload trait for event arguments.

/// A marker trait for values carried as event arguments.
///
/// Payloads must be cloneable and `Send + Sync + 'static` so entry points can
/// be shared freely across the application.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone)]
/// enum Arg { Id(u64), Label(String) }
///
/// // Covered by the blanket impl, nothing to write.
/// let registry = EventRegistry::<Arg, _>::new(LocalBus::new());
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid Payload",
    label = "must be `Clone + Send + Sync + 'static`",
    note = "Event arguments are shared between listeners and must be thread-safe and cloneable."
)]
pub trait Payload: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Payload for T {}
