//! # Handlers
//!
//! The terminal point of an event: user code that receives the already
//! transformed arguments of a delivery.
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|args: &[V]| { ... }`
//! 2. **Fallible closure**: `|args: &[V]| -> Result<(), MyError> { ... }`
//! 3. **Struct implementation**: `impl Handler<V> for MyHandler`

use crate::error::BoxError;

/// Trait for converting a handler's return value into a delivery outcome.
///
/// # Default Implementations
///
/// - `()` → success
/// - `Result<(), E>` → success or the boxed error
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `HandlerOutcome`",
    label = "handlers must return `()` or `Result<(), E>`",
    note = "HandlerOutcome must implement the `into_outcome` method."
)]
pub trait HandlerOutcome {
    /// Convert the return value.
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl HandlerOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> HandlerOutcome for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

/// Receives the arguments of each delivered event.
///
/// Arity is not checked; a handler that expects more arguments than were
/// published sees a shorter slice.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle event arguments of type `{V}`",
    label = "missing `Handler<{V}>` implementation",
    note = "Handlers must implement the `handle` method for arguments of type `{V}`."
)]
pub trait Handler<V>: Send + Sync + 'static {
    /// Handle one delivery.
    fn handle(&self, args: &[V]) -> Result<(), BoxError>;
}

// Blanket impl for closures
impl<F, V, R> Handler<V> for F
where
    F: Fn(&[V]) -> R + Send + Sync + 'static,
    R: HandlerOutcome,
{
    fn handle(&self, args: &[V]) -> Result<(), BoxError> {
        (self)(args).into_outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call<V, H: Handler<V>>(handler: &H, args: &[V]) -> Result<(), BoxError> {
        handler.handle(args)
    }

    #[test]
    fn test_unit_closure() {
        let result = call(&|args: &[i32]| assert_eq!(args, &[1, 2]), &[1, 2]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_fallible_closure() {
        let handler = |args: &[i32]| -> Result<(), std::io::Error> {
            if args.is_empty() {
                Err(std::io::Error::other("no arguments"))
            } else {
                Ok(())
            }
        };
        assert!(call(&handler, &[1]).is_ok());
        let err = call(&handler, &[]).unwrap_err();
        assert_eq!(err.to_string(), "no arguments");
    }
}
