//! Error types for Herald.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`HeraldError`] - Top-level error type for all Herald operations
//! - [`RegistrationError`] - Errors while declaring events
//! - [`EmitError`] - Errors while emitting an event

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Herald operations.
#[derive(Error, Debug)]
pub enum HeraldError {
    /// An error occurred while registering events.
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// An error occurred while emitting an event.
    #[error("emit error: {0}")]
    Emit(#[from] EmitError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors raised by the registry before any entry point is created.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// The argument spec for an event could not be resolved to transforms.
    #[error("no arg spec defined for event `{event}`: {reason}")]
    InvalidArgSpec {
        /// The offending event.
        event: String,
        /// What was found instead of a transform or a list of transforms.
        reason: String,
    },

    /// The declaration input had an unsupported shape.
    #[error("invalid registration input: {0}")]
    InvalidRegistrationInput(String),

    /// A service name is already taken by an earlier registration.
    #[error("event already registered: {0}")]
    AlreadyRegistered(String),
}

/// Errors raised by an emit entry point.
///
/// Validation errors are always returned before anything is published.
#[derive(Error, Debug)]
pub enum EmitError {
    /// More arguments were supplied than the positional spec has transforms.
    #[error("event `{event}` accepts at most {expected} argument(s), got {supplied}")]
    ArgumentSpecMismatch {
        /// The event being emitted.
        event: String,
        /// Number of transforms in the positional spec.
        expected: usize,
        /// Number of arguments supplied.
        supplied: usize,
    },

    /// A caller-supplied transform failed. The error is passed through as is.
    #[error(transparent)]
    Transform(BoxError),

    /// The transport reported a failure while delivering (usually a handler error).
    #[error(transparent)]
    Delivery(BoxError),
}

impl EmitError {
    /// Returns `true` if the error was raised before publishing.
    pub fn is_validation(&self) -> bool {
        !matches!(self, EmitError::Delivery(_))
    }
}

// Convenience conversions
impl From<BoxError> for HeraldError {
    fn from(err: BoxError) -> Self {
        HeraldError::Custom(err)
    }
}
