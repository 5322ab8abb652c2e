//! # herald-core
//!
//! Core traits for the Herald event registration layer.
//!
//! This crate has minimal dependencies and is designed to be imported by
//! transports and extensions that don't need the full `herald-std`
//! implementation.
//!
//! # Building Blocks
//!
//! Herald turns one event declaration (a name plus an argument spec) into a
//! pair of entry points: one that emits the event and one that listens to it.
//! The pieces those entry points are made of live here.
//!
//! ## Argument Specs ([`ArgSpec`])
//!
//! Raw arguments pass through an [`ArgSpec`] before they are published. A
//! spec is either one [`Transform`] for every position or one per position.
//! Emitters and listeners share the spec, so they cannot disagree on the
//! count, order or meaning of the arguments.
//!
//! ## Transport ([`Bus`])
//!
//! The publish/subscribe mechanism underneath. Herald never delivers events
//! itself; it publishes and subscribes through whatever [`Bus`] the host
//! provides.
//!
//! ## Handlers ([`Handler`])
//!
//! User code receiving the transformed arguments. Plain closures work.
//!
//! # Error Types
//!
//! - [`HeraldError`] - Top-level error type
//! - [`RegistrationError`] - Declaration errors
//! - [`EmitError`] - Emit-time errors

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod bus;
mod error;
mod handler;
mod payload;
mod spec;

// Re-exports
pub use bus::{Bus, BusCallback, Unsubscribe};
pub use error::{BoxError, EmitError, HeraldError, RegistrationError};
pub use handler::{Handler, HandlerOutcome};
pub use payload::Payload;
pub use spec::{ArgSpec, Transform, pass_through};
