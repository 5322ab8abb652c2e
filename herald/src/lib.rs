//! # herald - Declarative Event Registration
//!
//! `herald` turns event declarations into pairs of entry points on top of an
//! existing publish/subscribe bus. Declaring `userSaved` yields:
//!
//! - an emitter, `userSaved`, that checks and transforms its arguments
//!   against the event's [`ArgSpec`] before publishing them
//! - a listener, `onUserSaved`, that subscribes handlers to the event and
//!   hands them the published arguments
//!
//! Both entry points keep an invocation counter.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use herald::prelude::*;
//! use serde_json::{Value, json};
//!
//! let mut registry = LocalRegistry::<Value>::default();
//! registry.register(["ready"])?;
//!
//! let sub = registry
//!     .listener("onReady")
//!     .unwrap()
//!     .listen(|args: &[Value]| println!("ready: {args:?}"));
//!
//! registry.emitter("ready").unwrap().emit([json!(1)])?;
//! sub.unsubscribe();
//! ```
//!
//! ## Manifests
//!
//! With the `manifest` feature (on by default) declarations can be loaded
//! from JSON, referencing transforms by name through a [`TransformCatalog`]:
//!
//! ```rust,ignore
//! let catalog = TransformCatalog::json();
//! let decls = Registrations::from_manifest_str(
//!     r#"{ "userSaved": ["string", "integer"] }"#,
//!     &catalog,
//! )?;
//! registry.register(decls)?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use herald_core::{
    // Spec
    ArgSpec,
    // Error types
    BoxError,
    // Transport
    Bus,
    BusCallback,
    EmitError,
    // Handler
    Handler,
    HandlerOutcome,
    HeraldError,
    // Payload
    Payload,
    RegistrationError,
    Transform,
    Unsubscribe,
    pass_through,
};

// Entry points
pub use herald_std::{
    emit::Emitter,
    listen::{EventListener, listener_name},
};

// Registration
pub use herald_std::registry::{
    DuplicatePolicy, EntryPoint, EventDeclaration, EventPair, EventRegistry, LocalRegistry,
    Registrations, RegistryBuilder,
};

// Transforms
pub use herald_std::catalog::{PASS_THROUGH, TransformCatalog, TransformError};

/// Bus implementations.
pub mod bus {
    pub use herald_std::bus::{Delivery, LocalBus, Published};
}

pub use bus::LocalBus;

/// Standard handler implementations.
pub mod handlers {
    pub use herald_std::handlers::LoggingHandler;
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use herald_std::testing::*;
}

/// Prelude module - common imports for Herald.
///
/// # Usage
///
/// ```rust,ignore
/// use herald::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        ArgSpec, BoxError, Bus, DuplicatePolicy, EmitError, Emitter, EventListener, EventPair,
        EventRegistry, Handler, HeraldError, LocalBus, LocalRegistry, Registrations,
        RegistrationError, Transform, TransformCatalog, Unsubscribe,
    };
}

#[cfg(feature = "manifest")]
pub use serde_json;
