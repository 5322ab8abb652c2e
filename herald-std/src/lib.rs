//! # herald-std
//!
//! Standard implementations for the Herald event registration layer.
//!
//! This crate provides:
//! - **Entry points**: [`emit::Emitter`], [`listen::EventListener`]
//! - **Registration**: [`registry::EventRegistry`], [`registry::RegistryBuilder`]
//! - **Transport**: [`bus::LocalBus`], an in-process bus
//! - **Named transforms**: [`catalog::TransformCatalog`]
//! - **Manifests**: declarations loaded from JSON (feature `manifest`)
//! - **Standard handlers**: [`handlers::LoggingHandler`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use herald_core;

// Modules
pub mod bus;
pub mod catalog;
pub mod emit;
pub mod handlers;
pub mod listen;
#[cfg(feature = "manifest")]
pub mod manifest;
pub mod registry;
pub mod testing;
