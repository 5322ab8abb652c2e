#![allow(dead_code)]

use herald::{
    BoxError, LocalRegistry, Transform,
    bus::{Delivery, LocalBus},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

// ============================================================================
// Registries
// ============================================================================

pub type JsonRegistry = LocalRegistry<Value>;

pub fn json_registry() -> JsonRegistry {
    LocalRegistry::default()
}

// ============================================================================
// Transforms
// ============================================================================

/// Wraps every argument as `"<tag>(<arg>,<position>)"`.
pub fn tagging(tag: &'static str) -> Transform<Value> {
    Transform::new(move |value: Value, position| Value::String(format!("{tag}({value},{position})")))
}

// ============================================================================
// Raw bus taps
// ============================================================================

/// Everything published on one bus name, as seen underneath the registry.
#[derive(Clone, Default)]
pub struct BusTap {
    pub seen: Arc<Mutex<Vec<(String, Vec<Value>)>>>,
}

impl BusTap {
    pub fn attach(bus: &LocalBus<Value>, name: &str) -> Self {
        let tap = Self::default();
        let seen = tap.seen.clone();
        let _ = herald::Bus::subscribe(
            bus,
            name,
            Box::new(move |ctx: &Delivery, args: &[Value]| -> Result<(), BoxError> {
                seen.lock().unwrap().push((ctx.event.to_string(), args.to_vec()));
                Ok(())
            }),
        );
        tap
    }

    pub fn published(&self) -> Vec<(String, Vec<Value>)> {
        self.seen.lock().unwrap().clone()
    }
}
