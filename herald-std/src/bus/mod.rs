//! Bus implementations.
//!
//! [`LocalBus`] is a synchronous in-process transport. Hosts with their own
//! publish/subscribe mechanism implement [`Bus`](herald_core::Bus) instead.

pub mod local;

pub use local::{Delivery, LocalBus, Published};
