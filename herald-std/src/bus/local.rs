//! In-process bus.

use herald_core::{BoxError, Bus, BusCallback, Payload, Unsubscribe};
use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, PoisonError, RwLock, Weak,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

/// Context handed to every callback of one publish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Name the event was published under.
    pub event: Arc<str>,
    /// Bus-wide publish sequence number, starting at 1.
    pub sequence: u64,
}

/// Receipt returned by [`LocalBus::publish`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    /// Name the event was published under.
    pub event: Arc<str>,
    /// Bus-wide publish sequence number, starting at 1.
    pub sequence: u64,
    /// Number of callbacks that completed.
    pub delivered: usize,
}

type Callback<V> = Arc<dyn Fn(&Delivery, &[V]) -> Result<(), BoxError> + Send + Sync>;

struct Slot<V> {
    id: u64,
    active: Arc<AtomicBool>,
    callback: Callback<V>,
}

impl<V> Clone for Slot<V> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            active: self.active.clone(),
            callback: self.callback.clone(),
        }
    }
}

struct Inner<V> {
    channels: RwLock<HashMap<String, Vec<Slot<V>>>>,
    next_id: AtomicU64,
    sequence: AtomicU64,
}

/// A synchronous, in-process publish/subscribe bus.
///
/// - Publishing walks the listeners of one name in subscription order and
///   returns after the last one.
/// - No lock is held while a callback runs: callbacks may publish, subscribe
///   or unsubscribe re-entrantly.
/// - A listener removed during a publish is skipped for the rest of it.
/// - The first callback error stops the walk and is returned to the publisher.
///
/// Cloning is O(1); clones share the same listeners.
pub struct LocalBus<V> {
    inner: Arc<Inner<V>>,
}

impl<V: Payload> LocalBus<V> {
    /// Create an empty bus.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                channels: RwLock::new(HashMap::new()),
                next_id: AtomicU64::new(0),
                sequence: AtomicU64::new(0),
            }),
        }
    }

    /// Number of listeners currently subscribed to `name`.
    pub fn listener_count(&self, name: &str) -> usize {
        self.inner
            .channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .map_or(0, Vec::len)
    }

    /// Names with at least one listener.
    pub fn channels(&self) -> Vec<String> {
        self.inner
            .channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn snapshot(&self, name: &str) -> Vec<Slot<V>> {
        self.inner
            .channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

fn remove_slot<V>(inner: &Weak<Inner<V>>, name: &str, id: u64) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    let mut channels = inner
        .channels
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    if let Some(slots) = channels.get_mut(name) {
        slots.retain(|slot| slot.id != id);
        if slots.is_empty() {
            channels.remove(name);
        }
    }
}

impl<V: Payload> Bus<V> for LocalBus<V> {
    type Context = Delivery;
    type Receipt = Published;
    type Subscription = Unsubscribe;

    fn publish(&self, name: &str, args: Vec<V>) -> Result<Published, BoxError> {
        let sequence = self.inner.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let slots = self.snapshot(name);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            event = name,
            sequence,
            listeners = slots.len(),
            args = args.len(),
            "publishing event"
        );

        let delivery = Delivery {
            event: Arc::from(name),
            sequence,
        };
        let mut delivered = 0;
        for slot in &slots {
            if !slot.active.load(Ordering::Acquire) {
                continue;
            }
            (slot.callback)(&delivery, &args)?;
            delivered += 1;
        }

        Ok(Published {
            event: delivery.event,
            sequence,
            delivered,
        })
    }

    fn subscribe(&self, name: &str, callback: BusCallback<Delivery, V>) -> Unsubscribe {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        let slot = Slot {
            id,
            active: active.clone(),
            callback: Arc::from(callback),
        };
        self.inner
            .channels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name.to_string())
            .or_default()
            .push(slot);

        #[cfg(feature = "tracing")]
        tracing::debug!(event = name, id, "listener subscribed");

        let inner = Arc::downgrade(&self.inner);
        let name = name.to_string();
        Unsubscribe::new(move || {
            active.store(false, Ordering::Release);
            remove_slot(&inner, &name, id);

            #[cfg(feature = "tracing")]
            tracing::debug!(event = %name, id, "listener unsubscribed");
        })
    }
}

impl<V: Payload> Default for LocalBus<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for LocalBus<V> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<V> fmt::Debug for LocalBus<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channels = self
            .inner
            .channels
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len();
        f.debug_struct("LocalBus")
            .field("channels", &channels)
            .finish()
    }
}
