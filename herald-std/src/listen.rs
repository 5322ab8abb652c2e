//! Listen entry points.
//!
//! An [`EventListener`] subscribes handlers to one event name. Handlers get
//! the published arguments only; the bus delivery context is dropped unless
//! the handler asks for it through [`EventListener::listen_with_context`].

use herald_core::{BoxError, Bus, BusCallback, Handler, HandlerOutcome, Payload};
use std::{
    fmt,
    marker::PhantomData,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Derive the listener service name for an event: `"on"` followed by the
/// event name with its first character uppercased.
///
/// ```rust,ignore
/// assert_eq!(listener_name("userSaved"), "onUserSaved");
/// ```
pub fn listener_name(event: &str) -> String {
    let mut chars = event.chars();
    match chars.next() {
        Some(first) => {
            let mut name = String::with_capacity(event.len() + 2);
            name.push_str("on");
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
            name
        }
        None => "on".to_string(),
    }
}

/// The listen entry point of a registered event.
///
/// Cloning is O(1); clones share the delivery counter.
pub struct EventListener<V, B> {
    event: Arc<str>,
    name: Arc<str>,
    bus: Arc<B>,
    count: Arc<AtomicUsize>,
    _payload: PhantomData<fn() -> V>,
}

impl<V: Payload, B: Bus<V>> EventListener<V, B> {
    /// Create the listen entry point for `event` on `bus`.
    pub fn new(event: impl Into<String>, bus: Arc<B>) -> Self {
        let event: String = event.into();
        Self {
            name: listener_name(&event).into(),
            event: event.into(),
            bus,
            count: Arc::new(AtomicUsize::new(0)),
            _payload: PhantomData,
        }
    }

    /// The derived listener name, e.g. `onUserSaved`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The event this entry point subscribes to.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// Number of deliveries handled through this entry point.
    ///
    /// Counts deliveries, not subscriptions. A delivery whose handler
    /// returned an error is not counted.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Subscribe `handler` to the event.
    ///
    /// Returns the bus subscription handle unchanged; the caller owns it and
    /// must use it to release the listener.
    pub fn listen<H>(&self, handler: H) -> B::Subscription
    where
        H: Handler<V>,
    {
        let count = Arc::clone(&self.count);
        let callback: BusCallback<B::Context, V> = Box::new(
            move |_ctx: &B::Context, args: &[V]| -> Result<(), BoxError> {
                handler.handle(args)?;
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        );
        self.bus.subscribe(&self.event, callback)
    }

    /// Subscribe a handler that also receives the bus delivery context.
    pub fn listen_with_context<F, R>(&self, handler: F) -> B::Subscription
    where
        F: Fn(&B::Context, &[V]) -> R + Send + Sync + 'static,
        R: HandlerOutcome,
    {
        let count = Arc::clone(&self.count);
        let callback: BusCallback<B::Context, V> = Box::new(
            move |ctx: &B::Context, args: &[V]| -> Result<(), BoxError> {
                handler(ctx, args).into_outcome()?;
                count.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        );
        self.bus.subscribe(&self.event, callback)
    }
}

impl<V, B> Clone for EventListener<V, B> {
    fn clone(&self) -> Self {
        Self {
            event: self.event.clone(),
            name: self.name.clone(),
            bus: self.bus.clone(),
            count: self.count.clone(),
            _payload: PhantomData,
        }
    }
}

impl<V, B> fmt::Debug for EventListener<V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListener")
            .field("name", &self.name)
            .field("event", &self.event)
            .field("count", &self.count.load(Ordering::SeqCst))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{Delivery, LocalBus};
    use herald_core::Unsubscribe;
    use std::sync::Mutex;

    #[test]
    fn test_listener_name() {
        assert_eq!(listener_name("foo"), "onFoo");
        assert_eq!(listener_name("userSaved"), "onUserSaved");
        assert_eq!(listener_name("$destroy"), "on$destroy");
        assert_eq!(listener_name("éclair"), "onÉclair");
        assert_eq!(listener_name("x"), "onX");
    }

    #[test]
    fn test_handler_gets_args_without_context() {
        let bus = Arc::new(LocalBus::<i32>::new());
        let listener = EventListener::new("foo", bus.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = listener.listen(move |args: &[i32]| {
            seen_clone.lock().unwrap().push(args.to_vec());
        });

        bus.publish("foo", vec![1, 2, 3]).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![vec![1, 2, 3]]);
        assert_eq!(listener.name(), "onFoo");
        assert_eq!(listener.event(), "foo");
    }

    #[test]
    fn test_count_tracks_deliveries_not_subscriptions() {
        let bus = Arc::new(LocalBus::<i32>::new());
        let listener = EventListener::new("foo", bus.clone());
        let first: Unsubscribe = listener.listen(|_args: &[i32]| {});
        let _second = listener.listen(|_args: &[i32]| {});
        assert_eq!(listener.count(), 0);

        bus.publish("foo", vec![]).unwrap();
        assert_eq!(listener.count(), 2);

        first.unsubscribe();
        bus.publish("foo", vec![]).unwrap();
        assert_eq!(listener.count(), 3);
    }

    #[test]
    fn test_failed_delivery_is_not_counted() {
        let bus = Arc::new(LocalBus::<i32>::new());
        let listener = EventListener::new("foo", bus.clone());
        let _sub = listener.listen(|_args: &[i32]| -> Result<(), std::io::Error> {
            Err(std::io::Error::other("rejected"))
        });

        assert!(bus.publish("foo", vec![1]).is_err());
        assert_eq!(listener.count(), 0);
    }

    #[test]
    fn test_listen_with_context() {
        let bus = Arc::new(LocalBus::<i32>::new());
        let listener = EventListener::new("foo", bus.clone());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = listener.listen_with_context(move |ctx: &Delivery, args: &[i32]| {
            seen_clone
                .lock()
                .unwrap()
                .push((ctx.event.to_string(), args.len()));
        });

        bus.publish("foo", vec![4, 5]).unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![("foo".to_string(), 2)]);
        assert_eq!(listener.count(), 1);
    }
}
