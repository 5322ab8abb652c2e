//! # Event Registry
//!
//! The registry turns event declarations into entry point pairs and keeps
//! them addressable by name:
//!
//! - the [`Emitter`] under the event's own name (`userSaved`)
//! - the [`EventListener`] under the derived listener name (`onUserSaved`)
//!
//! The registry is an ordinary value owned by the application's composition
//! root. Registration usually happens once at startup.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut registry = EventRegistry::new(LocalBus::new());
//! registry.register(["ready", "shutdown"])?;
//! registry.register(vec![("resize", ArgSpec::positional([width, height]))])?;
//!
//! let on_resize = registry.listener("onResize").unwrap();
//! let sub = on_resize.listen(|args: &[Value]| println!("{args:?}"));
//! registry.emitter("resize").unwrap().emit([json!(800), json!(600)])?;
//! sub.unsubscribe();
//! ```

use crate::{
    bus::LocalBus,
    emit::Emitter,
    listen::{EventListener, listener_name},
};
use herald_core::{ArgSpec, Bus, Payload, RegistrationError, Transform};
use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::Arc,
};

// ============================================================================
// Declarations
// ============================================================================

/// One event to register: a name and the spec for its arguments.
pub struct EventDeclaration<V> {
    /// Event name. Must not be empty.
    pub name: String,
    /// Spec applied to raw arguments at emit time.
    pub spec: ArgSpec<V>,
}

impl<V: Payload> EventDeclaration<V> {
    /// Declare an event with the given spec.
    pub fn new(name: impl Into<String>, spec: impl Into<ArgSpec<V>>) -> Self {
        Self {
            name: name.into(),
            spec: spec.into(),
        }
    }

    /// Declare an event whose arguments are published unchanged.
    pub fn pass_through(name: impl Into<String>) -> Self {
        Self::new(name, ArgSpec::pass_through())
    }
}

/// Input accepted by [`EventRegistry::register`].
pub enum Registrations<V> {
    /// Event names, each registered with the pass-through spec.
    Names(Vec<String>),
    /// Event names with their own specs, in declaration order.
    Specs(Vec<(String, ArgSpec<V>)>),
}

impl<V: Payload> Registrations<V> {
    /// Pass-through registrations for `names`.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Registrations::Names(names.into_iter().map(Into::into).collect())
    }

    /// Registrations with explicit specs.
    pub fn specs<I, S, A>(specs: I) -> Self
    where
        I: IntoIterator<Item = (S, A)>,
        S: Into<String>,
        A: Into<ArgSpec<V>>,
    {
        Registrations::Specs(
            specs
                .into_iter()
                .map(|(name, spec)| (name.into(), spec.into()))
                .collect(),
        )
    }

    /// Number of events declared.
    pub fn len(&self) -> usize {
        match self {
            Registrations::Names(names) => names.len(),
            Registrations::Specs(specs) => specs.len(),
        }
    }

    /// Whether nothing is declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into declarations.
    pub fn into_declarations(self) -> Vec<EventDeclaration<V>> {
        match self {
            Registrations::Names(names) => names
                .into_iter()
                .map(EventDeclaration::pass_through)
                .collect(),
            Registrations::Specs(specs) => specs
                .into_iter()
                .map(|(name, spec)| EventDeclaration { name, spec })
                .collect(),
        }
    }
}

impl<V> fmt::Debug for Registrations<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Registrations::Names(names) => f.debug_tuple("Names").field(names).finish(),
            Registrations::Specs(specs) => f.debug_tuple("Specs").field(specs).finish(),
        }
    }
}

impl<V> fmt::Debug for EventDeclaration<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDeclaration")
            .field("name", &self.name)
            .field("spec", &self.spec)
            .finish()
    }
}

impl<V: Payload> From<&str> for Registrations<V> {
    fn from(name: &str) -> Self {
        Registrations::Names(vec![name.to_string()])
    }
}

impl<V: Payload> From<String> for Registrations<V> {
    fn from(name: String) -> Self {
        Registrations::Names(vec![name])
    }
}

impl<V: Payload> From<Vec<&str>> for Registrations<V> {
    fn from(names: Vec<&str>) -> Self {
        Registrations::names(names)
    }
}

impl<V: Payload> From<Vec<String>> for Registrations<V> {
    fn from(names: Vec<String>) -> Self {
        Registrations::Names(names)
    }
}

impl<V: Payload, const N: usize> From<[&str; N]> for Registrations<V> {
    fn from(names: [&str; N]) -> Self {
        Registrations::names(names)
    }
}

impl<V: Payload> From<Vec<(&str, ArgSpec<V>)>> for Registrations<V> {
    fn from(specs: Vec<(&str, ArgSpec<V>)>) -> Self {
        Registrations::specs(specs)
    }
}

impl<V: Payload> From<Vec<(String, ArgSpec<V>)>> for Registrations<V> {
    fn from(specs: Vec<(String, ArgSpec<V>)>) -> Self {
        Registrations::Specs(specs)
    }
}

impl<V: Payload, const N: usize> From<[(&str, ArgSpec<V>); N]> for Registrations<V> {
    fn from(specs: [(&str, ArgSpec<V>); N]) -> Self {
        Registrations::specs(specs)
    }
}

impl<V: Payload> From<EventDeclaration<V>> for Registrations<V> {
    fn from(declaration: EventDeclaration<V>) -> Self {
        Registrations::Specs(vec![(declaration.name, declaration.spec)])
    }
}

impl<V: Payload> From<Vec<EventDeclaration<V>>> for Registrations<V> {
    fn from(declarations: Vec<EventDeclaration<V>>) -> Self {
        Registrations::Specs(declarations.into_iter().map(|d| (d.name, d.spec)).collect())
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// The two entry points generated for one event.
pub struct EventPair<V, B> {
    /// Emits the event.
    pub emit: Emitter<V, B>,
    /// Subscribes to the event.
    pub listen: EventListener<V, B>,
}

impl<V, B> Clone for EventPair<V, B> {
    fn clone(&self) -> Self {
        Self {
            emit: self.emit.clone(),
            listen: self.listen.clone(),
        }
    }
}

impl<V, B> fmt::Debug for EventPair<V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventPair")
            .field("emit", &self.emit)
            .field("listen", &self.listen)
            .finish()
    }
}

/// An entry point found by service name.
pub enum EntryPoint<'a, V, B> {
    /// Found under an event name.
    Emit(&'a Emitter<V, B>),
    /// Found under a derived listener name.
    Listen(&'a EventListener<V, B>),
}

impl<V, B> fmt::Debug for EntryPoint<'_, V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryPoint::Emit(emit) => f.debug_tuple("Emit").field(emit).finish(),
            EntryPoint::Listen(listen) => f.debug_tuple("Listen").field(listen).finish(),
        }
    }
}

/// What happens when an event name is registered a second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`RegistrationError::AlreadyRegistered`].
    #[default]
    Reject,
    /// Replace the registered pair with a fresh one. Entry points handed out
    /// earlier keep working against the bus but are no longer discoverable.
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Service {
    Emit(usize),
    Listen(usize),
}

// ============================================================================
// RegistryBuilder
// ============================================================================

/// Builder for constructing an [`EventRegistry`].
///
/// # Example
/// ```ignore
/// let registry = EventRegistry::builder(LocalBus::new())
///     .duplicate_policy(DuplicatePolicy::Replace)
///     .declare(["ready", "shutdown"])
///     .declare(vec![("resize", resize_spec)])
///     .build()?;
/// ```
pub struct RegistryBuilder<V, B> {
    bus: B,
    policy: DuplicatePolicy,
    pending: Vec<EventDeclaration<V>>,
}

impl<V: Payload, B: Bus<V>> RegistryBuilder<V, B> {
    /// Start a builder publishing through `bus`.
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            policy: DuplicatePolicy::default(),
            pending: Vec::new(),
        }
    }

    /// Set the duplicate policy.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Queue declarations to register on build.
    pub fn declare(mut self, registrations: impl Into<Registrations<V>>) -> Self {
        self.pending
            .extend(registrations.into().into_declarations());
        self
    }

    /// Get the number of queued declarations.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Build the registry, registering every queued declaration at once.
    pub fn build(self) -> Result<EventRegistry<V, B>, RegistrationError> {
        let mut registry = EventRegistry {
            bus: Arc::new(self.bus),
            policy: self.policy,
            pairs: Vec::new(),
            services: HashMap::new(),
        };
        registry.register(Registrations::Specs(
            self.pending.into_iter().map(|d| (d.name, d.spec)).collect(),
        ))?;
        Ok(registry)
    }
}

// ============================================================================
// EventRegistry
// ============================================================================

/// Registered events and their entry points.
pub struct EventRegistry<V, B> {
    bus: Arc<B>,
    policy: DuplicatePolicy,
    pairs: Vec<EventPair<V, B>>,
    services: HashMap<String, Service>,
}

/// A registry on the in-process [`LocalBus`].
pub type LocalRegistry<V> = EventRegistry<V, LocalBus<V>>;

impl<V: Payload, B: Bus<V>> EventRegistry<V, B> {
    /// Create an empty registry with default settings.
    pub fn new(bus: B) -> Self {
        Self {
            bus: Arc::new(bus),
            policy: DuplicatePolicy::default(),
            pairs: Vec::new(),
            services: HashMap::new(),
        }
    }

    /// Start a [`RegistryBuilder`].
    pub fn builder(bus: B) -> RegistryBuilder<V, B> {
        RegistryBuilder::new(bus)
    }

    /// The identity transform, usable directly as a uniform spec.
    pub fn pass_through() -> Transform<V> {
        Transform::pass_through()
    }

    /// The bus entry points publish through.
    pub fn bus(&self) -> &Arc<B> {
        &self.bus
    }

    /// The duplicate policy in effect.
    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Register events and return their entry point pairs in declaration
    /// order.
    ///
    /// The whole batch is checked first; when any declaration is rejected
    /// nothing is registered.
    pub fn register(
        &mut self,
        registrations: impl Into<Registrations<V>>,
    ) -> Result<Vec<EventPair<V, B>>, RegistrationError> {
        let declarations = registrations.into().into_declarations();
        self.check(&declarations)?;

        let pairs: Vec<_> = declarations
            .into_iter()
            .map(|declaration| self.insert(declaration))
            .collect();

        #[cfg(feature = "tracing")]
        tracing::info!(
            registered = pairs.len(),
            total = self.pairs.len(),
            "events registered"
        );

        Ok(pairs)
    }

    fn check(&self, declarations: &[EventDeclaration<V>]) -> Result<(), RegistrationError> {
        let mut batch: HashSet<String> = HashSet::new();
        for declaration in declarations {
            let name = declaration.name.as_str();
            if name.is_empty() {
                return Err(RegistrationError::InvalidRegistrationInput(
                    "event names must not be empty".to_string(),
                ));
            }
            let on_name = listener_name(name);

            if !batch.insert(name.to_string()) || !batch.insert(on_name.clone()) {
                return Err(RegistrationError::AlreadyRegistered(name.to_string()));
            }

            let same_event = match self.services.get(name) {
                None => false,
                Some(Service::Emit(_)) => true,
                Some(Service::Listen(_)) => {
                    return Err(RegistrationError::AlreadyRegistered(name.to_string()));
                }
            };
            match self.services.get(&on_name) {
                None => {}
                Some(Service::Listen(index)) if self.pairs[*index].emit.name() == name => {}
                Some(_) => return Err(RegistrationError::AlreadyRegistered(name.to_string())),
            }

            if same_event && self.policy == DuplicatePolicy::Reject {
                return Err(RegistrationError::AlreadyRegistered(name.to_string()));
            }
        }
        Ok(())
    }

    fn insert(&mut self, declaration: EventDeclaration<V>) -> EventPair<V, B> {
        let EventDeclaration { name, spec } = declaration;
        let pair = EventPair {
            emit: Emitter::new(name.clone(), spec, Arc::clone(&self.bus)),
            listen: EventListener::new(name.clone(), Arc::clone(&self.bus)),
        };

        match self.services.get(&name).copied() {
            Some(Service::Emit(index)) => {
                #[cfg(feature = "tracing")]
                tracing::debug!(event = %name, "replacing registered event");
                self.pairs[index] = pair.clone();
            }
            _ => {
                #[cfg(feature = "tracing")]
                tracing::debug!(event = %name, listener = pair.listen.name(), "registering event");
                let index = self.pairs.len();
                self.services
                    .insert(pair.listen.name().to_string(), Service::Listen(index));
                self.services.insert(name, Service::Emit(index));
                self.pairs.push(pair.clone());
            }
        }
        pair
    }

    /// The emit entry point registered under `event`.
    pub fn emitter(&self, event: &str) -> Option<&Emitter<V, B>> {
        match self.services.get(event)? {
            Service::Emit(index) => Some(&self.pairs[*index].emit),
            Service::Listen(_) => None,
        }
    }

    /// The listen entry point registered under `listener` (e.g. `onFoo`).
    pub fn listener(&self, listener: &str) -> Option<&EventListener<V, B>> {
        match self.services.get(listener)? {
            Service::Listen(index) => Some(&self.pairs[*index].listen),
            Service::Emit(_) => None,
        }
    }

    /// Look up either kind of entry point by service name.
    pub fn resolve(&self, service: &str) -> Option<EntryPoint<'_, V, B>> {
        Some(match self.services.get(service)? {
            Service::Emit(index) => EntryPoint::Emit(&self.pairs[*index].emit),
            Service::Listen(index) => EntryPoint::Listen(&self.pairs[*index].listen),
        })
    }

    /// Both entry points of `event`.
    pub fn pair(&self, event: &str) -> Option<&EventPair<V, B>> {
        match self.services.get(event)? {
            Service::Emit(index) => Some(&self.pairs[*index]),
            Service::Listen(_) => None,
        }
    }

    /// Whether `event` is registered.
    pub fn contains(&self, event: &str) -> bool {
        matches!(self.services.get(event), Some(Service::Emit(_)))
    }

    /// Registered event names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|pair| pair.emit.name())
    }

    /// Iterate over all pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &EventPair<V, B>> {
        self.pairs.iter()
    }

    /// Get the number of registered events.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Check if no event is registered.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<V: Payload> Default for EventRegistry<V, LocalBus<V>> {
    fn default() -> Self {
        Self::new(LocalBus::new())
    }
}

impl<V, B> fmt::Debug for EventRegistry<V, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventRegistry")
            .field("policy", &self.policy)
            .field("events", &self.pairs.len())
            .finish()
    }
}
