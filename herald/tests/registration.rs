use herald::{
    ArgSpec, DuplicatePolicy, EmitError, EntryPoint, EventRegistry, LocalBus, Registrations,
    RegistrationError, testing::RecordingHandler,
};
use serde_json::{Value, json};

mod common;
use common::{BusTap, json_registry, tagging};

#[test]
fn test_name_registration_publishes_unchanged() {
    let mut registry = json_registry();
    registry.register("foo").unwrap();
    let tap = BusTap::attach(registry.bus(), "foo");

    registry
        .emitter("foo")
        .unwrap()
        .emit([json!(1), json!(2), json!(3)])
        .unwrap();

    assert_eq!(
        tap.published(),
        vec![("foo".to_string(), vec![json!(1), json!(2), json!(3)])]
    );
}

#[test]
fn test_uniform_transform_sees_positions() {
    let mut registry = json_registry();
    registry
        .register(vec![("foo", ArgSpec::from(tagging("f")))])
        .unwrap();
    let tap = BusTap::attach(registry.bus(), "foo");

    registry
        .emitter("foo")
        .unwrap()
        .emit([json!("a"), json!("b")])
        .unwrap();

    assert_eq!(
        tap.published()[0].1,
        vec![json!("f(\"a\",0)"), json!("f(\"b\",1)")]
    );
}

#[test]
fn test_positional_spec_and_mismatch() {
    let mut registry = json_registry();
    registry
        .register(vec![(
            "foo",
            ArgSpec::positional([tagging("f0"), tagging("f1")]),
        )])
        .unwrap();
    let tap = BusTap::attach(registry.bus(), "foo");
    let foo = registry.emitter("foo").unwrap();

    foo.emit([json!(1), json!(2)]).unwrap();
    assert_eq!(tap.published()[0].1, vec![json!("f0(1,0)"), json!("f1(2,1)")]);

    let err = foo.emit([json!(1), json!(2), json!(3)]).unwrap_err();
    assert!(matches!(
        err,
        EmitError::ArgumentSpecMismatch {
            expected: 2,
            supplied: 3,
            ..
        }
    ));
    assert_eq!(tap.published().len(), 1);
    assert_eq!(foo.count(), 2);
}

#[test]
fn test_names_produce_independent_pairs() {
    let mut registry = json_registry();
    let pairs = registry.register(["a", "b"]).unwrap();

    assert_eq!(pairs.len(), 2);
    assert_eq!(pairs[0].emit.name(), "a");
    assert_eq!(pairs[0].listen.name(), "onA");
    assert_eq!(pairs[1].emit.name(), "b");
    assert_eq!(pairs[1].listen.name(), "onB");
    for pair in &pairs {
        assert_eq!(pair.emit.count(), 0);
        assert_eq!(pair.listen.count(), 0);
    }

    let on_a = RecordingHandler::new();
    let on_b = RecordingHandler::new();
    let _a = pairs[0].listen.listen(on_a.clone());
    let _b = pairs[1].listen.listen(on_b.clone());

    pairs[0].emit.emit([json!("x")]).unwrap();

    assert_eq!(on_a.calls(), vec![vec![json!("x")]]);
    assert_eq!(on_b.count(), 0);
    assert_eq!(pairs[0].emit.count(), 1);
    assert_eq!(pairs[1].emit.count(), 0);
    assert_eq!(pairs[0].listen.count(), 1);
    assert_eq!(pairs[1].listen.count(), 0);
}

#[test]
fn test_unsubscribed_handler_stops_receiving() {
    let mut registry = json_registry();
    registry.register("foo").unwrap();
    let recorder = RecordingHandler::new();

    let sub = registry.listener("onFoo").unwrap().listen(recorder.clone());
    let foo = registry.emitter("foo").unwrap();
    foo.emit([json!(1)]).unwrap();
    sub.unsubscribe();
    foo.emit([json!(2)]).unwrap();

    assert_eq!(recorder.calls(), vec![vec![json!(1)]]);
}

#[test]
fn test_listener_count_is_per_delivery() {
    let mut registry = json_registry();
    registry.register("foo").unwrap();
    let on_foo = registry.listener("onFoo").unwrap();

    let _first = on_foo.listen(|_args: &[Value]| {});
    let _second = on_foo.listen(|_args: &[Value]| {});
    assert_eq!(on_foo.count(), 0);

    let foo = registry.emitter("foo").unwrap();
    foo.emit_empty().unwrap();
    foo.emit_empty().unwrap();

    assert_eq!(on_foo.count(), 4);
}

#[test]
fn test_round_trip_identity() {
    let mut registry = json_registry();
    registry.register("foo").unwrap();
    let recorder = RecordingHandler::new();
    let _sub = registry.listener("onFoo").unwrap().listen(recorder.clone());

    let sent = vec![json!(null), json!("two"), json!([3]), json!({ "four": 4 })];
    registry.emitter("foo").unwrap().emit(sent.clone()).unwrap();

    assert_eq!(recorder.last(), Some(sent));
}

#[test]
fn test_rejected_input_creates_nothing() {
    let mut registry = json_registry();

    let err = registry.register(vec!["ok", ""]).unwrap_err();
    assert!(matches!(err, RegistrationError::InvalidRegistrationInput(_)));

    let err = registry.register(["foo", "Foo"]).unwrap_err();
    assert!(matches!(err, RegistrationError::AlreadyRegistered(_)));

    assert!(registry.is_empty());
    assert!(registry.emitter("ok").is_none());
    assert!(registry.listener("onFoo").is_none());
}

#[test]
fn test_duplicate_policy() {
    let mut registry = json_registry();
    registry.register("foo").unwrap();
    let err = registry.register("foo").unwrap_err();
    assert!(matches!(err, RegistrationError::AlreadyRegistered(ref name) if name == "foo"));

    let mut registry = EventRegistry::builder(LocalBus::<Value>::new())
        .duplicate_policy(DuplicatePolicy::Replace)
        .declare("foo")
        .build()
        .unwrap();
    let old = registry.emitter("foo").unwrap().clone();
    old.emit_empty().unwrap();

    registry
        .register(vec![("foo", ArgSpec::positional([tagging("f0")]))])
        .unwrap();
    let new = registry.emitter("foo").unwrap();
    assert_eq!(new.count(), 0);
    assert_eq!(new.spec().arity(), Some(1));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_resolve_by_service_name() {
    let mut registry = json_registry();
    registry.register("userSaved").unwrap();

    assert!(matches!(
        registry.resolve("userSaved"),
        Some(EntryPoint::Emit(e)) if e.name() == "userSaved"
    ));
    assert!(matches!(
        registry.resolve("onUserSaved"),
        Some(EntryPoint::Listen(l)) if l.event() == "userSaved"
    ));
    assert!(registry.resolve("onuserSaved").is_none());
}

#[test]
fn test_builder_declares_in_order() {
    let registry = EventRegistry::builder(LocalBus::<Value>::new())
        .declare(["ready", "shutdown"])
        .declare(Registrations::specs([("resize", ArgSpec::positional([
            EventRegistry::<Value, LocalBus<Value>>::pass_through(),
            EventRegistry::<Value, LocalBus<Value>>::pass_through(),
        ]))]))
        .build()
        .unwrap();

    assert_eq!(
        registry.names().collect::<Vec<_>>(),
        vec!["ready", "shutdown", "resize"]
    );
    assert_eq!(registry.pair("resize").unwrap().emit.spec().arity(), Some(2));
}
