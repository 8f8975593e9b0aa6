use std::collections::{BTreeMap, HashMap};

use frameutil::{
    InstancePropertyMixin, PropertyError, Value, impl_instance_property_mixin,
    magic::ANONYMOUS_CALLABLE_NAME,
    property::{Callable, Descriptor, Extensions, FnProperty, InstanceState, PropertySource},
};

#[derive(Default)]
struct Foo {
    state: InstanceState<Foo>,
}

impl_instance_property_mixin!(Foo, state);

fn worker(obj: &Foo) -> Value {
    obj.get_attr("bar").expect("bar should be set before reading")
}

fn noop(_: &Foo) -> Value {
    Value::None
}

fn constant(value: i64) -> Callable<Foo> {
    Callable::new(move |_: &Foo| Value::Int(value))
}

#[test]
fn callable_is_recomputed_on_every_access() {
    let mut foo = Foo::default();
    foo.set_property(Callable::new(worker), None, false).unwrap();
    foo.set_attr("bar", 1).unwrap();
    assert_eq!(foo.get_attr("worker").unwrap(), Value::Int(1));
    foo.set_attr("bar", 2).unwrap();
    assert_eq!(foo.get_attr("worker").unwrap(), Value::Int(2));
}

#[test]
fn callable_with_name() {
    let mut foo = Foo::default();
    foo.set_property(Callable::new(worker), Some("x"), false).unwrap();
    foo.set_attr("bar", 1).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(1));
    foo.set_attr("bar", 2).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(2));
    assert!(foo.get_attr("worker").is_err());
}

#[test]
fn callable_with_reify_is_computed_once() {
    let mut foo = Foo::default();
    foo.set_property(Callable::new(worker), None, true).unwrap();
    foo.set_attr("bar", 1).unwrap();
    assert_eq!(foo.get_attr("worker").unwrap(), Value::Int(1));
    foo.set_attr("bar", 2).unwrap();
    assert_eq!(foo.get_attr("worker").unwrap(), Value::Int(1));
}

#[test]
fn callable_with_name_reify() {
    let mut foo = Foo::default();
    foo.set_property(Callable::new(worker), Some("x"), false).unwrap();
    foo.set_property(Callable::new(worker), Some("y"), true).unwrap();
    foo.set_attr("bar", 1).unwrap();
    assert_eq!(foo.get_attr("y").unwrap(), Value::Int(1));
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(1));
    foo.set_attr("bar", 2).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(2));
    assert_eq!(foo.get_attr("y").unwrap(), Value::Int(1));
}

#[test]
fn anonymous_callable_gets_fallback_name() {
    let mut foo = Foo::default();
    foo.set_property(Callable::new(|_: &Foo| Value::Int(2)), None, false).unwrap();
    assert_eq!(foo.get_attr(ANONYMOUS_CALLABLE_NAME).unwrap(), Value::Int(2));
}

#[test]
fn function_pointer_and_boxed_sources_are_anonymous() {
    let mut foo = Foo::default();
    let pointer: fn(&Foo) -> Value = noop;
    foo.set_property(Callable::new(pointer), None, false).unwrap();
    let names: Vec<_> = foo.instance_state().property_names().collect();
    assert_eq!(names, vec![ANONYMOUS_CALLABLE_NAME]);

    let mut foo = Foo::default();
    let boxed: Box<dyn Fn(&Foo) -> Value + Send + Sync> = Box::new(worker);
    foo.set_property(Callable::new(boxed), None, false).unwrap();
    let names: Vec<_> = foo.instance_state().property_names().collect();
    assert_eq!(names, vec![ANONYMOUS_CALLABLE_NAME]);
}

#[test]
fn property_without_name() {
    let mut foo = Foo::default();
    let err = foo.set_property(FnProperty::new(noop), None, false).unwrap_err();
    assert!(matches!(err, PropertyError::InvalidInput(_)));
}

#[test]
fn property_with_name() {
    let mut foo = Foo::default();
    foo.set_property(FnProperty::new(worker), Some("x"), false).unwrap();
    foo.set_attr("bar", 1).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(1));
    foo.set_attr("bar", 2).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(2));
}

#[test]
fn property_with_reify() {
    let mut foo = Foo::default();
    let err = foo.set_property(FnProperty::new(noop), Some("x"), true).unwrap_err();
    assert!(matches!(err, PropertyError::InvalidInput(_)));
}

#[test]
fn self_named_descriptor() {
    struct Version;

    impl Descriptor<Foo> for Version {
        fn get(&self, _: &Foo) -> Value {
            Value::from("1.0")
        }

        fn name(&self) -> Option<&str> {
            Some("version")
        }
    }

    let mut foo = Foo::default();
    foo.set_property(PropertySource::<Foo>::descriptor(Version), None, false).unwrap();
    assert_eq!(foo.get_attr("version").unwrap(), Value::from("1.0"));

    let err = foo
        .set_property(PropertySource::<Foo>::descriptor(Version), None, true)
        .unwrap_err();
    assert!(matches!(err, PropertyError::InvalidInput(_)));
}

#[test]
fn override_property() {
    let mut foo = Foo::default();
    foo.set_property(Callable::new(noop), Some("x"), false).unwrap();
    let err = foo.set_attr("x", 1).unwrap_err();
    assert!(matches!(err, PropertyError::AttributeConflict { ref name } if name == "x"));
}

#[test]
fn override_descriptor_without_setter() {
    let mut foo = Foo::default();
    foo.set_property(FnProperty::new(noop), Some("x"), false).unwrap();
    assert!(matches!(
        foo.set_attr("x", 1),
        Err(PropertyError::AttributeConflict { .. })
    ));
}

#[test]
fn override_reify() {
    let mut foo = Foo::default();
    foo.set_property(Callable::new(noop), Some("x"), true).unwrap();
    foo.set_attr("x", 1).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(1));
    foo.set_attr("x", 2).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(2));
}

#[test]
fn reset_property() {
    let mut foo = Foo::default();
    foo.set_property(constant(1), Some("x"), false).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(1));
    foo.set_property(constant(2), Some("x"), false).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(2));
}

/// Replacing a reified property keeps the value cached by the previous one.
#[test]
fn reset_reify() {
    let mut foo = Foo::default();
    foo.set_property(constant(1), Some("x"), true).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(1));
    foo.set_property(constant(2), Some("x"), true).unwrap();
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(1));
}

#[test]
fn properties_are_per_instance() {
    let mut first = Foo::default();
    let second = Foo::default();
    first.set_property(constant(1), Some("x"), false).unwrap();
    assert!(first.has_attr("x"));
    assert!(!second.has_attr("x"));
}

#[test]
fn make_property() {
    let (name, property) = Foo::make_property(constant(1), Some("x"), true).unwrap();
    assert_eq!(name, "x");
    assert!(property.is_reified());

    let (name, property) = Foo::make_property(Callable::new(worker), None, false).unwrap();
    assert_eq!(name, "worker");
    assert!(!property.is_reified());
}

#[test]
fn set_properties_with_iterable() {
    let mut foo = Foo::default();
    let x = Foo::make_property(constant(1), Some("x"), true).unwrap();
    let y = Foo::make_property(constant(2), Some("y"), false).unwrap();
    foo.set_properties(vec![x, y]);
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(1));
    assert_eq!(foo.get_attr("y").unwrap(), Value::Int(2));
}

#[test]
fn set_properties_with_dict() {
    let mut foo = Foo::default();
    let (x_name, x_fn) = Foo::make_property(constant(1), Some("x"), true).unwrap();
    let (y_name, y_fn) = Foo::make_property(constant(2), Some("y"), false).unwrap();
    foo.set_properties(HashMap::from([(x_name, x_fn), (y_name, y_fn)]));
    assert_eq!(foo.get_attr("x").unwrap(), Value::Int(1));
    assert_eq!(foo.get_attr("y").unwrap(), Value::Int(2));

    let mut foo = Foo::default();
    let (z_name, z_fn) = Foo::make_property(constant(3), Some("z"), false).unwrap();
    foo.set_properties(BTreeMap::from([(z_name, z_fn)]));
    assert_eq!(foo.get_attr("z").unwrap(), Value::Int(3));
}

#[test]
fn set_extensions() {
    let mut inst = Foo::default();
    let bar = Foo::make_property(
        Callable::new(|_: &Foo| Value::from("bar")),
        Some("bar"),
        false,
    )
    .unwrap();
    let extensions = Extensions::new()
        .with_method("foo", |_: &Foo, args: &[Value]| {
            args.first().cloned().unwrap_or_default()
        })
        .with_descriptor(bar);

    inst.set_extensions(&extensions);
    assert_eq!(inst.get_attr("bar").unwrap(), Value::from("bar"));
    assert_eq!(
        inst.call_method("foo", &[Value::from("abc")]).unwrap(),
        Value::from("abc")
    );
    assert!(matches!(inst.get_attr("foo").unwrap(), Value::Method(m) if m.name() == "foo"));
}
