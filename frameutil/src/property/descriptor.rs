use std::{any::type_name, collections::BTreeMap, fmt, sync::Arc};

use crate::{
    magic::ANONYMOUS_CALLABLE_NAME,
    object::{Value, fn_item_name},
    utils::error::{PropResult, PropertyError},
};

/// Computation backing a computed attribute. Receives the host instance.
pub type Getter<H> = Arc<dyn Fn(&H) -> Value + Send + Sync>;

/// Assignment hook of an [`FnProperty`].
pub type Setter<H> = Arc<dyn Fn(&mut H, Value) + Send + Sync>;

/// Method bound onto a host by [`Extensions`]. Receives the host and the call arguments.
pub type Method<H> = Arc<dyn Fn(&H, &[Value]) -> Value + Send + Sync>;

/// A plain callable taking the host instance, with the name it was declared under.
pub struct Callable<H> {
    name: Option<String>,
    func: Getter<H>,
}

impl<H> Callable<H> {
    /// Wrap `func`. Function items keep their own name; closures, function pointers and boxed
    /// callables are anonymous.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&H) -> Value + Send + Sync + 'static,
    {
        Self {
            name: fn_item_name(type_name::<F>()).map(str::to_string),
            func: Arc::new(func),
        }
    }

    pub fn named<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&H) -> Value + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl<H> Clone for Callable<H> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            func: self.func.clone(),
        }
    }
}

/// An object computing an attribute on access, optionally accepting assignment.
pub trait Descriptor<H>: Send + Sync {
    fn get(&self, host: &H) -> Value;

    /// Assign `value` through the descriptor. Returns `false` when assignment is not supported.
    fn set(&self, _host: &mut H, _value: Value) -> bool {
        false
    }

    /// Name the descriptor can be installed under when none is given explicitly.
    fn name(&self) -> Option<&str> {
        None
    }
}

/// Read-only (or read/write, see [`FnProperty::with_setter`]) descriptor built from closures.
///
/// Carries no name of its own.
pub struct FnProperty<H> {
    getter: Getter<H>,
    setter: Option<Setter<H>>,
}

impl<H> FnProperty<H> {
    pub fn new<F>(getter: F) -> Self
    where
        F: Fn(&H) -> Value + Send + Sync + 'static,
    {
        Self {
            getter: Arc::new(getter),
            setter: None,
        }
    }

    pub fn with_setter<F>(mut self, setter: F) -> Self
    where
        F: Fn(&mut H, Value) + Send + Sync + 'static,
    {
        self.setter = Some(Arc::new(setter));
        self
    }
}

impl<H> Descriptor<H> for FnProperty<H> {
    fn get(&self, host: &H) -> Value {
        (self.getter)(host)
    }

    fn set(&self, host: &mut H, value: Value) -> bool {
        match &self.setter {
            Some(setter) => {
                setter(host, value);
                true
            }
            None => false,
        }
    }
}

/// What a property can be made from.
pub enum PropertySource<H> {
    Callable(Callable<H>),
    Descriptor(Arc<dyn Descriptor<H>>),
}

impl<H> PropertySource<H> {
    pub fn descriptor<D: Descriptor<H> + 'static>(descriptor: D) -> Self {
        PropertySource::Descriptor(Arc::new(descriptor))
    }
}

impl<H> From<Callable<H>> for PropertySource<H> {
    fn from(value: Callable<H>) -> Self {
        PropertySource::Callable(value)
    }
}

impl<H: 'static> From<FnProperty<H>> for PropertySource<H> {
    fn from(value: FnProperty<H>) -> Self {
        PropertySource::descriptor(value)
    }
}

impl<H> From<Arc<dyn Descriptor<H>>> for PropertySource<H> {
    fn from(value: Arc<dyn Descriptor<H>>) -> Self {
        PropertySource::Descriptor(value)
    }
}

/// A computed attribute ready to be installed on a host instance.
pub enum Property<H> {
    /// Recomputed on every access. Cannot be assigned.
    Plain(Getter<H>),
    /// Computed on first access, then served from the instance attributes. Assignment replaces
    /// the cached value.
    Reified(Getter<H>),
    /// Installed as is. Assignment goes through [`Descriptor::set`].
    Descriptor(Arc<dyn Descriptor<H>>),
}

impl<H> Property<H> {
    pub fn is_reified(&self) -> bool {
        matches!(self, Property::Reified(_))
    }

    /// Data properties take precedence over instance attributes of the same name.
    pub fn is_data(&self) -> bool {
        !self.is_reified()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Property::Plain(_) => "plain",
            Property::Reified(_) => "reified",
            Property::Descriptor(_) => "descriptor",
        }
    }
}

impl<H> Clone for Property<H> {
    fn clone(&self) -> Self {
        match self {
            Property::Plain(getter) => Property::Plain(getter.clone()),
            Property::Reified(getter) => Property::Reified(getter.clone()),
            Property::Descriptor(descriptor) => Property::Descriptor(descriptor.clone()),
        }
    }
}

impl<H> fmt::Debug for Property<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Property::{}", self.kind())
    }
}

/// Build the `(name, property)` pair for `source`.
///
/// A descriptor needs a name (given, or its own) and can't be reified. A callable is named
/// `name` when given, after itself otherwise, and [`ANONYMOUS_CALLABLE_NAME`] when it has no
/// name of its own.
pub fn make_property<H>(
    source: PropertySource<H>,
    name: Option<&str>,
    reify: bool,
) -> PropResult<(String, Property<H>)> {
    match source {
        PropertySource::Descriptor(descriptor) => {
            let name = match name.or(descriptor.name()) {
                Some(name) => name.to_string(),
                None => {
                    return Err(PropertyError::InvalidInput(
                        "must specify \"name\" for a descriptor".to_string(),
                    ));
                }
            };
            if reify {
                return Err(PropertyError::InvalidInput(format!(
                    "cannot reify descriptor '{}'",
                    name
                )));
            }
            Ok((name, Property::Descriptor(descriptor)))
        }
        PropertySource::Callable(callable) => {
            let name = name
                .or(callable.name())
                .unwrap_or(ANONYMOUS_CALLABLE_NAME)
                .to_string();
            let property = if reify {
                Property::Reified(callable.func)
            } else {
                Property::Plain(callable.func)
            };
            Ok((name, property))
        }
    }
}

/// Methods and descriptors to install together on a host.
pub struct Extensions<H> {
    pub methods: BTreeMap<String, Method<H>>,
    pub descriptors: BTreeMap<String, Property<H>>,
}

impl<H> Extensions<H> {
    pub fn new() -> Self {
        Self {
            methods: BTreeMap::new(),
            descriptors: BTreeMap::new(),
        }
    }

    pub fn with_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&H, &[Value]) -> Value + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(method));
        self
    }

    pub fn with_descriptor(mut self, (name, property): (String, Property<H>)) -> Self {
        self.descriptors.insert(name, property);
        self
    }
}

impl<H> Default for Extensions<H> {
    fn default() -> Self {
        Self::new()
    }
}
