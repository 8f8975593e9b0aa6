//! Per-instance computed attributes.
//!
//! A host type embeds an [`InstanceState`] and implements [`InstancePropertyMixin`] (usually
//! through [`impl_instance_property_mixin!`](crate::impl_instance_property_mixin)). Attributes
//! are then read and written through [`InstancePropertyMixin::get_attr`] and
//! [`InstancePropertyMixin::set_attr`], which resolve names in this order:
//!
//! 1. data properties (plain callables and descriptors),
//! 2. attributes stored on the instance,
//! 3. reified properties, whose first result is stored on the instance,
//! 4. methods installed by [`InstancePropertyMixin::set_extensions`].
//!
//! Since reified results live with the instance attributes, assigning to a reified name simply
//! overwrites the cached value, and replacing a reified property by another reified property
//! keeps serving the value cached by the first one.
use std::{any::type_name, collections::BTreeMap, fmt};

use log::debug;
use parking_lot::RwLock;

use crate::{
    object::{MethodRef, Value},
    utils::error::{PropResult, PropertyError},
};

pub mod descriptor;

pub use descriptor::{
    Callable, Descriptor, Extensions, FnProperty, Getter, Method, Property, PropertySource,
    Setter, make_property,
};

/// Attribute storage of a host instance.
pub struct InstanceState<H> {
    /// Plain instance attributes, including cached reified values.
    dict: RwLock<BTreeMap<String, Value>>,
    bindings: BTreeMap<String, Property<H>>,
    methods: BTreeMap<String, Method<H>>,
}

impl<H> InstanceState<H> {
    pub fn new() -> Self {
        Self {
            dict: RwLock::new(BTreeMap::new()),
            bindings: BTreeMap::new(),
            methods: BTreeMap::new(),
        }
    }

    /// Names of the installed properties.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn property(&self, name: &str) -> Option<&Property<H>> {
        self.bindings.get(name)
    }

    /// Names of the installed methods.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    /// Copy of the attributes stored on the instance.
    pub fn attributes(&self) -> BTreeMap<String, Value> {
        self.dict.read().clone()
    }
}

impl<H> Default for InstanceState<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for InstanceState<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceState")
            .field("attributes", &*self.dict.read())
            .field("properties", &self.bindings)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Implement [`InstancePropertyMixin`] for a type storing its [`InstanceState`] in `$field`.
#[macro_export]
macro_rules! impl_instance_property_mixin {
    ($ty:ty, $field:ident) => {
        impl $crate::property::InstancePropertyMixin for $ty {
            fn instance_state(&self) -> &$crate::property::InstanceState<Self> {
                &self.$field
            }

            fn instance_state_mut(&mut self) -> &mut $crate::property::InstanceState<Self> {
                &mut self.$field
            }
        }
    };
}

/// Capability to carry computed attributes installed at runtime.
pub trait InstancePropertyMixin: Sized + 'static {
    fn instance_state(&self) -> &InstanceState<Self>;

    fn instance_state_mut(&mut self) -> &mut InstanceState<Self>;

    /// Build the `(name, property)` pair [`Self::set_property`] would install.
    fn make_property(
        source: impl Into<PropertySource<Self>>,
        name: Option<&str>,
        reify: bool,
    ) -> PropResult<(String, Property<Self>)> {
        make_property(source.into(), name, reify)
    }

    /// Install a computed attribute on this instance, replacing any property of the same name.
    ///
    /// With `reify`, the callable runs once on first access and its result is cached on the
    /// instance; otherwise it runs on every access. Descriptors can't be reified and must be
    /// named, either by `name` or by [`Descriptor::name`]; both violations are reported as
    /// [`PropertyError::InvalidInput`] and leave the instance untouched.
    fn set_property(
        &mut self,
        source: impl Into<PropertySource<Self>>,
        name: Option<&str>,
        reify: bool,
    ) -> PropResult<()> {
        let property = Self::make_property(source, name, reify)?;
        self.set_properties([property]);
        Ok(())
    }

    /// Install several properties at once, from a sequence of pairs or a map.
    fn set_properties<I>(&mut self, properties: I)
    where
        I: IntoIterator<Item = (String, Property<Self>)>,
    {
        let state = self.instance_state_mut();
        for (name, property) in properties {
            debug!(
                "Installing {} property '{}' on {}",
                property.kind(),
                name,
                type_name::<Self>()
            );
            state.bindings.insert(name, property);
        }
    }

    /// Bind the extension methods and install the extension descriptors.
    fn set_extensions(&mut self, extensions: &Extensions<Self>) {
        let state = self.instance_state_mut();
        for (name, method) in &extensions.methods {
            debug!("Binding method '{}' on {}", name, type_name::<Self>());
            state.methods.insert(name.clone(), method.clone());
        }
        self.set_properties(
            extensions
                .descriptors
                .iter()
                .map(|(name, property)| (name.clone(), property.clone())),
        );
    }

    fn get_attr(&self, name: &str) -> PropResult<Value> {
        let state = self.instance_state();

        match state.bindings.get(name) {
            Some(Property::Plain(getter)) => return Ok(getter(self)),
            Some(Property::Descriptor(descriptor)) => return Ok(descriptor.get(self)),
            Some(Property::Reified(_)) | None => {}
        }

        if let Some(value) = state.dict.read().get(name) {
            return Ok(value.clone());
        }

        if let Some(Property::Reified(getter)) = state.bindings.get(name) {
            // The getter may read other attributes, so the lock is only taken to store.
            let value = getter(self);
            let mut dict = state.dict.write();
            return Ok(dict.entry(name.to_string()).or_insert(value).clone());
        }

        if state.methods.contains_key(name) {
            return Ok(Value::Method(MethodRef::of::<Self>(name)));
        }

        Err(PropertyError::not_found(name))
    }

    /// Assign an attribute. Fails with [`PropertyError::AttributeConflict`] when `name` is a
    /// plain property or a descriptor without setter.
    fn set_attr(&mut self, name: &str, value: impl Into<Value>) -> PropResult<()> {
        let value = value.into();

        match self.instance_state().bindings.get(name).cloned() {
            Some(Property::Plain(_)) => Err(PropertyError::conflict(name)),
            Some(Property::Descriptor(descriptor)) => {
                if descriptor.set(self, value) {
                    Ok(())
                } else {
                    Err(PropertyError::conflict(name))
                }
            }
            Some(Property::Reified(_)) | None => {
                self.instance_state_mut()
                    .dict
                    .get_mut()
                    .insert(name.to_string(), value);
                Ok(())
            }
        }
    }

    fn has_attr(&self, name: &str) -> bool {
        let state = self.instance_state();
        state.bindings.contains_key(name)
            || state.methods.contains_key(name)
            || state.dict.read().contains_key(name)
    }

    /// Remove an attribute stored on the instance. Returns whether one was removed.
    ///
    /// Deleting a reified name drops its cached value, so the next read recomputes it.
    fn del_attr(&mut self, name: &str) -> bool {
        self.instance_state_mut()
            .dict
            .get_mut()
            .remove(name)
            .is_some()
    }

    fn call_method(&self, name: &str, args: &[Value]) -> PropResult<Value> {
        match self.instance_state().methods.get(name) {
            Some(method) => Ok(method(self, args)),
            None => Err(PropertyError::not_found(name)),
        }
    }
}
