//! Dynamic value model shared by the property mixin and the description helpers.
//!
//! [`Value`] is the closed set of shapes an attribute or a diagnostic subject can take: scalars,
//! literal containers, references to named program items (modules, types, functions, methods)
//! and opaque shared objects.
use std::{
    any::{type_name, type_name_of_val},
    fmt,
    sync::Arc,
};

use downcast_rs::{DowncastSync, impl_downcast};

use crate::utils::ref_id::ObjectId;

mod describe;

pub use describe::{object_description, object_description_with};

/// Any shared value that can be stored behind a [`ObjectRef`].
pub trait OpaqueObject: DowncastSync {}
impl_downcast!(sync OpaqueObject);

impl<T: Send + Sync + 'static> OpaqueObject for T {}

/// Last path segment of a program item name, without generic arguments.
///
/// Returns `None` for anonymous items (closures), which have no usable name.
pub(crate) fn item_name(path: &str) -> Option<&str> {
    let path = path.split('<').next().unwrap_or(path);
    let name = path.rsplit("::").next().unwrap_or(path);
    if name.is_empty() || name.contains('{') {
        None
    } else {
        Some(name)
    }
}

/// Name of a function item given its type path (`a::b::worker`).
///
/// Any other callable type (closures, `fn(..)` pointers, `dyn Fn` objects, boxes and other
/// wrappers) has no name of its own and yields `None`.
pub(crate) fn fn_item_name(path: &str) -> Option<&str> {
    let is_ident = |segment: &str| {
        segment
            .chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
            && segment.chars().all(|c| c.is_alphanumeric() || c == '_')
    };
    if path.split("::").all(is_ident) {
        path.rsplit("::").next()
    } else {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleRef {
    path: String,
}

impl ModuleRef {
    /// Usually built as `ModuleRef::new(module_path!())`.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassRef {
    path: String,
}

impl ClassRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn of<T: ?Sized>() -> Self {
        Self::new(type_name::<T>())
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        item_name(&self.path).unwrap_or(&self.path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FunctionRef {
    path: String,
}

impl FunctionRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Reference to the function item `f`, named after its fully-qualified path.
    pub fn of<F>(f: &F) -> Self {
        Self::new(type_name_of_val(f))
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> &str {
        item_name(&self.path).unwrap_or(&self.path)
    }
}

/// A method bound to an instance of `owner`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodRef {
    name: String,
    owner: ClassRef,
}

impl MethodRef {
    pub fn new(name: impl Into<String>, owner: ClassRef) -> Self {
        Self {
            name: name.into(),
            owner,
        }
    }

    pub fn of<T: ?Sized>(name: impl Into<String>) -> Self {
        Self::new(name, ClassRef::of::<T>())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &ClassRef {
        &self.owner
    }
}

/// Shared handle on an arbitrary object. Compares by identity.
#[derive(Clone)]
pub struct ObjectRef {
    class: ClassRef,
    inner: Arc<dyn OpaqueObject>,
}

impl ObjectRef {
    pub fn new<T: Send + Sync + 'static>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    pub fn from_arc<T: Send + Sync + 'static>(inner: Arc<T>) -> Self {
        Self {
            class: ClassRef::of::<T>(),
            inner,
        }
    }

    pub fn id(&self) -> ObjectId {
        ObjectId::of_arc(&self.inner)
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn downcast_ref<T: OpaqueObject>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }

    pub fn downcast_arc<T: OpaqueObject>(&self) -> Option<Arc<T>> {
        self.inner.clone().downcast_arc::<T>().ok()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectRef")
            .field("class", &self.class.path)
            .field("id", &self.id())
            .finish()
    }
}

/// Default textual form of an object: `<path::Type object at 0x...>`.
impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} object at {}>", self.class.path, self.id())
    }
}

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    /// Members in insertion order, without duplicates. Build with [`Value::set`].
    Set(Vec<Value>),
    /// Entries in insertion order, keys unique. Build with [`Value::dict`].
    Dict(Vec<(Value, Value)>),
    Module(ModuleRef),
    Class(ClassRef),
    Function(FunctionRef),
    Method(MethodRef),
    Object(ObjectRef),
}

impl Value {
    pub fn tuple(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Value::Tuple(items.into_iter().map(Into::into).collect())
    }

    pub fn list(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a set, keeping the first occurrence of equal members.
    pub fn set(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        let mut members: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !members.contains(&item) {
                members.push(item);
            }
        }
        Value::Set(members)
    }

    /// Build a mapping. A repeated key keeps its first position and takes the last value.
    pub fn dict<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut out: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            let (key, value) = (key.into(), value.into());
            match out.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => out.push((key, value)),
            }
        }
        Value::Dict(out)
    }

    pub fn object<T: Send + Sync + 'static>(value: T) -> Self {
        Value::Object(ObjectRef::new(value))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

macro_rules! impl_from_int {
    ($($ty:ty),+) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::Int(value as i64)
                }
            }
        )+
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::List(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}

impl From<ModuleRef> for Value {
    fn from(value: ModuleRef) -> Self {
        Value::Module(value)
    }
}

impl From<ClassRef> for Value {
    fn from(value: ClassRef) -> Self {
        Value::Class(value)
    }
}

impl From<FunctionRef> for Value {
    fn from(value: FunctionRef) -> Self {
        Value::Function(value)
    }
}

impl From<MethodRef> for Value {
    fn from(value: MethodRef) -> Self {
        Value::Method(value)
    }
}

impl From<ObjectRef> for Value {
    fn from(value: ObjectRef) -> Self {
        Value::Object(value)
    }
}
