//! Small introspection primitives shared by the framework's configuration and request layers.
//!
//! The crate exposes three independent utilities:
//! - [`property::InstancePropertyMixin`] attaches computed attributes to individual instances,
//!   either recomputed on every access or reified (computed once and cached).
//! - [`utils::weak_set::WeakOrderedSet`] tracks objects in insertion order without keeping them
//!   alive.
//! - [`object::object_description`] renders any [`object::Value`] as a short diagnostic string.

pub mod magic;
pub mod object;
pub mod property;
pub mod utils;

pub use object::{Value, object_description};
pub use property::InstancePropertyMixin;
pub use utils::error::{PropResult, PropertyError};
pub use utils::weak_set::WeakOrderedSet;
