use std::{
    fmt,
    sync::{Arc, Weak},
};

/// Identity of a shared allocation.
///
/// Two ids are equal exactly when they were taken from the same referent. An id taken from a
/// [`Weak`] stays meaningful as long as that weak reference exists, since the allocation (and
/// therefore its address) is not released before the last weak reference is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(usize);

impl ObjectId {
    pub fn of<U: ?Sized>(value: &U) -> Self {
        ObjectId(value as *const U as *const () as usize)
    }

    pub fn of_arc<U: ?Sized>(arc: &Arc<U>) -> Self {
        ObjectId(Arc::as_ptr(arc) as *const () as usize)
    }

    pub fn of_weak<U: ?Sized>(weak: &Weak<U>) -> Self {
        ObjectId(weak.as_ptr() as *const () as usize)
    }

    pub fn addr(self) -> usize {
        self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
