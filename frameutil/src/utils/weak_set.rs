//! Insertion-ordered set of weakly held objects.
//!
//! [`WeakOrderedSet`] never extends the lifetime of its members. An object whose last [`Arc`] is
//! dropped elsewhere disappears from every observation of the set (membership, length, iteration
//! and [`WeakOrderedSet::last`]) exactly as if [`WeakOrderedSet::remove`] had been called. Dead
//! entries are filtered on read and physically dropped by [`WeakOrderedSet::sweep`], which every
//! mutating operation runs first.
//!
//! Until it is swept, a dead entry still holds its [`Weak`], which keeps the member's allocation
//! (not its value) reserved. A set that is only ever read should call
//! [`WeakOrderedSet::sweep`] now and then to release it.
use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Weak},
};

use log::trace;

use crate::utils::ref_id::ObjectId;

pub struct WeakOrderedSet<T: ?Sized> {
    items: HashMap<ObjectId, Weak<T>>,
    order: Vec<ObjectId>,
}

impl<T: ?Sized> WeakOrderedSet<T> {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Add `item` at the end of the set. Adding an object already present does not move it.
    pub fn add(&mut self, item: &Arc<T>) {
        self.sweep();

        let id = ObjectId::of_arc(item);
        if self.items.contains_key(&id) {
            return;
        }
        self.items.insert(id, Arc::downgrade(item));
        self.order.push(id);
    }

    /// Remove `item`, returning whether it was a member.
    pub fn remove(&mut self, item: &Arc<T>) -> bool {
        self.sweep();

        let id = ObjectId::of_arc(item);
        if self.items.remove(&id).is_none() {
            return false;
        }
        self.order.retain(|oid| *oid != id);
        true
    }

    /// Forget every member.
    pub fn empty(&mut self) {
        self.items.clear();
        self.order.clear();
    }

    pub fn contains(&self, item: &Arc<T>) -> bool {
        self.items
            .get(&ObjectId::of_arc(item))
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Number of live members.
    pub fn len(&self) -> usize {
        self.order
            .iter()
            .filter(|id| {
                self.items
                    .get(*id)
                    .is_some_and(|weak| weak.strong_count() > 0)
            })
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = Arc<T>> + '_ {
        self.order
            .iter()
            .filter_map(|id| self.items.get(id).and_then(Weak::upgrade))
    }

    pub fn to_vec(&self) -> Vec<Arc<T>> {
        self.iter().collect()
    }

    /// The most recently added member that is still alive.
    pub fn last(&self) -> Option<Arc<T>> {
        self.order
            .iter()
            .rev()
            .find_map(|id| self.items.get(id).and_then(Weak::upgrade))
    }

    /// Drop the entries of members that are no longer alive. Returns how many were dropped.
    pub fn sweep(&mut self) -> usize {
        let before = self.order.len();
        let items = &mut self.items;
        self.order.retain(|id| {
            let alive = items.get(id).is_some_and(|weak| weak.strong_count() > 0);
            if !alive {
                items.remove(id);
            }
            alive
        });

        let dropped = before - self.order.len();
        if dropped > 0 {
            trace!(
                "Swept {} dead entries from weak ordered set ({} remaining)",
                dropped,
                self.order.len()
            );
        }
        dropped
    }
}

impl<T: ?Sized> Default for WeakOrderedSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for WeakOrderedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakOrderedSet")
            .field("live", &self.len())
            .field("entries", &self.order.len())
            .finish()
    }
}
