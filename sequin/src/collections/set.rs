//! Set of unique elements.

use std::fmt;

use sequin_core::Identity;

use crate::comparer::EqualityComparer;
use crate::sequence::Sequence;
use crate::store::KeyedBucketStore;

/// Unique elements under an [`EqualityComparer`], in insertion order.
pub struct KeyedSet<T> {
    store: KeyedBucketStore<T, ()>,
}

impl<T: Identity + 'static> Default for KeyedSet<T> {
    fn default() -> Self {
        KeyedSet::with_comparer(EqualityComparer::default())
    }
}

impl<T: Identity + 'static> KeyedSet<T> {
    pub fn new() -> Self {
        KeyedSet::default()
    }
}

impl<T> fmt::Debug for KeyedSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyedSet")
            .field("len", &self.store.len())
            .finish()
    }
}

impl<T: 'static> KeyedSet<T> {
    pub fn with_comparer(comparer: EqualityComparer<T>) -> Self {
        KeyedSet {
            store: KeyedBucketStore::new(comparer),
        }
    }

    /// Add `item`; false if an equal element was already present.
    pub fn add(&mut self, item: T) -> bool {
        self.store.insert_unique(item, ())
    }

    pub fn contains(&self, item: &T) -> bool {
        self.store.contains_key(item)
    }

    pub fn remove(&mut self, item: &T) -> bool {
        self.store.remove(item).is_some()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.store.keys()
    }
}

impl<T: Clone + 'static> KeyedSet<T> {
    pub fn to_sequence(&self) -> Sequence<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Identity + 'static> FromIterator<T> for KeyedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = KeyedSet::new();
        for item in iter {
            set.add(item);
        }
        set
    }
}
