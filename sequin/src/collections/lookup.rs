//! One-to-many keyed groupings.

use std::fmt;
use std::rc::Rc;

use crate::comparer::EqualityComparer;
use crate::cursor::CursorIter;
use crate::sequence::Sequence;
use crate::store::KeyedBucketStore;

/// A key with the elements that share it, in source order.
pub struct Grouping<K, T> {
    key: K,
    elements: Rc<[T]>,
}

impl<K: Clone, T> Clone for Grouping<K, T> {
    fn clone(&self) -> Self {
        Grouping {
            key: self.key.clone(),
            elements: Rc::clone(&self.elements),
        }
    }
}

impl<K: fmt::Debug, T: fmt::Debug> fmt::Debug for Grouping<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grouping")
            .field("key", &self.key)
            .field("elements", &self.elements)
            .finish()
    }
}

impl<K, T: Clone + 'static> Grouping<K, T> {
    pub fn new(key: K, elements: impl Into<Rc<[T]>>) -> Self {
        Grouping {
            key,
            elements: elements.into(),
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn count(&self) -> usize {
        self.elements.len()
    }

    pub fn elements(&self) -> Sequence<T> {
        Sequence::from_rc(Rc::clone(&self.elements))
    }

    pub fn as_slice(&self) -> &[T] {
        &self.elements
    }
}

impl<K, T: Clone + 'static> IntoIterator for &Grouping<K, T> {
    type Item = T;
    type IntoIter = CursorIter<T>;

    fn into_iter(self) -> CursorIter<T> {
        self.elements().iter()
    }
}

/// Immutable multi-map from keys to groupings, in first-seen key order.
pub struct Lookup<K, T> {
    index: Rc<KeyedBucketStore<K, usize>>,
    groupings: Rc<[Grouping<K, T>]>,
}

impl<K, T> Clone for Lookup<K, T> {
    fn clone(&self) -> Self {
        Lookup {
            index: Rc::clone(&self.index),
            groupings: Rc::clone(&self.groupings),
        }
    }
}

impl<K, T> fmt::Debug for Lookup<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lookup")
            .field("groups", &self.groupings.len())
            .finish()
    }
}

impl<K: Clone + 'static, T: Clone + 'static> Lookup<K, T> {
    /// Group `items` by `key`, keeping `element` of each.
    pub fn build<S>(
        items: impl IntoIterator<Item = S>,
        key: impl Fn(&S) -> K,
        element: impl Fn(&S) -> T,
        comparer: EqualityComparer<K>,
    ) -> Self {
        let mut index = KeyedBucketStore::new(comparer);
        let mut keys: Vec<K> = Vec::new();
        let mut members: Vec<Vec<T>> = Vec::new();
        for item in items {
            let k = key(&item);
            let next = keys.len();
            let group = *index.get_or_insert_with(k.clone(), || next);
            if group == next {
                keys.push(k);
                members.push(Vec::new());
            }
            members[group].push(element(&item));
        }
        let groupings: Vec<Grouping<K, T>> = keys
            .into_iter()
            .zip(members)
            .map(|(key, elements)| Grouping::new(key, elements))
            .collect();
        Lookup {
            index: Rc::new(index),
            groupings: Rc::from(groupings),
        }
    }

    /// Elements under `key`; empty when the key is absent.
    pub fn get(&self, key: &K) -> Sequence<T> {
        match self.index.get(key) {
            Some(&group) => self.groupings[group].elements(),
            None => Sequence::empty(),
        }
    }

    pub(crate) fn members(&self, key: &K) -> Option<Rc<[T]>> {
        let group = *self.index.get(key)?;
        Some(Rc::clone(&self.groupings[group].elements))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Number of distinct keys
    pub fn count(&self) -> usize {
        self.groupings.len()
    }

    pub fn groupings(&self) -> &[Grouping<K, T>] {
        &self.groupings
    }

    pub fn to_sequence(&self) -> Sequence<Grouping<K, T>> {
        Sequence::from_rc(Rc::clone(&self.groupings))
    }
}

impl<K: Clone + 'static, T: Clone + 'static> IntoIterator for &Lookup<K, T> {
    type Item = Grouping<K, T>;
    type IntoIter = CursorIter<Grouping<K, T>>;

    fn into_iter(self) -> CursorIter<Grouping<K, T>> {
        self.to_sequence().iter()
    }
}
