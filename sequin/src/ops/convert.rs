//! Conversion terminals into concrete containers.

use sequin_core::{Identity, QueryError, QueryResult};

use crate::collections::{Dictionary, KeyedSet};
use crate::comparer::EqualityComparer;
use crate::materialize::drain;
use crate::sequence::Sequence;

impl<T: Clone + 'static> Sequence<T> {
    /// Fixed-size snapshot of the elements.
    pub fn to_array(&self) -> Box<[T]> {
        drain("to_array", self).into_boxed_slice()
    }

    /// Growable snapshot of the elements.
    pub fn to_list(&self) -> Vec<T> {
        drain("to_list", self)
    }

    /// Dictionary from projected keys and values. Keys must be unique.
    pub fn to_dictionary<K, V>(
        &self,
        key: impl Fn(&T) -> K,
        value: impl Fn(&T) -> V,
    ) -> QueryResult<Dictionary<K, V>>
    where
        K: Identity + 'static,
    {
        self.to_dictionary_with(key, value, EqualityComparer::default())
    }

    /// Dictionary keyed by projection, holding the elements themselves.
    pub fn to_dictionary_by<K>(&self, key: impl Fn(&T) -> K) -> QueryResult<Dictionary<K, T>>
    where
        K: Identity + 'static,
    {
        self.to_dictionary(key, T::clone)
    }

    pub fn to_dictionary_with<K, V>(
        &self,
        key: impl Fn(&T) -> K,
        value: impl Fn(&T) -> V,
        comparer: EqualityComparer<K>,
    ) -> QueryResult<Dictionary<K, V>>
    where
        K: 'static,
    {
        let mut dictionary = Dictionary::with_comparer(comparer);
        for item in self.iter() {
            dictionary
                .add(key(&item), value(&item))
                .map_err(|_| QueryError::duplicate_key("to_dictionary"))?;
        }
        Ok(dictionary)
    }

    /// Set of the distinct elements, in first-seen order.
    pub fn to_set(&self) -> KeyedSet<T>
    where
        T: Identity,
    {
        self.to_set_with(EqualityComparer::default())
    }

    pub fn to_set_with(&self, comparer: EqualityComparer<T>) -> KeyedSet<T> {
        let mut set = KeyedSet::with_comparer(comparer);
        for item in self.iter() {
            set.add(item);
        }
        set
    }
}
