//! Unique-key map.

use std::fmt;

use sequin_core::{Identity, QueryError, QueryResult};

use crate::comparer::EqualityComparer;
use crate::sequence::Sequence;
use crate::store::KeyedBucketStore;

/// Map with unique keys under an [`EqualityComparer`], iterated in
/// insertion order.
pub struct Dictionary<K, V> {
    store: KeyedBucketStore<K, V>,
}

impl<K: Identity + 'static, V> Default for Dictionary<K, V> {
    fn default() -> Self {
        Dictionary::with_comparer(EqualityComparer::default())
    }
}

impl<K: Identity + 'static, V> Dictionary<K, V> {
    pub fn new() -> Self {
        Dictionary::default()
    }
}

impl<K, V> fmt::Debug for Dictionary<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("len", &self.store.len())
            .finish()
    }
}

impl<K: 'static, V> Dictionary<K, V> {
    pub fn with_comparer(comparer: EqualityComparer<K>) -> Self {
        Dictionary {
            store: KeyedBucketStore::new(comparer),
        }
    }

    /// Add a new key; an equal key already present is an error.
    pub fn add(&mut self, key: K, value: V) -> QueryResult<()> {
        if self.store.insert_unique(key, value) {
            Ok(())
        } else {
            Err(QueryError::duplicate_key("Dictionary::add"))
        }
    }

    /// Insert or overwrite, returning the previous value.
    pub fn set(&mut self, key: K, value: V) -> Option<V> {
        self.store.insert_or_replace(key, value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.store.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.store.get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.store.contains_key(key)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.store.remove(key)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.store.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.store.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.store.iter()
    }

    pub fn into_entries(self) -> Vec<(K, V)> {
        self.store.into_entries()
    }
}

impl<K: Clone + 'static, V: Clone + 'static> Dictionary<K, V> {
    /// Snapshot of the entries as a sequence of key/value pairs.
    pub fn to_sequence(&self) -> Sequence<(K, V)> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequin_core::QueryErrorKind;

    #[test]
    fn test_add_rejects_duplicates() {
        let mut dict = Dictionary::new();
        dict.add("a", 1).unwrap();
        let err = dict.add("a", 2).unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::DuplicateKey);
        assert_eq!(dict.get(&"a"), Some(&1));
    }

    #[test]
    fn test_set_get_remove() {
        let mut dict = Dictionary::new();
        assert_eq!(dict.set(1, "one"), None);
        assert_eq!(dict.set(1, "uno"), Some("one"));
        if let Some(v) = dict.get_mut(&1) {
            *v = "eins";
        }
        assert_eq!(dict.get(&1), Some(&"eins"));
        assert!(dict.contains_key(&1));
        assert_eq!(dict.remove(&1), Some("eins"));
        assert!(dict.is_empty());
    }

    #[test]
    fn test_iterates_in_insertion_order() {
        let mut dict = Dictionary::new();
        for (i, name) in ["c", "a", "b"].into_iter().enumerate() {
            dict.add(name, i).unwrap();
        }
        assert_eq!(dict.keys().copied().collect::<Vec<_>>(), vec!["c", "a", "b"]);
        assert_eq!(
            dict.to_sequence().iter().collect::<Vec<_>>(),
            vec![("c", 0), ("a", 1), ("b", 2)]
        );
    }

    #[test]
    fn test_custom_comparer() {
        let mut dict = Dictionary::with_comparer(EqualityComparer::by_key(
            |s: &String| s.to_lowercase(),
            EqualityComparer::default(),
        ));
        dict.add("Key".to_string(), 1).unwrap();
        assert!(dict.contains_key(&"KEY".to_string()));
        assert!(dict.add("kEy".to_string(), 2).is_err());
    }

    fn describe<K, V>(dict: &Dictionary<K, V>) -> String {
        format!("{dict:?}")
    }

    #[test]
    fn test_debug_reports_len_for_any_key() {
        let mut dict = Dictionary::new();
        dict.add('x', 1).unwrap();
        dict.add('y', 2).unwrap();
        assert_eq!(describe(&dict), "Dictionary { len: 2 }");
    }
}
