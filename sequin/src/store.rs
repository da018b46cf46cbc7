//! KeyedBucketStore: the hash-bucket engine behind dictionaries, sets,
//! lookups, `distinct`, grouping and the set algebra.
//!
//! Entries live in a slot vector in insertion order; buckets hold slot
//! indices. A key's bucket is `hash mod bucket_count` taken non-negative.
//! Two keys the comparer calls equal always land in the same bucket and
//! share one entry. When the load factor is exceeded the bucket array
//! doubles and every live entry is rehashed; that is also when vacant
//! slots left by removals are compacted away.

use crate::comparer::EqualityComparer;

// ============================================================================
// Configuration
// ============================================================================

/// Sizing policy for a [`KeyedBucketStore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketConfig {
    /// Bucket count of a fresh store
    pub initial_buckets: usize,
    /// Entries per bucket above which the store grows
    pub max_load_factor: f64,
}

impl Default for BucketConfig {
    fn default() -> Self {
        BucketConfig {
            initial_buckets: 16,
            max_load_factor: 0.75,
        }
    }
}

impl BucketConfig {
    /// Replace out-of-range settings with their defaults
    fn normalized(self) -> Self {
        let defaults = BucketConfig::default();
        BucketConfig {
            initial_buckets: if self.initial_buckets == 0 {
                defaults.initial_buckets
            } else {
                self.initial_buckets
            },
            max_load_factor: if self.max_load_factor.is_finite() && self.max_load_factor > 0.0 {
                self.max_load_factor
            } else {
                defaults.max_load_factor
            },
        }
    }
}

// ============================================================================
// Store
// ============================================================================

struct Entry<K, V> {
    hash: i32,
    key: K,
    value: V,
}

/// Hash-bucketed map from keys to values under an [`EqualityComparer`].
pub struct KeyedBucketStore<K, V> {
    comparer: EqualityComparer<K>,
    config: BucketConfig,
    buckets: Vec<Vec<usize>>,
    slots: Vec<Option<Entry<K, V>>>,
    len: usize,
}

fn bucket_index(hash: i32, bucket_count: usize) -> usize {
    (hash as i64).rem_euclid(bucket_count as i64) as usize
}

impl<K, V> KeyedBucketStore<K, V> {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn comparer(&self) -> &EqualityComparer<K> {
        &self.comparer
    }
}

impl<K: 'static, V> KeyedBucketStore<K, V> {
    pub fn new(comparer: EqualityComparer<K>) -> Self {
        KeyedBucketStore::with_config(comparer, BucketConfig::default())
    }

    pub fn with_config(comparer: EqualityComparer<K>, config: BucketConfig) -> Self {
        let config = config.normalized();
        KeyedBucketStore {
            comparer,
            config,
            buckets: vec![Vec::new(); config.initial_buckets],
            slots: Vec::new(),
            len: 0,
        }
    }

    /// Slot holding a key equal to `key`, if any
    fn find(&self, key: &K, hash: i32) -> Option<usize> {
        let bucket = &self.buckets[bucket_index(hash, self.buckets.len())];
        bucket.iter().copied().find(|&slot| {
            self.slots[slot]
                .as_ref()
                .is_some_and(|entry| entry.hash == hash && self.comparer.equals(&entry.key, key))
        })
    }

    fn entry_mut(&mut self, slot: usize) -> &mut Entry<K, V> {
        self.slots[slot]
            .as_mut()
            .unwrap_or_else(|| unreachable!("bucket points at vacant slot {slot}"))
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        let slot = self.find(key, self.comparer.hash(key))?;
        self.slots[slot].as_ref().map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let slot = self.find(key, self.comparer.hash(key))?;
        Some(&mut self.entry_mut(slot).value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key, self.comparer.hash(key)).is_some()
    }

    /// Insert only if no equal key is present. Returns whether it inserted.
    pub fn insert_unique(&mut self, key: K, value: V) -> bool {
        let hash = self.comparer.hash(&key);
        if self.find(&key, hash).is_some() {
            return false;
        }
        self.push(hash, key, value);
        true
    }

    /// Insert, replacing the value of an equal key. Returns the old value.
    pub fn insert_or_replace(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.comparer.hash(&key);
        match self.find(&key, hash) {
            Some(slot) => Some(std::mem::replace(&mut self.entry_mut(slot).value, value)),
            None => {
                self.push(hash, key, value);
                None
            }
        }
    }

    /// The value for `key`, inserting `make()` first if the key is new.
    pub fn get_or_insert_with(&mut self, key: K, make: impl FnOnce() -> V) -> &mut V {
        let hash = self.comparer.hash(&key);
        let slot = match self.find(&key, hash) {
            Some(slot) => slot,
            None => self.push(hash, key, make()),
        };
        &mut self.entry_mut(slot).value
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let hash = self.comparer.hash(key);
        let slot = self.find(key, hash)?;
        let bucket = bucket_index(hash, self.buckets.len());
        self.buckets[bucket].retain(|&s| s != slot);
        self.len -= 1;
        self.slots[slot].take().map(|entry| entry.value)
    }

    pub fn clear(&mut self) {
        self.buckets = vec![Vec::new(); self.config.initial_buckets];
        self.slots.clear();
        self.len = 0;
    }

    /// Live entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.slots
            .iter()
            .flatten()
            .map(|entry| (&entry.key, &entry.value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, value)| value)
    }

    pub fn into_entries(self) -> Vec<(K, V)> {
        self.slots
            .into_iter()
            .flatten()
            .map(|entry| (entry.key, entry.value))
            .collect()
    }

    /// Append a new entry and return its slot
    fn push(&mut self, hash: i32, key: K, value: V) -> usize {
        #[cfg(feature = "identity-checks")]
        self.check_identity(&key, hash);

        let slot = self.slots.len();
        self.slots.push(Some(Entry { hash, key, value }));
        let bucket = bucket_index(hash, self.buckets.len());
        self.buckets[bucket].push(slot);
        self.len += 1;

        if self.len as f64 > self.buckets.len() as f64 * self.config.max_load_factor {
            self.grow();
            return self.slots.len() - 1;
        }
        slot
    }

    /// Double the bucket array, compact vacant slots and rehash.
    fn grow(&mut self) {
        let old = self.buckets.len();
        let new = old * 2;
        self.slots.retain(Option::is_some);
        self.buckets = vec![Vec::new(); new];
        for (slot, entry) in self.slots.iter().enumerate() {
            if let Some(entry) = entry {
                self.buckets[bucket_index(entry.hash, new)].push(slot);
            }
        }
        tracing::debug!(
            old_buckets = old,
            new_buckets = new,
            entries = self.len,
            "keyed store rehashed"
        );
    }

    /// Warn about keys that are equal to `key` but hash differently.
    #[cfg(feature = "identity-checks")]
    fn check_identity(&self, key: &K, hash: i32) {
        for entry in self.slots.iter().flatten() {
            if entry.hash != hash && self.comparer.equals(&entry.key, key) {
                tracing::warn!(
                    existing_hash = entry.hash,
                    new_hash = hash,
                    "equal keys hash differently; keyed operators will treat them as distinct"
                );
            }
        }
    }
}
