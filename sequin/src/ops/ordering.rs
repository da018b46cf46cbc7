//! Stable multi-key ordering.
//!
//! `order_by` starts an [`OrderedSequence`] with one sort level; each
//! `then_by` appends a level that only breaks ties left by the levels before
//! it. Keys are extracted once per element when the sort runs, and the sort
//! itself happens on the first advance of a traversal.

use std::cmp::Ordering;
use std::ops::Deref;
use std::rc::Rc;

use sequin_core::Identity;

use crate::comparer::Comparer;
use crate::materialize::drain;
use crate::sequence::Sequence;
use crate::sort::stable_sort_indices;

/// Index comparison over one drained batch of elements
type IndexCompare = Box<dyn Fn(usize, usize) -> Ordering>;

/// One key of a multi-key sort.
trait SortLevel<T> {
    /// Extract this level's keys for `items`, returning a comparison by
    /// element position.
    fn compile(&self, items: &[T]) -> IndexCompare;
}

struct KeyLevel<T, K> {
    key: Rc<dyn Fn(&T) -> K>,
    comparer: Comparer<K>,
    descending: bool,
}

impl<T, K: 'static> SortLevel<T> for KeyLevel<T, K> {
    fn compile(&self, items: &[T]) -> IndexCompare {
        let keys: Vec<K> = items.iter().map(|item| (self.key)(item)).collect();
        let comparer = self.comparer.clone();
        let descending = self.descending;
        Box::new(move |a, b| {
            let order = comparer.compare(&keys[a], &keys[b]);
            if descending { order.reverse() } else { order }
        })
    }
}

/// A sequence with a sort order that further `then_by` calls refine.
///
/// Dereferences to the sorted [`Sequence`], so every operator applies.
pub struct OrderedSequence<T> {
    source: Sequence<T>,
    levels: Rc<[Rc<dyn SortLevel<T>>]>,
    sorted: Sequence<T>,
}

impl<T> Clone for OrderedSequence<T> {
    fn clone(&self) -> Self {
        OrderedSequence {
            source: self.source.clone(),
            levels: Rc::clone(&self.levels),
            sorted: self.sorted.clone(),
        }
    }
}

impl<T> Deref for OrderedSequence<T> {
    type Target = Sequence<T>;

    fn deref(&self) -> &Sequence<T> {
        &self.sorted
    }
}

impl<T: Clone + 'static> OrderedSequence<T> {
    fn new(source: Sequence<T>, levels: Vec<Rc<dyn SortLevel<T>>>) -> Self {
        let levels: Rc<[Rc<dyn SortLevel<T>>]> = Rc::from(levels);
        let upstream = source.clone();
        let sort_levels = Rc::clone(&levels);
        let sorted = Sequence::materialized_vec("order_by", move || {
            let items = drain("order_by", &upstream);
            let compares: Vec<IndexCompare> =
                sort_levels.iter().map(|level| level.compile(&items)).collect();
            let order = stable_sort_indices(items.len(), |a, b| {
                compares
                    .iter()
                    .map(|compare| compare(a, b))
                    .find(|order| order.is_ne())
                    .unwrap_or(Ordering::Equal)
            });
            order.into_iter().map(|i| items[i].clone()).collect()
        });
        OrderedSequence {
            source,
            levels,
            sorted,
        }
    }

    fn with_level<K: 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: Comparer<K>,
        descending: bool,
    ) -> Self {
        let mut levels: Vec<Rc<dyn SortLevel<T>>> = self.levels.to_vec();
        levels.push(Rc::new(KeyLevel {
            key: Rc::new(key),
            comparer,
            descending,
        }));
        OrderedSequence::new(self.source.clone(), levels)
    }

    /// Break remaining ties by an ascending key.
    pub fn then_by<K: Identity + 'static>(&self, key: impl Fn(&T) -> K + 'static) -> Self {
        self.with_level(key, Comparer::default(), false)
    }

    pub fn then_by_with<K: 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: Comparer<K>,
    ) -> Self {
        self.with_level(key, comparer, false)
    }

    pub fn then_by_descending<K: Identity + 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
    ) -> Self {
        self.with_level(key, Comparer::default(), true)
    }

    pub fn then_by_descending_with<K: 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: Comparer<K>,
    ) -> Self {
        self.with_level(key, comparer, true)
    }

    /// The sorted sequence, without further refinement.
    pub fn into_sequence(self) -> Sequence<T> {
        self.sorted
    }
}

impl<T: Clone + 'static> IntoIterator for &OrderedSequence<T> {
    type Item = T;
    type IntoIter = crate::cursor::CursorIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.sorted.iter()
    }
}

impl<T: Clone + 'static> Sequence<T> {
    /// Stable sort by an ascending key.
    pub fn order_by<K: Identity + 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
    ) -> OrderedSequence<T> {
        self.order_by_with(key, Comparer::default())
    }

    pub fn order_by_with<K: 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: Comparer<K>,
    ) -> OrderedSequence<T> {
        OrderedSequence::new(self.clone(), Vec::new()).with_level(key, comparer, false)
    }

    pub fn order_by_descending<K: Identity + 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
    ) -> OrderedSequence<T> {
        self.order_by_descending_with(key, Comparer::default())
    }

    pub fn order_by_descending_with<K: 'static>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        comparer: Comparer<K>,
    ) -> OrderedSequence<T> {
        OrderedSequence::new(self.clone(), Vec::new()).with_level(key, comparer, true)
    }
}
