//! Set algebra over the keyed bucket store.
//!
//! Results keep the relative order of the first operand and contain each
//! key at most once.

use sequin_core::Identity;

use crate::comparer::EqualityComparer;
use crate::cursor::{BoxCursor, Cursor};
use crate::materialize::drain;
use crate::sequence::Sequence;
use crate::store::KeyedBucketStore;

impl<T: Clone + 'static> Sequence<T> {
    /// Keep the first occurrence of each element.
    pub fn distinct(&self) -> Sequence<T>
    where
        T: Identity,
    {
        self.distinct_with(EqualityComparer::default())
    }

    /// `distinct` under an explicit comparer. Each traversal tracks the
    /// keys it has seen in its own store.
    pub fn distinct_with(&self, comparer: EqualityComparer<T>) -> Sequence<T> {
        let source = self.clone();
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let mut seen = KeyedBucketStore::new(comparer.clone());
            move || {
                while let Some(item) = cursor.next_value() {
                    if seen.insert_unique(item.clone(), ()) {
                        return Some(item);
                    }
                }
                None
            }
        })
    }

    /// Distinct elements of both sequences, first operand first.
    pub fn union(&self, second: impl Into<Sequence<T>>) -> Sequence<T>
    where
        T: Identity,
    {
        self.union_with(second, EqualityComparer::default())
    }

    pub fn union_with(
        &self,
        second: impl Into<Sequence<T>>,
        comparer: EqualityComparer<T>,
    ) -> Sequence<T> {
        self.concat(second).distinct_with(comparer)
    }

    /// Distinct elements of this sequence that also occur in `second`.
    pub fn intersect(&self, second: impl Into<Sequence<T>>) -> Sequence<T>
    where
        T: Identity,
    {
        self.intersect_with(second, EqualityComparer::default())
    }

    /// `second` is drained into a key set on first advance; this sequence
    /// then streams, each key leaving the set the first time it matches.
    pub fn intersect_with(
        &self,
        second: impl Into<Sequence<T>>,
        comparer: EqualityComparer<T>,
    ) -> Sequence<T> {
        let first = self.clone();
        let second = second.into();
        Sequence::materializing(
            "intersect",
            move || (key_set("intersect", &second, &comparer), first.new_cursor()),
            || {
                |(keys, cursor): &mut (KeyedBucketStore<T, ()>, BoxCursor<T>)| {
                    while let Some(item) = cursor.next_value() {
                        if keys.remove(&item).is_some() {
                            return Some(item);
                        }
                    }
                    None
                }
            },
        )
    }

    /// Distinct elements of this sequence that do not occur in `second`.
    pub fn except(&self, second: impl Into<Sequence<T>>) -> Sequence<T>
    where
        T: Identity,
    {
        self.except_with(second, EqualityComparer::default())
    }

    /// `second` seeds the excluded keys; every yielded element joins them
    /// so later duplicates are dropped as well.
    pub fn except_with(
        &self,
        second: impl Into<Sequence<T>>,
        comparer: EqualityComparer<T>,
    ) -> Sequence<T> {
        let first = self.clone();
        let second = second.into();
        Sequence::materializing(
            "except",
            move || (key_set("except", &second, &comparer), first.new_cursor()),
            || {
                |(keys, cursor): &mut (KeyedBucketStore<T, ()>, BoxCursor<T>)| {
                    while let Some(item) = cursor.next_value() {
                        if keys.insert_unique(item.clone(), ()) {
                            return Some(item);
                        }
                    }
                    None
                }
            },
        )
    }
}

fn key_set<T: Clone + 'static>(
    operation: &'static str,
    source: &Sequence<T>,
    comparer: &EqualityComparer<T>,
) -> KeyedBucketStore<T, ()> {
    let mut keys = KeyedBucketStore::new(comparer.clone());
    for item in drain(operation, source) {
        keys.insert_unique(item, ());
    }
    keys
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_distinct_keeps_first_seen_order() {
        let seq = Sequence::from(vec![1, 2, 2, 3, 1]).distinct();
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_distinct_with_comparer() {
        let seq = Sequence::from(vec!["a", "B", "A", "b"]).distinct_with(EqualityComparer::by_key(
            |s: &&str| s.to_lowercase(),
            EqualityComparer::default(),
        ));
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec!["a", "B"]);
    }

    #[test]
    fn test_union() {
        let seq = Sequence::from(vec![1, 2, 2]).union(vec![3, 2, 4]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_intersect() {
        let seq = Sequence::from(vec![4, 1, 2, 1, 3]).intersect(vec![1, 3, 5]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_except() {
        let seq = Sequence::from(vec![4, 1, 4, 2, 3]).except(vec![1, 3]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![4, 2]);
    }

    #[test]
    fn test_set_ops_defer_draining_second() {
        let drained = Rc::new(Cell::new(0));
        let counter = Rc::clone(&drained);
        let second = Sequence::from(vec![1]).select(move |x| {
            counter.set(counter.get() + 1);
            *x
        });
        let seq = Sequence::from(vec![1, 2]).except(second);
        let _cursor = seq.new_cursor();
        assert_eq!(drained.get(), 0);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![2]);
        assert_eq!(drained.get(), 1);
    }

    #[test]
    fn test_set_laws_on_self() {
        let a = Sequence::from(vec![3, 1, 3, 2]);
        let distinct: Vec<_> = a.distinct().iter().collect();
        assert_eq!(a.union(&a).iter().collect::<Vec<_>>(), distinct);
        assert_eq!(a.intersect(&a).iter().collect::<Vec<_>>(), distinct);
        assert_eq!(a.except(&a).iter().count(), 0);
    }
}
