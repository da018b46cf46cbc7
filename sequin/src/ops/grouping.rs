//! Grouping, lookups and joins.
//!
//! All of these need to see a whole operand before yielding: `group_by`
//! drains its source, the joins drain the inner sequence. The drain happens
//! on first advance; the outer sequence of a join is still streamed.

use std::rc::Rc;

use sequin_core::Identity;

use crate::collections::{Grouping, Lookup};
use crate::comparer::EqualityComparer;
use crate::cursor::{BoxCursor, Cursor};
use crate::materialize::drain;
use crate::sequence::Sequence;

/// Per-traversal state of a join: the inner lookup, the outer cursor and
/// the matches still pending for the current outer element.
type JoinState<T, I, K> = (Lookup<K, I>, BoxCursor<T>, Option<(T, Rc<[I]>, usize)>);

impl<T: Clone + 'static> Sequence<T> {
    /// Group elements by key, in first-seen key order.
    pub fn group_by<K>(&self, key: impl Fn(&T) -> K + 'static) -> Sequence<Grouping<K, T>>
    where
        K: Identity + Clone + 'static,
    {
        self.group_by_with(key, T::clone, EqualityComparer::default())
    }

    /// Group with an element projection and an explicit key comparer.
    pub fn group_by_with<K, E>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        element: impl Fn(&T) -> E + 'static,
        comparer: EqualityComparer<K>,
    ) -> Sequence<Grouping<K, E>>
    where
        K: Clone + 'static,
        E: Clone + 'static,
    {
        let source = self.clone();
        Sequence::materializing(
            "group_by",
            move || {
                let lookup = Lookup::build(
                    drain("group_by", &source),
                    &key,
                    &element,
                    comparer.clone(),
                );
                (lookup, 0)
            },
            || {
                |(lookup, next): &mut (Lookup<K, E>, usize)| {
                    let group = lookup.groupings().get(*next)?.clone();
                    *next += 1;
                    Some(group)
                }
            },
        )
    }

    /// Group, then project each grouping through `result`.
    pub fn group_by_select<K, R>(
        &self,
        key: impl Fn(&T) -> K + 'static,
        result: impl Fn(&Grouping<K, T>) -> R + 'static,
    ) -> Sequence<R>
    where
        K: Identity + Clone + 'static,
        R: Clone + 'static,
    {
        self.group_by(key).select(result)
    }

    /// Eagerly build a lookup of elements by key.
    pub fn to_lookup<K>(&self, key: impl Fn(&T) -> K) -> Lookup<K, T>
    where
        K: Identity + Clone + 'static,
    {
        self.to_lookup_with(key, T::clone, EqualityComparer::default())
    }

    pub fn to_lookup_with<K, E>(
        &self,
        key: impl Fn(&T) -> K,
        element: impl Fn(&T) -> E,
        comparer: EqualityComparer<K>,
    ) -> Lookup<K, E>
    where
        K: Clone + 'static,
        E: Clone + 'static,
    {
        Lookup::build(drain("to_lookup", self), key, element, comparer)
    }

    /// Inner join: one result per matching (outer, inner) pair, outer order
    /// first, then inner order.
    pub fn join<I, K, R>(
        &self,
        inner: impl Into<Sequence<I>>,
        outer_key: impl Fn(&T) -> K + 'static,
        inner_key: impl Fn(&I) -> K + 'static,
        result: impl Fn(&T, &I) -> R + 'static,
    ) -> Sequence<R>
    where
        I: Clone + 'static,
        K: Identity + Clone + 'static,
        R: Clone + 'static,
    {
        self.join_with(inner, outer_key, inner_key, result, EqualityComparer::default())
    }

    pub fn join_with<I, K, R>(
        &self,
        inner: impl Into<Sequence<I>>,
        outer_key: impl Fn(&T) -> K + 'static,
        inner_key: impl Fn(&I) -> K + 'static,
        result: impl Fn(&T, &I) -> R + 'static,
        comparer: EqualityComparer<K>,
    ) -> Sequence<R>
    where
        I: Clone + 'static,
        K: Clone + 'static,
        R: Clone + 'static,
    {
        let outer = self.clone();
        let inner = inner.into();
        let outer_key = Rc::new(outer_key);
        let result = Rc::new(result);
        Sequence::materializing(
            "join",
            move || {
                let lookup = inner.to_lookup_with(&inner_key, I::clone, comparer.clone());
                (lookup, outer.new_cursor(), None)
            },
            move || {
                let outer_key = Rc::clone(&outer_key);
                let result = Rc::clone(&result);
                move |(lookup, cursor, pending): &mut JoinState<T, I, K>| loop {
                    if let Some((item, matches, next)) = pending.as_mut() {
                        if let Some(matched) = matches.get(*next) {
                            *next += 1;
                            return Some(result(&*item, matched));
                        }
                    }
                    let item = cursor.next_value()?;
                    *pending = lookup
                        .members(&outer_key(&item))
                        .map(|matches| (item, matches, 0));
                }
            },
        )
    }

    /// Pair each outer element with all of its inner matches.
    pub fn group_join<I, K, R>(
        &self,
        inner: impl Into<Sequence<I>>,
        outer_key: impl Fn(&T) -> K + 'static,
        inner_key: impl Fn(&I) -> K + 'static,
        result: impl Fn(&T, Sequence<I>) -> R + 'static,
    ) -> Sequence<R>
    where
        I: Clone + 'static,
        K: Identity + Clone + 'static,
        R: Clone + 'static,
    {
        self.group_join_with(inner, outer_key, inner_key, result, EqualityComparer::default())
    }

    pub fn group_join_with<I, K, R>(
        &self,
        inner: impl Into<Sequence<I>>,
        outer_key: impl Fn(&T) -> K + 'static,
        inner_key: impl Fn(&I) -> K + 'static,
        result: impl Fn(&T, Sequence<I>) -> R + 'static,
        comparer: EqualityComparer<K>,
    ) -> Sequence<R>
    where
        I: Clone + 'static,
        K: Clone + 'static,
        R: Clone + 'static,
    {
        let outer = self.clone();
        let inner = inner.into();
        let outer_key = Rc::new(outer_key);
        let result = Rc::new(result);
        Sequence::materializing(
            "group_join",
            move || {
                let lookup = inner.to_lookup_with(&inner_key, I::clone, comparer.clone());
                (lookup, outer.new_cursor())
            },
            move || {
                let outer_key = Rc::clone(&outer_key);
                let result = Rc::clone(&result);
                move |(lookup, cursor): &mut (Lookup<K, I>, BoxCursor<T>)| {
                    let item = cursor.next_value()?;
                    let matches = lookup.get(&outer_key(&item));
                    Some(result(&item, matches))
                }
            },
        )
    }
}
