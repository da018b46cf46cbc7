//! Projection, flattening, combination and windowing operators.

use std::rc::Rc;

use sequin_core::{QueryError, QueryResult};

use crate::cursor::Cursor;
use crate::materialize::drain;
use crate::sequence::Sequence;

impl<T: Clone + 'static> Sequence<T> {
    /// Map each element through `selector`.
    pub fn select<U: Clone + 'static>(&self, selector: impl Fn(&T) -> U + 'static) -> Sequence<U> {
        self.select_indexed(move |item, _| selector(item))
    }

    pub fn select_indexed<U: Clone + 'static>(
        &self,
        selector: impl Fn(&T, usize) -> U + 'static,
    ) -> Sequence<U> {
        let source = self.clone();
        let selector = Rc::new(selector);
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let selector = Rc::clone(&selector);
            let mut index = 0;
            move || {
                let item = cursor.next_value()?;
                index += 1;
                Some(selector(&item, index - 1))
            }
        })
    }

    /// Map each element to a collection and flatten the results.
    pub fn select_many<U, I>(&self, selector: impl Fn(&T) -> I + 'static) -> Sequence<U>
    where
        U: Clone + 'static,
        I: IntoIterator<Item = U> + 'static,
        I::IntoIter: 'static,
    {
        let source = self.clone();
        let selector = Rc::new(selector);
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let selector = Rc::clone(&selector);
            let mut inner: Option<I::IntoIter> = None;
            move || loop {
                if let Some(item) = inner.as_mut().and_then(Iterator::next) {
                    return Some(item);
                }
                let outer = cursor.next_value()?;
                inner = Some(selector(&outer).into_iter());
            }
        })
    }

    /// Flatten, combining each inner element with its outer element.
    pub fn select_many_with<C, R, I>(
        &self,
        collection: impl Fn(&T) -> I + 'static,
        result: impl Fn(&T, &C) -> R + 'static,
    ) -> Sequence<R>
    where
        C: 'static,
        R: Clone + 'static,
        I: IntoIterator<Item = C> + 'static,
        I::IntoIter: 'static,
    {
        let source = self.clone();
        let collection = Rc::new(collection);
        let result = Rc::new(result);
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let collection = Rc::clone(&collection);
            let result = Rc::clone(&result);
            let mut inner: Option<(T, I::IntoIter)> = None;
            move || loop {
                if let Some((outer, items)) = inner.as_mut() {
                    if let Some(item) = items.next() {
                        return Some(result(&*outer, &item));
                    }
                }
                let outer = cursor.next_value()?;
                let items = collection(&outer).into_iter();
                inner = Some((outer, items));
            }
        })
    }

    /// Combine elements pairwise; stops at the shorter sequence.
    pub fn zip<U, R>(
        &self,
        second: impl Into<Sequence<U>>,
        result: impl Fn(&T, &U) -> R + 'static,
    ) -> Sequence<R>
    where
        U: Clone + 'static,
        R: Clone + 'static,
    {
        let first = self.clone();
        let second = second.into();
        let result = Rc::new(result);
        Sequence::generate(move || {
            let mut left = first.new_cursor();
            let mut right = second.new_cursor();
            let result = Rc::clone(&result);
            move || {
                if !left.advance() || !right.advance() {
                    return None;
                }
                Some(result(left.current()?, right.current()?))
            }
        })
    }

    /// Overlapping windows of two consecutive elements.
    pub fn pairwise(&self) -> Sequence<(T, T)> {
        let source = self.clone();
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let mut previous: Option<T> = None;
            move || {
                if previous.is_none() {
                    previous = cursor.next_value();
                }
                let next = cursor.next_value()?;
                let prev = previous.replace(next.clone())?;
                Some((prev, next))
            }
        })
    }

    /// Non-overlapping windows of `size` elements; the last may be short.
    pub fn chunk(&self, size: usize) -> QueryResult<Sequence<Vec<T>>> {
        if size == 0 {
            return Err(QueryError::argument("chunk", "size must be at least 1"));
        }
        let source = self.clone();
        Ok(Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            move || {
                let mut window = Vec::with_capacity(size);
                while window.len() < size {
                    match cursor.next_value() {
                        Some(item) => window.push(item),
                        None => break,
                    }
                }
                (!window.is_empty()).then_some(window)
            }
        }))
    }

    /// This sequence followed by `other`.
    pub fn concat(&self, other: impl Into<Sequence<T>>) -> Sequence<T> {
        let first = self.clone();
        let second = other.into();
        Sequence::generate(move || {
            let mut cursor = first.new_cursor();
            let mut on_second = false;
            let second = second.clone();
            move || loop {
                if let Some(item) = cursor.next_value() {
                    return Some(item);
                }
                if on_second {
                    return None;
                }
                on_second = true;
                cursor = second.new_cursor();
            }
        })
    }

    pub fn append(&self, item: T) -> Sequence<T> {
        self.concat(vec![item])
    }

    pub fn prepend(&self, item: T) -> Sequence<T> {
        Sequence::from(vec![item]).concat(self)
    }

    /// Elements in reverse order. Drains the upstream on first advance.
    pub fn reverse(&self) -> Sequence<T> {
        let source = self.clone();
        Sequence::materialized_vec("reverse", move || {
            let mut items = drain("reverse", &source);
            items.reverse();
            items
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn test_select() {
        let seq = Sequence::from(vec![1, 2, 3]).select(|x| x * 10);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![10, 20, 30]);
        let indexed = Sequence::from(vec!["a", "b"]).select_indexed(|s, i| format!("{i}{s}"));
        assert_eq!(indexed.iter().collect::<Vec<_>>(), vec!["0a", "1b"]);
    }

    #[test]
    fn test_select_is_lazy() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let seq = Sequence::from(vec![1, 2]).select(move |x| {
            counter.set(counter.get() + 1);
            *x
        });
        assert_eq!(calls.get(), 0);
        assert_eq!(seq.iter().count(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_select_many() {
        let seq = Sequence::from(vec![1, 3]).select_many(|n| vec![*n; *n as usize]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 3, 3, 3]);
        let empty_inner = Sequence::from(vec![0, 2]).select_many(|n| vec![*n; *n as usize]);
        assert_eq!(empty_inner.iter().collect::<Vec<_>>(), vec![2, 2]);
    }

    #[test]
    fn test_select_many_with_result() {
        let seq = Sequence::from(vec!["ab", "c"])
            .select_many_with(|s| s.chars().collect::<Vec<_>>(), |s, c| format!("{s}:{c}"));
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec!["ab:a", "ab:b", "c:c"]);
    }

    #[test]
    fn test_select_many_over_sequences() {
        let nested = Sequence::from(vec![Sequence::from(vec![1]), Sequence::from(vec![2, 3])]);
        let flat = nested.select_many(|inner| inner.clone());
        assert_eq!(flat.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_zip_stops_at_shorter() {
        let seq = Sequence::from(vec![1, 2]).zip(vec![10, 20, 30], |a, b| a + b);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![11, 22]);
    }

    #[test]
    fn test_pairwise() {
        let seq = Sequence::from(vec![1, 2, 3]).pairwise();
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![(1, 2), (2, 3)]);
        assert_eq!(Sequence::from(vec![1]).pairwise().iter().count(), 0);
    }

    #[test]
    fn test_chunk() {
        let seq = Sequence::from(vec![1, 2, 3, 4, 5]).chunk(2).unwrap();
        assert_eq!(
            seq.iter().collect::<Vec<_>>(),
            vec![vec![1, 2], vec![3, 4], vec![5]]
        );
        assert!(Sequence::from(vec![1]).chunk(0).is_err());
    }

    #[test]
    fn test_concat_append_prepend() {
        let seq = Sequence::from(vec![2, 3]).concat(vec![4]).append(5).prepend(1);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
        assert_eq!(seq.iter().count(), 5);
    }

    #[test]
    fn test_reverse() {
        let seq = Sequence::from(vec![1, 2, 3]).reverse();
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![3, 2, 1]);
    }
}
