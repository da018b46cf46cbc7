//! Filtering and partitioning operators.

use std::rc::Rc;

use crate::cursor::Cursor;
use crate::materialize::drain;
use crate::sequence::Sequence;

impl<T: Clone + 'static> Sequence<T> {
    /// Elements satisfying `predicate`.
    pub fn where_(&self, predicate: impl Fn(&T) -> bool + 'static) -> Sequence<T> {
        self.where_indexed(move |item, _| predicate(item))
    }

    /// Elements satisfying `predicate`, which also receives the element's
    /// position in this traversal.
    pub fn where_indexed(&self, predicate: impl Fn(&T, usize) -> bool + 'static) -> Sequence<T> {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let predicate = Rc::clone(&predicate);
            let mut index = 0;
            move || {
                while let Some(item) = cursor.next_value() {
                    index += 1;
                    if predicate(&item, index - 1) {
                        return Some(item);
                    }
                }
                None
            }
        })
    }

    /// Bypass the first `count` elements. A negative count skips nothing.
    pub fn skip(&self, count: i64) -> Sequence<T> {
        if count <= 0 {
            return self.clone();
        }
        let source = self.clone();
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let mut remaining = count;
            move || {
                while remaining > 0 {
                    remaining -= 1;
                    if !cursor.advance() {
                        return None;
                    }
                }
                cursor.next_value()
            }
        })
    }

    /// The first `count` elements. Zero or a negative count yields nothing.
    pub fn take(&self, count: i64) -> Sequence<T> {
        if count <= 0 {
            return Sequence::empty();
        }
        let source = self.clone();
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let mut remaining = count;
            move || {
                if remaining == 0 {
                    return None;
                }
                remaining -= 1;
                cursor.next_value()
            }
        })
    }

    pub fn skip_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Sequence<T> {
        self.skip_while_indexed(move |item, _| predicate(item))
    }

    /// Bypass elements while `predicate` holds, then yield the rest
    /// without testing them again.
    pub fn skip_while_indexed(
        &self,
        predicate: impl Fn(&T, usize) -> bool + 'static,
    ) -> Sequence<T> {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let predicate = Rc::clone(&predicate);
            let mut skipping = true;
            let mut index = 0;
            move || {
                while let Some(item) = cursor.next_value() {
                    if skipping && predicate(&item, index) {
                        index += 1;
                        continue;
                    }
                    skipping = false;
                    return Some(item);
                }
                None
            }
        })
    }

    pub fn take_while(&self, predicate: impl Fn(&T) -> bool + 'static) -> Sequence<T> {
        self.take_while_indexed(move |item, _| predicate(item))
    }

    /// Yield elements while `predicate` holds; stop at the first failure.
    pub fn take_while_indexed(
        &self,
        predicate: impl Fn(&T, usize) -> bool + 'static,
    ) -> Sequence<T> {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let predicate = Rc::clone(&predicate);
            let mut index = 0;
            move || {
                let item = cursor.next_value()?;
                index += 1;
                predicate(&item, index - 1).then_some(item)
            }
        })
    }

    /// Everything but the last `count` elements.
    pub fn skip_last(&self, count: i64) -> Sequence<T> {
        if count <= 0 {
            return self.clone();
        }
        let source = self.clone();
        Sequence::materialized_vec("skip_last", move || {
            let mut items = drain("skip_last", &source);
            let keep = items.len().saturating_sub(count as usize);
            items.truncate(keep);
            items
        })
    }

    /// Only the last `count` elements.
    pub fn take_last(&self, count: i64) -> Sequence<T> {
        if count <= 0 {
            return Sequence::empty();
        }
        let source = self.clone();
        Sequence::materialized_vec("take_last", move || {
            let mut items = drain("take_last", &source);
            let start = items.len().saturating_sub(count as usize);
            items.split_off(start)
        })
    }

    /// This sequence, or a single `default` when it is empty.
    pub fn default_if_empty(&self, default: T) -> Sequence<T> {
        let source = self.clone();
        Sequence::generate(move || {
            let mut cursor = source.new_cursor();
            let mut default = Some(default.clone());
            move || match cursor.next_value() {
                Some(item) => {
                    default = None;
                    Some(item)
                }
                None => default.take(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn numbers() -> Sequence<i32> {
        Sequence::from(vec![1, 2, 3, 4, 5])
    }

    #[test]
    fn test_where_filters() {
        let evens = numbers().where_(|x| x % 2 == 0);
        assert_eq!(evens.iter().collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn test_where_is_lazy() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let filtered = numbers().where_(move |_| {
            counter.set(counter.get() + 1);
            true
        });
        assert_eq!(calls.get(), 0);
        let _cursor = filtered.new_cursor();
        assert_eq!(calls.get(), 0);
        assert_eq!(filtered.iter().count(), 5);
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn test_where_index_restarts_per_traversal() {
        let seq = numbers().where_indexed(|_, i| i % 2 == 0);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_skip_and_take_boundaries() {
        assert_eq!(numbers().take(0).iter().count(), 0);
        assert_eq!(numbers().take(-2).iter().count(), 0);
        assert_eq!(numbers().take(99).iter().count(), 5);
        assert_eq!(numbers().skip(99).iter().count(), 0);
        assert_eq!(numbers().skip(-1).iter().count(), 5);
        assert_eq!(numbers().skip(1).take(2).iter().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_take_does_not_overpull() {
        let pulled = Rc::new(Cell::new(0));
        let counter = Rc::clone(&pulled);
        let naturals = Sequence::generate(move || {
            let counter = Rc::clone(&counter);
            let mut n = 0;
            move || {
                counter.set(counter.get() + 1);
                n += 1;
                Some(n)
            }
        });
        assert_eq!(naturals.take(3).iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(pulled.get(), 3);
    }

    #[test]
    fn test_skip_while_never_retests() {
        let seq = Sequence::from(vec![1, 2, 5, 1, 2]).skip_while(|x| *x < 3);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![5, 1, 2]);
    }

    #[test]
    fn test_take_while_stops_at_first_failure() {
        let seq = Sequence::from(vec![1, 2, 5, 1, 2]).take_while(|x| *x < 3);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 2]);
        let indexed = numbers().take_while_indexed(|_, i| i < 2);
        assert_eq!(indexed.iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_skip_last_and_take_last() {
        assert_eq!(numbers().skip_last(2).iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(numbers().take_last(2).iter().collect::<Vec<_>>(), vec![4, 5]);
        assert_eq!(numbers().take_last(9).iter().count(), 5);
        assert_eq!(numbers().skip_last(9).iter().count(), 0);
        assert_eq!(numbers().take_last(0).iter().count(), 0);
    }

    #[test]
    fn test_default_if_empty() {
        let empty = Sequence::<i32>::empty().default_if_empty(7);
        assert_eq!(empty.iter().collect::<Vec<_>>(), vec![7]);
        assert_eq!(empty.iter().collect::<Vec<_>>(), vec![7]);
        assert_eq!(numbers().default_if_empty(7).iter().count(), 5);
    }
}
