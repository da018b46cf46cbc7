//! The sequence facade.
//!
//! A [`Sequence`] is a restartable factory of cursors. Building one performs
//! no iteration: every operator returns a new sequence that captures its
//! upstream, and elements are only produced when a cursor is advanced. Each
//! call to [`Sequence::new_cursor`] starts an independent traversal from the
//! beginning of the chain.

use std::fmt;
use std::rc::Rc;

use crate::cursor::{self, BoxCursor, CursorIter, SliceCursor};

/// A lazily evaluated, restartable stream of elements.
pub struct Sequence<T> {
    factory: Rc<dyn Fn() -> BoxCursor<T>>,
}

impl<T> Clone for Sequence<T> {
    fn clone(&self) -> Self {
        Sequence {
            factory: Rc::clone(&self.factory),
        }
    }
}

impl<T> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence").finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> Sequence<T> {
    /// Wrap a cursor factory. The factory runs once per traversal.
    pub fn new(factory: impl Fn() -> BoxCursor<T> + 'static) -> Self {
        Sequence {
            factory: Rc::new(factory),
        }
    }

    /// Build a sequence from a per-traversal step initializer.
    ///
    /// `init` runs when a cursor is created and returns the step function
    /// that produces that traversal's elements.
    pub fn generate<S, F>(init: F) -> Self
    where
        F: Fn() -> S + 'static,
        S: FnMut() -> Option<T> + 'static,
    {
        Sequence::new(move || cursor::from_step(init()))
    }

    /// Sequence over shared, immutable storage
    pub fn from_rc(items: Rc<[T]>) -> Self {
        Sequence::new(move || Box::new(SliceCursor::new(Rc::clone(&items))))
    }

    /// Start a fresh traversal.
    pub fn new_cursor(&self) -> BoxCursor<T> {
        (self.factory)()
    }

    /// Iterate with Rust's `Iterator` protocol.
    pub fn iter(&self) -> CursorIter<T> {
        CursorIter::new(self.new_cursor())
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl<T: Clone + 'static> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Sequence::from_rc(Rc::from(items))
    }
}

impl<T: Clone + 'static> From<&[T]> for Sequence<T> {
    fn from(items: &[T]) -> Self {
        Sequence::from_rc(Rc::from(items))
    }
}

impl<T: Clone + 'static, const N: usize> From<[T; N]> for Sequence<T> {
    fn from(items: [T; N]) -> Self {
        Sequence::from_rc(Rc::from(items.to_vec()))
    }
}

impl<T: Clone + 'static> From<Box<[T]>> for Sequence<T> {
    fn from(items: Box<[T]>) -> Self {
        Sequence::from_rc(Rc::from(items))
    }
}

impl<T: Clone + 'static> From<Rc<[T]>> for Sequence<T> {
    fn from(items: Rc<[T]>) -> Self {
        Sequence::from_rc(items)
    }
}

impl<T: Clone + 'static> From<&Sequence<T>> for Sequence<T> {
    fn from(sequence: &Sequence<T>) -> Self {
        sequence.clone()
    }
}

impl<T: Clone + 'static> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Sequence::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T: Clone + 'static> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = CursorIter<T>;

    fn into_iter(self) -> CursorIter<T> {
        self.iter()
    }
}

impl<T: Clone + 'static> IntoIterator for &Sequence<T> {
    type Item = T;
    type IntoIter = CursorIter<T>;

    fn into_iter(self) -> CursorIter<T> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::cursor::Cursor;

    #[test]
    fn test_from_vec_iterates_in_order() {
        let seq = Sequence::from(vec![1, 2, 3]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_restartable() {
        let seq = Sequence::from(vec!["a", "b"]);
        let first: Vec<_> = seq.iter().collect();
        let second: Vec<_> = seq.iter().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_generate_runs_init_per_traversal() {
        let inits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&inits);
        let seq = Sequence::generate(move || {
            counter.set(counter.get() + 1);
            let mut n = 0;
            move || {
                n += 1;
                (n <= 2).then_some(n)
            }
        });
        assert_eq!(inits.get(), 0);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(seq.iter().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(inits.get(), 2);
    }

    #[test]
    fn test_independent_cursors() {
        let seq = Sequence::from([10, 20]);
        let mut a = seq.new_cursor();
        let mut b = seq.new_cursor();
        assert_eq!(a.next_value(), Some(10));
        assert_eq!(a.next_value(), Some(20));
        assert_eq!(b.next_value(), Some(10));
    }

    #[test]
    fn test_collect_into_sequence() {
        let seq: Sequence<i32> = (1..=3).collect();
        let mut total = 0;
        for x in &seq {
            total += x;
        }
        assert_eq!(total, 6);
    }
}
