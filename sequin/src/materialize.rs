//! The materialization boundary.
//!
//! Operators such as `group_by`, `order_by`, `reverse` and the set algebra
//! cannot yield anything before they have seen their whole upstream. They
//! are still lazy to construct: the drain happens on the *first* `advance`
//! of a [`MaterializingCursor`], and the drained state lives for that
//! cursor only. A second traversal drains again.

use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::cursor::Cursor;
use crate::sequence::Sequence;

/// Cursor that drains its upstream into owned state `S` on first advance,
/// then steps through that state.
pub struct MaterializingCursor<S, T> {
    operation: &'static str,
    drain: Option<Box<dyn FnOnce() -> S>>,
    state: OnceCell<S>,
    step: Box<dyn FnMut(&mut S) -> Option<T>>,
    current: Option<T>,
    finished: bool,
}

impl<S, T> MaterializingCursor<S, T> {
    pub fn new(
        operation: &'static str,
        drain: impl FnOnce() -> S + 'static,
        step: impl FnMut(&mut S) -> Option<T> + 'static,
    ) -> Self {
        MaterializingCursor {
            operation,
            drain: Some(Box::new(drain)),
            state: OnceCell::new(),
            step: Box::new(step),
            current: None,
            finished: false,
        }
    }

    /// Whether the upstream has been drained yet.
    pub fn is_materialized(&self) -> bool {
        self.state.get().is_some()
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

impl<S, T> Cursor<T> for MaterializingCursor<S, T> {
    fn advance(&mut self) -> bool {
        if self.finished {
            return false;
        }
        if let Some(drain) = self.drain.take() {
            let _ = self.state.set(drain());
        }
        self.current = match self.state.get_mut() {
            Some(state) => (self.step)(state),
            None => None,
        };
        if self.current.is_none() {
            self.finished = true;
        }
        !self.finished
    }

    fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

/// Drain `source` completely, in order.
pub(crate) fn drain<T: Clone + 'static>(operation: &'static str, source: &Sequence<T>) -> Vec<T> {
    let items: Vec<T> = source.iter().collect();
    tracing::trace!(operation, elements = items.len(), "materialized upstream");
    items
}

impl<T: Clone + 'static> Sequence<T> {
    /// Sequence whose cursors materialize through `drain` on first advance.
    ///
    /// `drain` runs once per traversal; `step` builds the per-traversal step
    /// function over the drained state.
    pub fn materializing<S, D, G, F>(operation: &'static str, drain: D, step: G) -> Self
    where
        S: 'static,
        D: Fn() -> S + 'static,
        G: Fn() -> F + 'static,
        F: FnMut(&mut S) -> Option<T> + 'static,
    {
        let drain = Rc::new(drain);
        Sequence::new(move || {
            let drain = Rc::clone(&drain);
            Box::new(MaterializingCursor::new(operation, move || drain(), step()))
        })
    }

    /// Materializing sequence that yields a drained, rearranged `Vec` in order.
    pub(crate) fn materialized_vec<D>(operation: &'static str, drain: D) -> Self
    where
        D: Fn() -> Vec<T> + 'static,
    {
        Sequence::materializing(
            operation,
            move || drain().into_iter(),
            || |items: &mut std::vec::IntoIter<T>| items.next(),
        )
    }
}
