//! The iteration protocol.
//!
//! A [`Cursor`] is the mutable state of one traversal: `advance` moves to the
//! next element and reports whether one exists, `current` exposes it. A
//! cursor is owned by the loop driving it and never shared.

use std::rc::Rc;

/// One traversal over a sequence.
pub trait Cursor<T> {
    /// Move to the next element; false once the traversal is exhausted.
    fn advance(&mut self) -> bool;

    /// The element the last successful `advance` moved to.
    fn current(&self) -> Option<&T>;

    /// Advance and clone the new current element out.
    fn next_value(&mut self) -> Option<T>
    where
        T: Clone,
    {
        if self.advance() {
            self.current().cloned()
        } else {
            None
        }
    }
}

pub type BoxCursor<T> = Box<dyn Cursor<T>>;

impl<T> Cursor<T> for BoxCursor<T> {
    fn advance(&mut self) -> bool {
        (**self).advance()
    }

    fn current(&self) -> Option<&T> {
        (**self).current()
    }
}

// ============================================================================
// Cursor Implementations
// ============================================================================

/// Cursor driven by a step function.
///
/// The step runs once per `advance`; after it first returns `None` it is
/// never called again, so upstream side effects happen exactly once.
pub struct StepCursor<T, F> {
    step: F,
    current: Option<T>,
    finished: bool,
}

impl<T, F> StepCursor<T, F>
where
    F: FnMut() -> Option<T>,
{
    pub fn new(step: F) -> Self {
        StepCursor {
            step,
            current: None,
            finished: false,
        }
    }
}

impl<T, F> Cursor<T> for StepCursor<T, F>
where
    F: FnMut() -> Option<T>,
{
    fn advance(&mut self) -> bool {
        if self.finished {
            return false;
        }
        self.current = (self.step)();
        if self.current.is_none() {
            self.finished = true;
        }
        !self.finished
    }

    fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

/// Box a step function as a cursor
pub fn from_step<T, F>(step: F) -> BoxCursor<T>
where
    T: 'static,
    F: FnMut() -> Option<T> + 'static,
{
    Box::new(StepCursor::new(step))
}

/// Index-based cursor over shared, immutable storage
pub struct SliceCursor<T> {
    items: Rc<[T]>,
    next: usize,
}

impl<T> SliceCursor<T> {
    pub fn new(items: Rc<[T]>) -> Self {
        SliceCursor { items, next: 0 }
    }
}

impl<T> Cursor<T> for SliceCursor<T> {
    fn advance(&mut self) -> bool {
        if self.next < self.items.len() {
            self.next += 1;
            true
        } else {
            false
        }
    }

    fn current(&self) -> Option<&T> {
        self.next.checked_sub(1).and_then(|i| self.items.get(i))
    }
}

/// A cursor that never advances
pub struct EmptyCursor;

impl<T> Cursor<T> for EmptyCursor {
    fn advance(&mut self) -> bool {
        false
    }

    fn current(&self) -> Option<&T> {
        None
    }
}

/// Adapts a cursor to Rust's `Iterator`, cloning each element out.
pub struct CursorIter<T> {
    cursor: BoxCursor<T>,
}

impl<T> CursorIter<T> {
    pub fn new(cursor: BoxCursor<T>) -> Self {
        CursorIter { cursor }
    }
}

impl<T: Clone> Iterator for CursorIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.cursor.next_value()
    }
}
