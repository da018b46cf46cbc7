//! Element access terminals.
//!
//! The `_or_default` forms return `None` where the plain forms fail;
//! callers pick their own default with `unwrap_or`.

use sequin_core::{QueryError, QueryResult};

use crate::cursor::Cursor;
use crate::sequence::Sequence;

/// Outcome of scanning for exactly one match
enum Single<T> {
    None,
    One(T),
    Many,
}

impl<T: Clone + 'static> Sequence<T> {
    pub fn first(&self) -> QueryResult<T> {
        self.new_cursor()
            .next_value()
            .ok_or_else(|| QueryError::empty("first"))
    }

    pub fn first_where(&self, predicate: impl Fn(&T) -> bool) -> QueryResult<T> {
        self.iter()
            .find(|item| predicate(item))
            .ok_or_else(|| QueryError::not_found("first"))
    }

    pub fn first_or_default(&self) -> Option<T> {
        self.new_cursor().next_value()
    }

    pub fn first_or_default_where(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.iter().find(|item| predicate(item))
    }

    pub fn last(&self) -> QueryResult<T> {
        self.iter().last().ok_or_else(|| QueryError::empty("last"))
    }

    pub fn last_where(&self, predicate: impl Fn(&T) -> bool) -> QueryResult<T> {
        self.last_or_default_where(predicate)
            .ok_or_else(|| QueryError::not_found("last"))
    }

    pub fn last_or_default(&self) -> Option<T> {
        self.iter().last()
    }

    pub fn last_or_default_where(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.iter().filter(|item| predicate(item)).last()
    }

    /// The only element; an error when there are none or several.
    pub fn single(&self) -> QueryResult<T> {
        match self.scan_single(|_| true) {
            Single::One(item) => Ok(item),
            Single::None => Err(QueryError::empty("single")),
            Single::Many => Err(QueryError::more_than_one("single")),
        }
    }

    pub fn single_where(&self, predicate: impl Fn(&T) -> bool) -> QueryResult<T> {
        match self.scan_single(predicate) {
            Single::One(item) => Ok(item),
            Single::None => Err(QueryError::not_found("single")),
            Single::Many => Err(QueryError::more_than_one("single")),
        }
    }

    /// The only element, or `None` when empty. Several elements are still
    /// an error.
    pub fn single_or_default(&self) -> QueryResult<Option<T>> {
        self.single_or_default_where(|_| true)
    }

    pub fn single_or_default_where(
        &self,
        predicate: impl Fn(&T) -> bool,
    ) -> QueryResult<Option<T>> {
        match self.scan_single(predicate) {
            Single::One(item) => Ok(Some(item)),
            Single::None => Ok(None),
            Single::Many => Err(QueryError::more_than_one("single_or_default")),
        }
    }

    /// Stops at the second match.
    fn scan_single(&self, predicate: impl Fn(&T) -> bool) -> Single<T> {
        let mut matches = self.iter().filter(|item| predicate(item));
        match (matches.next(), matches.next()) {
            (None, _) => Single::None,
            (Some(item), None) => Single::One(item),
            (Some(_), Some(_)) => Single::Many,
        }
    }

    /// Element at a zero-based position.
    pub fn element_at(&self, index: i64) -> QueryResult<T> {
        self.element_at_or_default(index)
            .ok_or_else(|| QueryError::out_of_range("element_at", index))
    }

    pub fn element_at_or_default(&self, index: i64) -> Option<T> {
        let index = usize::try_from(index).ok()?;
        let mut cursor = self.new_cursor();
        for _ in 0..index {
            if !cursor.advance() {
                return None;
            }
        }
        cursor.next_value()
    }
}
