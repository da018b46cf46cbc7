//! Query error types and handling.

use std::fmt;

use thiserror::Error;

/// Result type returned by every fallible query operation.
pub type QueryResult<T> = Result<T, QueryError>;

/// Categories of query errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryErrorKind {
    /// Malformed argument, or a range precondition was violated
    Argument,
    /// The operation needs at least one element
    EmptySequence,
    /// More than one element matched where exactly one was required
    MoreThanOne,
    /// No element satisfied the predicate
    NotFound,
    /// A key was added twice to a unique-key store
    DuplicateKey,
    /// An index fell outside the sequence
    OutOfRange,
    /// An element was not of the type the operation needs
    TypeMismatch,
}

impl fmt::Display for QueryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            QueryErrorKind::Argument => "ArgumentError",
            QueryErrorKind::EmptySequence => "EmptySequenceError",
            QueryErrorKind::MoreThanOne => "CardinalityError",
            QueryErrorKind::NotFound => "NotFoundError",
            QueryErrorKind::DuplicateKey => "DuplicateKeyError",
            QueryErrorKind::OutOfRange => "OutOfRangeError",
            QueryErrorKind::TypeMismatch => "TypeError",
        };
        f.write_str(name)
    }
}

/// A query error with the operation that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} in {operation}: {message}")]
pub struct QueryError {
    /// The category of error
    pub kind: QueryErrorKind,
    /// Name of the operation that detected the error
    pub operation: &'static str,
    /// Human-readable error message
    pub message: String,
}

impl QueryError {
    /// Create a new query error.
    pub fn new(kind: QueryErrorKind, operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            kind,
            operation,
            message: message.into(),
        }
    }

    /// Create an argument error.
    pub fn argument(operation: &'static str, message: impl Into<String>) -> Self {
        Self::new(QueryErrorKind::Argument, operation, message)
    }

    /// Create an empty-sequence error.
    pub fn empty(operation: &'static str) -> Self {
        Self::new(
            QueryErrorKind::EmptySequence,
            operation,
            "sequence contains no elements",
        )
    }

    /// Create a cardinality error.
    pub fn more_than_one(operation: &'static str) -> Self {
        Self::new(
            QueryErrorKind::MoreThanOne,
            operation,
            "sequence contains more than one matching element",
        )
    }

    /// Create a not-found error.
    pub fn not_found(operation: &'static str) -> Self {
        Self::new(
            QueryErrorKind::NotFound,
            operation,
            "no element satisfies the predicate",
        )
    }

    /// Create a duplicate-key error.
    pub fn duplicate_key(operation: &'static str) -> Self {
        Self::new(
            QueryErrorKind::DuplicateKey,
            operation,
            "an element with the same key has already been added",
        )
    }

    /// Create an out-of-range error for `index`.
    pub fn out_of_range(operation: &'static str, index: i64) -> Self {
        Self::new(
            QueryErrorKind::OutOfRange,
            operation,
            format!("index {index} is outside the bounds of the sequence"),
        )
    }

    /// Create a type error naming the offending type.
    pub fn type_mismatch(operation: &'static str, found: impl fmt::Display) -> Self {
        Self::new(
            QueryErrorKind::TypeMismatch,
            operation,
            format!("expected a number, got {found}"),
        )
    }
}

impl From<QueryError> for String {
    fn from(err: QueryError) -> String {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_display() {
        let err = QueryError::empty("first");
        assert_eq!(
            err.to_string(),
            "EmptySequenceError in first: sequence contains no elements"
        );
    }

    #[test]
    fn test_query_error_kind() {
        assert_eq!(QueryError::not_found("single").kind, QueryErrorKind::NotFound);
        assert_eq!(
            QueryError::more_than_one("single").kind,
            QueryErrorKind::MoreThanOne
        );
        assert_eq!(
            QueryError::duplicate_key("to_dictionary").kind,
            QueryErrorKind::DuplicateKey
        );
    }

    #[test]
    fn test_out_of_range_mentions_index() {
        let err = QueryError::out_of_range("element_at", -3);
        assert_eq!(err.kind, QueryErrorKind::OutOfRange);
        assert!(err.message.contains("-3"));
    }

    #[test]
    fn test_query_error_into_string() {
        let err = QueryError::type_mismatch("sum", "string");
        let s: String = err.into();
        assert!(s.contains("expected a number, got string"));
    }
}
