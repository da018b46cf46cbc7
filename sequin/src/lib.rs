//! Sequin: lazy, restartable query sequences.
//!
//! A [`Sequence`] wraps any source behind a uniform cursor protocol and
//! offers a catalog of composable operators (filtering, projection,
//! grouping, joins, ordering, set algebra, aggregation). Deferred operators
//! do no work until a cursor advances; keyed operators run on the
//! [`KeyedBucketStore`] under pluggable [`EqualityComparer`]s and
//! [`Comparer`]s, with identity semantics from [`sequin_core`].
//!
//! ```
//! use sequin::Sequence;
//!
//! let evens = Sequence::from(vec![1, 2, 3, 4, 5]).where_(|x| x % 2 == 0);
//! assert_eq!(evens.to_list(), vec![2, 4]);
//! ```

pub mod adapter;
pub mod collections;
pub mod comparer;
pub mod cursor;
pub mod dynamic;
pub mod materialize;
pub mod ops;
pub mod sequence;
pub mod sort;
pub mod source;
pub mod store;

pub use collections::{Dictionary, Grouping, KeyedSet, Lookup};
pub use comparer::{CompareStrategy, Comparer, EqualityComparer, EqualityStrategy};
pub use cursor::{BoxCursor, Cursor, CursorIter};
pub use materialize::MaterializingCursor;
pub use ops::OrderedSequence;
pub use sequence::Sequence;
pub use source::Sink;
pub use store::{BucketConfig, KeyedBucketStore};

// Re-export the core crate for convenience
pub use sequin_core::{
    ArrayValue, Date, FieldName, Function, Identity, Instance, Iterable, Numeric, ObjectHooks,
    QueryError, QueryErrorKind, QueryResult, Record, Value, ValueKind, combine, compare, equals,
    hash, hash_of,
};

/// Resolve any dynamic value into a sequence of values.
pub fn sequence(value: impl Into<Value>) -> Sequence<Value> {
    Sequence::from_value(value.into())
}
