//! Core definitions for Sequin
//!
//! This crate holds the dynamic value model and the identity runtime
//! (hashing, equality and ordering with per-type override hooks) that the
//! query operators in the `sequin` crate build on. It has no notion of
//! sequences itself.

pub mod error;
pub mod identity;
pub mod interner;
pub mod numeric;
pub mod runtime;
pub mod value;

// Re-export commonly used items for convenience
pub use error::{QueryError, QueryErrorKind, QueryResult};
pub use identity::{Identity, combine, compare, equals, hash};
pub use interner::FieldName;
pub use numeric::Numeric;
pub use runtime::{compare_values, equals_values, hash_value, hash_values};
pub use value::{
    ArrayValue, Date, Field, Function, Instance, Iterable, ObjectHooks, Record, Value, ValueKind,
};
