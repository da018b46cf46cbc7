//! The operator catalog, as inherent methods on [`Sequence`].
//!
//! Deferred operators only capture their arguments and upstream; the eager
//! terminals (aggregation, element access, conversion) drive a traversal
//! immediately.
//!
//! [`Sequence`]: crate::sequence::Sequence

pub mod aggregate;
pub mod convert;
pub mod element;
pub mod filter;
pub mod grouping;
pub mod ordering;
pub mod projection;
pub mod set;

pub use ordering::OrderedSequence;
