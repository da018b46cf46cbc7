//! Keyed collections built on the bucket store.

pub mod dictionary;
pub mod lookup;
pub mod set;

pub use dictionary::Dictionary;
pub use lookup::{Grouping, Lookup};
pub use set::KeyedSet;
