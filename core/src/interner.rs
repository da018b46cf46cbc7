//! Field names of dynamic records.
//!
//! Every record field is keyed by a [`FieldName`]: a handle into one
//! process-wide name table, so two records that both carry `"id"` share
//! the handle and field lookup is a handle comparison. Array-like records
//! address their elements through index names (`"0"`, `"1"`, ...) next to
//! a `length` field; both have helpers here.
//!
//! A record's hash is computed from field text, never from handles, so it
//! does not depend on the order in which names entered the table.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

static NAMES: Lazy<RwLock<StringInterner<DefaultBackend>>> =
    Lazy::new(|| RwLock::new(StringInterner::default()));

static LENGTH: Lazy<FieldName> = Lazy::new(|| FieldName::new("length"));

/// Handle for a record field name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldName(DefaultSymbol);

impl FieldName {
    /// The handle for `name`, adding it to the table on first use
    pub fn new(name: &str) -> Self {
        let mut names = NAMES.write().unwrap_or_else(PoisonError::into_inner);
        FieldName(names.get_or_intern(name))
    }

    /// The handle for `name` if some record has used it. Reads of unknown
    /// fields go through here so they never grow the table.
    pub fn existing(name: &str) -> Option<Self> {
        let names = NAMES.read().unwrap_or_else(PoisonError::into_inner);
        names.get(name).map(FieldName)
    }

    /// The `length` field of array-like records
    pub fn length() -> Self {
        *LENGTH
    }

    /// The element field at `index` of an array-like record, if any record
    /// has used it
    pub fn existing_index(index: usize) -> Option<Self> {
        FieldName::existing(&index.to_string())
    }

    pub fn resolve(&self) -> String {
        self.with_str(str::to_string)
    }

    /// Borrow the field's text for the duration of `f`
    pub fn with_str<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&str) -> R,
    {
        let names = NAMES.read().unwrap_or_else(PoisonError::into_inner);
        f(names.resolve(self.0).unwrap_or_default())
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        FieldName::new(name)
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.with_str(|s| f.write_str(s))
    }
}
