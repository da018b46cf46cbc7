//! Identity runtime for dynamic values.
//!
//! Rules, in order of precedence:
//! - instance hooks (`hash_code`, `equals`, `compare_to`) are trusted verbatim;
//! - null and undefined hash to 0 and are the minimum of the ordering;
//! - primitives use value semantics;
//! - arrays and records are reference values for equality, but hash
//!   structurally. The structural hash is computed once and memoized on the
//!   value, so it stays stable for the value's lifetime even if fields change
//!   afterwards. Cycles are detected and contribute a fixed marker;
//! - everything else hashes by address.

use std::cmp::Ordering;
use std::rc::Rc;

use once_cell::unsync::OnceCell;
use rustc_hash::FxHashSet;

use crate::identity::{Identity, combine, compare_str, hash_number, hash_str};
use crate::numeric::{compare_numbers, numbers_equal};
use crate::value::Value;

/// Contribution of a back-reference while hashing a cyclic structure
const CYCLE_HASH: i32 = 0x5bd1_e995;

// ============================================================================
// Hashing
// ============================================================================

pub fn hash_value(value: &Value) -> i32 {
    hash_in(value, &mut FxHashSet::default())
}

/// Combine the hashes of several values, order-sensitively
pub fn hash_values(values: &[Value]) -> i32 {
    combine(values.iter().map(hash_value))
}

fn hash_in(value: &Value, visiting: &mut FxHashSet<usize>) -> i32 {
    match value {
        Value::Undefined | Value::Null => 0,
        Value::Bool(b) => i32::from(*b),
        Value::Number(n) => hash_number(*n),
        Value::String(s) => hash_str(s),
        Value::Date(d) => hash_number(d.millis() as f64),
        Value::Array(array) => {
            let addr = Rc::as_ptr(array) as usize;
            memoized(array.hash_tag(), addr, visiting, |visiting| {
                let items = array.items();
                combine(items.iter().map(|item| hash_in(item, visiting)))
            })
        }
        Value::Object(record) => {
            let addr = Rc::as_ptr(record) as usize;
            memoized(record.hash_tag(), addr, visiting, |visiting| {
                let entries = record.entries();
                combine(entries.iter().flat_map(|(name, value)| {
                    [name.with_str(hash_str), hash_in(value, visiting)]
                }))
            })
        }
        Value::Instance(instance) => instance
            .hooks()
            .hash_code()
            .unwrap_or_else(|| address_hash(Rc::as_ptr(instance) as usize)),
        Value::Function(func) => address_hash(func.address()),
        Value::Iterable(source) => address_hash(Rc::as_ptr(source) as *const () as usize),
    }
}

fn memoized(
    tag: &OnceCell<i32>,
    addr: usize,
    visiting: &mut FxHashSet<usize>,
    compute: impl FnOnce(&mut FxHashSet<usize>) -> i32,
) -> i32 {
    if let Some(hash) = tag.get() {
        return *hash;
    }
    if !visiting.insert(addr) {
        return CYCLE_HASH;
    }
    let hash = compute(visiting);
    visiting.remove(&addr);
    *tag.get_or_init(|| hash)
}

/// Spread an address over 32 bits; aligned pointers share their low bits
fn address_hash(addr: usize) -> i32 {
    let mixed = (addr as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
    (mixed >> 32) as i32
}

// ============================================================================
// Equality
// ============================================================================

pub fn equals_values(a: &Value, b: &Value) -> bool {
    if let Value::Instance(instance) = a {
        if let Some(result) = instance.hooks().equals(b) {
            return result;
        }
    }
    if let Value::Instance(instance) = b {
        if let Some(result) = instance.hooks().equals(a) {
            return result;
        }
    }
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => numbers_equal(*x, *y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x == y,
        (Value::Array(x), Value::Array(y)) => Rc::ptr_eq(x, y),
        (Value::Object(x), Value::Object(y)) => Rc::ptr_eq(x, y),
        (Value::Instance(x), Value::Instance(y)) => Rc::ptr_eq(x, y),
        (Value::Function(x), Value::Function(y)) => x.ptr_eq(y),
        (Value::Iterable(x), Value::Iterable(y)) => std::ptr::addr_eq(Rc::as_ptr(x), Rc::as_ptr(y)),
        _ => false,
    }
}

// ============================================================================
// Ordering
// ============================================================================

pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a.is_nullish(), b.is_nullish()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    if let Value::Instance(instance) = a {
        if let Some(ordering) = instance.hooks().compare_to(b) {
            return ordering;
        }
    }
    if let Value::Instance(instance) = b {
        if let Some(ordering) = instance.hooks().compare_to(a) {
            return ordering.reverse();
        }
    }
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(*x, *y),
        (Value::String(x), Value::String(y)) => compare_str(x, y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Date(x), Value::Date(y)) => x.cmp(y),
        (Value::String(_), _) | (_, Value::String(_)) => {
            compare_str(&a.to_string(), &b.to_string())
        }
        _ => match (a.numeric_value(), b.numeric_value()) {
            (Some(x), Some(y)) => compare_numbers(x, y),
            _ => compare_str(&a.to_string(), &b.to_string()),
        },
    }
}

impl Identity for Value {
    fn hash_code(&self) -> i32 {
        hash_value(self)
    }

    fn equals(&self, other: &Self) -> bool {
        equals_values(self, other)
    }

    fn compare(&self, other: &Self) -> Ordering {
        compare_values(self, other)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        equals_values(self, other)
    }
}
