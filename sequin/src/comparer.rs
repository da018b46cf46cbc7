//! Ordering and equality strategies.
//!
//! Both comparers are immutable, cheap-to-clone holders around user
//! functions. Their `Default` instances delegate to the element type's
//! [`Identity`] implementation and are built on demand, never shared
//! through global state.

use std::any::Any;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use sequin_core::identity;
use sequin_core::{Function, Identity, ObjectHooks, QueryError, QueryResult, Value};

// ============================================================================
// Strategy traits
// ============================================================================

/// An object that knows how to order two values.
pub trait CompareStrategy<T> {
    fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// An object that knows how to test two values for equality and hash them.
pub trait EqualityStrategy<T> {
    fn equals(&self, a: &T, b: &T) -> bool;

    fn hash(&self, value: &T) -> i32;
}

// ============================================================================
// Comparer
// ============================================================================

/// Total ordering strategy.
pub struct Comparer<T> {
    compare: Rc<dyn Fn(&T, &T) -> Ordering>,
}

impl<T> Clone for Comparer<T> {
    fn clone(&self) -> Self {
        Comparer {
            compare: Rc::clone(&self.compare),
        }
    }
}

impl<T> fmt::Debug for Comparer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Comparer")
    }
}

impl<T: Identity + 'static> Default for Comparer<T> {
    fn default() -> Self {
        Comparer::new(|a: &T, b: &T| identity::compare(a, b))
    }
}

impl<T: 'static> Comparer<T> {
    pub fn new(compare: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Comparer {
            compare: Rc::new(compare),
        }
    }

    /// Adapt an object implementing [`CompareStrategy`].
    pub fn from_strategy(strategy: impl CompareStrategy<T> + 'static) -> Self {
        Comparer::new(move |a, b| strategy.compare(a, b))
    }

    /// Order by a projected key.
    pub fn by_key<K: 'static>(key: impl Fn(&T) -> K + 'static, keys: Comparer<K>) -> Self {
        Comparer::new(move |a, b| keys.compare(&key(a), &key(b)))
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.compare)(a, b)
    }

    /// The same ordering with its sign inverted.
    pub fn reversed(&self) -> Self {
        let inner = self.clone();
        Comparer::new(move |a, b| inner.compare(a, b).reverse())
    }
}

impl<T: Identity + 'static> Comparer<T> {
    /// The supplied comparer, or the default one.
    pub fn resolve(comparer: Option<Comparer<T>>) -> Self {
        comparer.unwrap_or_default()
    }
}

// ============================================================================
// EqualityComparer
// ============================================================================

/// Equality plus a hash consistent with it.
pub struct EqualityComparer<T> {
    equals: Rc<dyn Fn(&T, &T) -> bool>,
    hash: Rc<dyn Fn(&T) -> i32>,
}

impl<T> Clone for EqualityComparer<T> {
    fn clone(&self) -> Self {
        EqualityComparer {
            equals: Rc::clone(&self.equals),
            hash: Rc::clone(&self.hash),
        }
    }
}

impl<T> fmt::Debug for EqualityComparer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EqualityComparer")
    }
}

impl<T: Identity + 'static> Default for EqualityComparer<T> {
    fn default() -> Self {
        EqualityComparer::new(
            |a: &T, b: &T| identity::equals(a, b),
            |value: &T| identity::hash(value),
        )
    }
}

impl<T: 'static> EqualityComparer<T> {
    pub fn new(
        equals: impl Fn(&T, &T) -> bool + 'static,
        hash: impl Fn(&T) -> i32 + 'static,
    ) -> Self {
        EqualityComparer {
            equals: Rc::new(equals),
            hash: Rc::new(hash),
        }
    }

    /// Comparer from an equality function alone.
    ///
    /// Every value hashes alike, so keyed lookups degrade to a linear scan
    /// but stay correct for any `equals`.
    pub fn from_equals(equals: impl Fn(&T, &T) -> bool + 'static) -> Self {
        EqualityComparer::new(equals, |_| 0)
    }

    /// Adapt an object implementing [`EqualityStrategy`].
    pub fn from_strategy(strategy: impl EqualityStrategy<T> + 'static) -> Self {
        let strategy = Rc::new(strategy);
        let hasher = Rc::clone(&strategy);
        EqualityComparer::new(
            move |a, b| strategy.equals(a, b),
            move |value| hasher.hash(value),
        )
    }

    /// Compare by a projected key.
    pub fn by_key<K: 'static>(
        key: impl Fn(&T) -> K + 'static,
        keys: EqualityComparer<K>,
    ) -> Self {
        let key = Rc::new(key);
        let hash_key = Rc::clone(&key);
        let hash_keys = keys.clone();
        EqualityComparer::new(
            move |a, b| keys.equals(&key(a), &key(b)),
            move |value| hash_keys.hash(&hash_key(value)),
        )
    }

    pub fn equals(&self, a: &T, b: &T) -> bool {
        (self.equals)(a, b)
    }

    pub fn hash(&self, value: &T) -> i32 {
        (self.hash)(value)
    }
}

impl<T: Identity + 'static> EqualityComparer<T> {
    /// The supplied comparer, or the default one.
    pub fn resolve(comparer: Option<EqualityComparer<T>>) -> Self {
        comparer.unwrap_or_default()
    }
}

// ============================================================================
// Dynamic normalization
// ============================================================================

impl ObjectHooks for Comparer<Value> {
    fn type_name(&self) -> &str {
        "Comparer"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl ObjectHooks for EqualityComparer<Value> {
    fn type_name(&self) -> &str {
        "EqualityComparer"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Sign of a user comparison result, with non-numbers treated as a tie
fn ordering_of(result: &Value) -> Ordering {
    match result.numeric_value() {
        Some(n) if n < 0.0 => Ordering::Less,
        Some(n) if n > 0.0 => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Find a callable field on a plain record
fn method(value: &Value, name: &str) -> Option<Function> {
    match value {
        Value::Object(record) => record.get(name)?.as_function().cloned(),
        _ => None,
    }
}

impl Comparer<Value> {
    /// Normalize a dynamic argument into a comparer.
    ///
    /// Accepts null or undefined (the default comparer), a wrapped comparer
    /// (returned as-is), a function `(a, b) -> number`, or a record with a
    /// `compare` method.
    pub fn from_value(value: &Value) -> QueryResult<Self> {
        if value.is_nullish() {
            return Ok(Comparer::default());
        }
        if let Value::Instance(instance) = value {
            if let Some(comparer) = instance.downcast_ref::<Comparer<Value>>() {
                return Ok(comparer.clone());
            }
        }
        let function = match value {
            Value::Function(function) => function.clone(),
            _ => method(value, "compare").ok_or_else(|| {
                QueryError::argument(
                    "Comparer::from_value",
                    format!("cannot build a comparer from {}", value.kind()),
                )
            })?,
        };
        Ok(Comparer::new(move |a: &Value, b: &Value| {
            ordering_of(&function.call(&[a.clone(), b.clone()]))
        }))
    }

    /// Wrap this comparer as a dynamic value.
    pub fn into_value(self) -> Value {
        Value::instance(self)
    }
}

impl EqualityComparer<Value> {
    /// Normalize a dynamic argument into an equality comparer.
    ///
    /// Accepts null or undefined (the default comparer), a wrapped comparer
    /// (returned as-is), a function `(a, b) -> bool`, or a record with an
    /// `equals` method and an optional `hash` method.
    pub fn from_value(value: &Value) -> QueryResult<Self> {
        if value.is_nullish() {
            return Ok(EqualityComparer::default());
        }
        if let Value::Instance(instance) = value {
            if let Some(comparer) = instance.downcast_ref::<EqualityComparer<Value>>() {
                return Ok(comparer.clone());
            }
        }
        let equals = match value {
            Value::Function(function) => function.clone(),
            _ => method(value, "equals").ok_or_else(|| {
                QueryError::argument(
                    "EqualityComparer::from_value",
                    format!("cannot build an equality comparer from {}", value.kind()),
                )
            })?,
        };
        let equals = move |a: &Value, b: &Value| equals.call(&[a.clone(), b.clone()]).is_truthy();
        match method(value, "hash") {
            Some(hash) => Ok(EqualityComparer::new(equals, move |v: &Value| {
                hash.call(std::slice::from_ref(v))
                    .numeric_value()
                    .map_or(0, sequin_core::identity::hash_number)
            })),
            None => Ok(EqualityComparer::from_equals(equals)),
        }
    }

    pub fn into_value(self) -> Value {
        Value::instance(self)
    }
}
