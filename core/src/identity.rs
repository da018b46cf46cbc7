//! Value identity: hashing, equality and ordering with override points.
//!
//! [`Identity`] is the contract every element type used as a key, a set
//! member or a sort key fulfils. The implementations here cover primitives,
//! strings, options, tuples and sequences; dynamic [`Value`]s get theirs from
//! the runtime module. A type overrides identity by implementing the trait
//! itself.
//!
//! Hashes are 32-bit and deterministic for a value's observable state, so
//! they are stable across runs (no random seeding).
//!
//! [`Value`]: crate::value::Value

use std::cmp::Ordering;
use std::rc::Rc;

use crate::error::{QueryError, QueryResult};
use crate::numeric::{compare_numbers, is_integral, numbers_equal};

/// Hash, equality and ordering for one value.
///
/// Implementations must keep `equals(a, b)` implying
/// `hash_code(a) == hash_code(b)`; the bucket-based operators rely on it.
pub trait Identity {
    fn hash_code(&self) -> i32;

    fn equals(&self, other: &Self) -> bool;

    fn compare(&self, other: &Self) -> Ordering;
}

/// Starting value of the multi-value combiner
pub const HASH_SEED: i32 = 17;

/// Multiplier of the multi-value combiner
pub const HASH_FACTOR: i32 = 31;

pub fn hash<T: Identity + ?Sized>(value: &T) -> i32 {
    value.hash_code()
}

pub fn equals<T: Identity + ?Sized>(a: &T, b: &T) -> bool {
    a.equals(b)
}

pub fn compare<T: Identity + ?Sized>(a: &T, b: &T) -> Ordering {
    a.compare(b)
}

/// Order-sensitive combination of several hashes into one
pub fn combine<I: IntoIterator<Item = i32>>(hashes: I) -> i32 {
    hashes.into_iter().fold(HASH_SEED, |acc, h| {
        acc.wrapping_mul(HASH_FACTOR).wrapping_add(h)
    })
}

/// Hash several values of possibly different types into one composite hash.
#[macro_export]
macro_rules! hash_of {
    ($($value:expr),+ $(,)?) => {
        $crate::identity::combine([$($crate::identity::Identity::hash_code(&$value)),+])
    };
}

/// Position-weighted rolling hash over UTF-16 code units
pub fn hash_str(s: &str) -> i32 {
    s.encode_utf16().fold(0i32, |acc, unit| {
        acc.wrapping_mul(HASH_FACTOR).wrapping_add(i32::from(unit))
    })
}

/// Lexicographic order by UTF-16 code unit
pub fn compare_str(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Integers hash to themselves (mod 2^32); other numbers hash through their
/// bit pattern. NaN hashes to 0.
pub fn hash_number(n: f64) -> i32 {
    if n.is_nan() {
        return 0;
    }
    if is_integral(n) {
        return n as i64 as i32;
    }
    let bits = n.to_bits();
    combine([(bits >> 32) as i32, bits as i32])
}

/// Report an error when two equal values hash differently.
pub fn check_consistency<T: Identity + ?Sized>(a: &T, b: &T) -> QueryResult<()> {
    if a.equals(b) && a.hash_code() != b.hash_code() {
        return Err(QueryError::argument(
            "check_consistency",
            format!(
                "values are equal but hash differently ({} vs {})",
                a.hash_code(),
                b.hash_code()
            ),
        ));
    }
    Ok(())
}

// ============================================================================
// Primitive Implementations
// ============================================================================

macro_rules! impl_identity_integer {
    ($($t:ty),* $(,)?) => {
        $(
            impl Identity for $t {
                #[inline]
                fn hash_code(&self) -> i32 {
                    *self as i32
                }

                #[inline]
                fn equals(&self, other: &Self) -> bool {
                    self == other
                }

                #[inline]
                fn compare(&self, other: &Self) -> Ordering {
                    self.cmp(other)
                }
            }
        )*
    };
}

impl_identity_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Identity for f64 {
    fn hash_code(&self) -> i32 {
        hash_number(*self)
    }

    fn equals(&self, other: &Self) -> bool {
        numbers_equal(*self, *other)
    }

    fn compare(&self, other: &Self) -> Ordering {
        compare_numbers(*self, *other)
    }
}

impl Identity for f32 {
    fn hash_code(&self) -> i32 {
        hash_number(f64::from(*self))
    }

    fn equals(&self, other: &Self) -> bool {
        numbers_equal(f64::from(*self), f64::from(*other))
    }

    fn compare(&self, other: &Self) -> Ordering {
        compare_numbers(f64::from(*self), f64::from(*other))
    }
}

impl Identity for bool {
    fn hash_code(&self) -> i32 {
        i32::from(*self)
    }

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl Identity for char {
    fn hash_code(&self) -> i32 {
        *self as i32
    }

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

impl Identity for () {
    fn hash_code(&self) -> i32 {
        0
    }

    fn equals(&self, _other: &Self) -> bool {
        true
    }

    fn compare(&self, _other: &Self) -> Ordering {
        Ordering::Equal
    }
}

impl Identity for str {
    fn hash_code(&self) -> i32 {
        hash_str(self)
    }

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn compare(&self, other: &Self) -> Ordering {
        compare_str(self, other)
    }
}

impl Identity for String {
    fn hash_code(&self) -> i32 {
        hash_str(self)
    }

    fn equals(&self, other: &Self) -> bool {
        self == other
    }

    fn compare(&self, other: &Self) -> Ordering {
        compare_str(self, other)
    }
}

// ============================================================================
// Wrapper and Composite Implementations
// ============================================================================

impl<T: Identity + ?Sized> Identity for &T {
    fn hash_code(&self) -> i32 {
        (**self).hash_code()
    }

    fn equals(&self, other: &Self) -> bool {
        (**self).equals(*other)
    }

    fn compare(&self, other: &Self) -> Ordering {
        (**self).compare(*other)
    }
}

impl<T: Identity + ?Sized> Identity for Rc<T> {
    fn hash_code(&self) -> i32 {
        (**self).hash_code()
    }

    fn equals(&self, other: &Self) -> bool {
        (**self).equals(other)
    }

    fn compare(&self, other: &Self) -> Ordering {
        (**self).compare(other)
    }
}

impl<T: Identity + ?Sized> Identity for Box<T> {
    fn hash_code(&self) -> i32 {
        (**self).hash_code()
    }

    fn equals(&self, other: &Self) -> bool {
        (**self).equals(other)
    }

    fn compare(&self, other: &Self) -> Ordering {
        (**self).compare(other)
    }
}

/// `None` behaves like null: hashes to 0 and sorts below everything
impl<T: Identity> Identity for Option<T> {
    fn hash_code(&self) -> i32 {
        self.as_ref().map_or(0, Identity::hash_code)
    }

    fn equals(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.equals(b),
            (None, None) => true,
            _ => false,
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Some(a), Some(b)) => a.compare(b),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        }
    }
}

impl<T: Identity> Identity for [T] {
    fn hash_code(&self) -> i32 {
        combine(self.iter().map(Identity::hash_code))
    }

    fn equals(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.equals(b))
    }

    fn compare(&self, other: &Self) -> Ordering {
        for (a, b) in self.iter().zip(other) {
            match a.compare(b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        self.len().cmp(&other.len())
    }
}

impl<T: Identity> Identity for Vec<T> {
    fn hash_code(&self) -> i32 {
        self.as_slice().hash_code()
    }

    fn equals(&self, other: &Self) -> bool {
        self.as_slice().equals(other.as_slice())
    }

    fn compare(&self, other: &Self) -> Ordering {
        self.as_slice().compare(other.as_slice())
    }
}

macro_rules! impl_identity_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: Identity),+> Identity for ($($name,)+) {
            fn hash_code(&self) -> i32 {
                combine([$(self.$idx.hash_code()),+])
            }

            fn equals(&self, other: &Self) -> bool {
                $(self.$idx.equals(&other.$idx))&&+
            }

            fn compare(&self, other: &Self) -> Ordering {
                Ordering::Equal
                    $(.then_with(|| self.$idx.compare(&other.$idx)))+
            }
        }
    };
}

impl_identity_tuple!(A: 0, B: 1);
impl_identity_tuple!(A: 0, B: 1, C: 2);
impl_identity_tuple!(A: 0, B: 1, C: 2, D: 3);
