use std::cmp::Ordering;

use num_traits::ToPrimitive;

// ============================================================================
// Numeric Coercion
// ============================================================================

/// Types whose values can take part in `sum` and `average`.
///
/// Returning `None` marks the value as non-numeric; the numeric terminals
/// report a type error for it.
pub trait Numeric {
    fn to_number(&self) -> Option<f64>;
}

macro_rules! impl_numeric_primitive {
    ($($t:ty),* $(,)?) => {
        $(
            impl Numeric for $t {
                #[inline]
                fn to_number(&self) -> Option<f64> {
                    ToPrimitive::to_f64(self)
                }
            }
        )*
    };
}

impl_numeric_primitive!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

impl<T: Numeric + ?Sized> Numeric for &T {
    fn to_number(&self) -> Option<f64> {
        (**self).to_number()
    }
}

impl<T: Numeric> Numeric for Option<T> {
    fn to_number(&self) -> Option<f64> {
        self.as_ref().and_then(Numeric::to_number)
    }
}

// ============================================================================
// Number Identity Helpers
// ============================================================================

/// Largest magnitude for which an integral float still fits an i64.
const I64_LIMIT: f64 = 9_223_372_036_854_775_807.0;

/// Whether `n` is integral and small enough to hash as an integer
pub fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < I64_LIMIT
}

/// Equality that is reflexive for NaN and treats `0.0 == -0.0`
pub fn numbers_equal(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Total order on floats: NaN sorts below every other number
pub fn compare_numbers(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

/// Render a number the way string conversion does: the shortest digits
/// that round-trip, positional from `1e-6` up to `1e21` and exponent
/// notation (`1e+21`, `1.5e-7`) outside that range. `NaN`, `Infinity` and
/// `-Infinity` are spelled out and `-0` prints as `0`.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_number(-n));
    }

    // `{:e}` yields the shortest round-trip digits as `d.ddde±x`
    let scientific = format!("{n:e}");
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let k = digits.len() as i32;
    // Decimal point position relative to the start of `digits`
    let point = exponent.parse::<i32>().unwrap_or(0) + 1;

    if k <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{whole}.{fraction}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let e = point - 1;
        let sign = if e < 0 { '-' } else { '+' };
        let (lead, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{lead}e{sign}{}", e.abs())
        } else {
            format!("{lead}.{rest}e{sign}{}", e.abs())
        }
    }
}
