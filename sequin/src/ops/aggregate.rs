//! Eager aggregation terminals.

use std::cmp::Ordering;

use sequin_core::{Identity, Numeric, QueryError, QueryResult};

use crate::comparer::{Comparer, EqualityComparer};
use crate::cursor::Cursor;
use crate::sequence::Sequence;

impl<T: Clone + 'static> Sequence<T> {
    pub fn count(&self) -> usize {
        let mut cursor = self.new_cursor();
        let mut count = 0;
        while cursor.advance() {
            count += 1;
        }
        count
    }

    pub fn count_where(&self, predicate: impl Fn(&T) -> bool) -> usize {
        self.iter().filter(|item| predicate(item)).count()
    }

    /// Whether the sequence has at least one element. Advances once.
    pub fn any(&self) -> bool {
        self.new_cursor().advance()
    }

    pub fn any_where(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.iter().any(|item| predicate(&item))
    }

    /// Whether every element satisfies `predicate`; true when empty.
    pub fn all(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.iter().all(|item| predicate(&item))
    }

    pub fn contains(&self, value: &T) -> bool
    where
        T: Identity,
    {
        self.iter().any(|item| item.equals(value))
    }

    pub fn contains_with(&self, value: &T, comparer: &EqualityComparer<T>) -> bool {
        self.iter().any(|item| comparer.equals(&item, value))
    }

    /// Left fold seeded with the first element.
    pub fn aggregate(&self, func: impl Fn(T, &T) -> T) -> QueryResult<T> {
        let mut iter = self.iter();
        let seed = iter.next().ok_or_else(|| QueryError::empty("aggregate"))?;
        Ok(iter.fold(seed, |acc, item| func(acc, &item)))
    }

    pub fn aggregate_seeded<A>(&self, seed: A, func: impl Fn(A, &T) -> A) -> A {
        self.iter().fold(seed, |acc, item| func(acc, &item))
    }

    /// Seeded left fold whose final accumulator is mapped through `result`.
    pub fn aggregate_with<A, R>(
        &self,
        seed: A,
        func: impl Fn(A, &T) -> A,
        result: impl FnOnce(A) -> R,
    ) -> R {
        result(self.aggregate_seeded(seed, func))
    }

    /// Sum of numeric elements; zero for an empty sequence.
    pub fn sum(&self) -> QueryResult<f64>
    where
        T: Numeric,
    {
        self.sum_by(|item| item.to_number())
    }

    pub fn sum_by<N: Numeric>(&self, selector: impl Fn(&T) -> N) -> QueryResult<f64> {
        let mut total = 0.0;
        for (index, item) in self.iter().enumerate() {
            total += number_at("sum", index, &selector(&item))?;
        }
        Ok(total)
    }

    pub fn average(&self) -> QueryResult<f64>
    where
        T: Numeric,
    {
        self.average_by(|item| item.to_number())
    }

    pub fn average_by<N: Numeric>(&self, selector: impl Fn(&T) -> N) -> QueryResult<f64> {
        let mut total = 0.0;
        let mut count = 0usize;
        for (index, item) in self.iter().enumerate() {
            total += number_at("average", index, &selector(&item))?;
            count += 1;
        }
        if count == 0 {
            return Err(QueryError::empty("average"));
        }
        Ok(total / count as f64)
    }

    /// Smallest element; the first of equal minima wins.
    pub fn min(&self) -> QueryResult<T>
    where
        T: Identity,
    {
        self.min_with(&Comparer::default())
    }

    pub fn min_with(&self, comparer: &Comparer<T>) -> QueryResult<T> {
        extreme(self.iter(), "min", |a, b| comparer.compare(a, b), Ordering::Less)
    }

    pub fn max(&self) -> QueryResult<T>
    where
        T: Identity,
    {
        self.max_with(&Comparer::default())
    }

    pub fn max_with(&self, comparer: &Comparer<T>) -> QueryResult<T> {
        extreme(self.iter(), "max", |a, b| comparer.compare(a, b), Ordering::Greater)
    }

    /// Smallest projected value.
    pub fn min_of<K: Identity>(&self, selector: impl Fn(&T) -> K) -> QueryResult<K> {
        extreme(self.iter().map(|item| selector(&item)), "min", K::compare, Ordering::Less)
    }

    pub fn max_of<K: Identity>(&self, selector: impl Fn(&T) -> K) -> QueryResult<K> {
        extreme(self.iter().map(|item| selector(&item)), "max", K::compare, Ordering::Greater)
    }

    /// Element with the smallest key.
    pub fn min_by<K: Identity>(&self, key: impl Fn(&T) -> K) -> QueryResult<T> {
        let keyed = self.iter().map(|item| (key(&item), item));
        extreme(keyed, "min_by", |a, b| a.0.compare(&b.0), Ordering::Less).map(|(_, item)| item)
    }

    /// Element with the largest key.
    pub fn max_by<K: Identity>(&self, key: impl Fn(&T) -> K) -> QueryResult<T> {
        let keyed = self.iter().map(|item| (key(&item), item));
        extreme(keyed, "max_by", |a, b| a.0.compare(&b.0), Ordering::Greater)
            .map(|(_, item)| item)
    }

    /// Same length and pairwise equal elements.
    pub fn sequence_equal(&self, other: impl Into<Sequence<T>>) -> bool
    where
        T: Identity,
    {
        self.sequence_equal_with(other, &EqualityComparer::default())
    }

    pub fn sequence_equal_with(
        &self,
        other: impl Into<Sequence<T>>,
        comparer: &EqualityComparer<T>,
    ) -> bool {
        let other = other.into();
        let mut left = self.new_cursor();
        let mut right = other.new_cursor();
        loop {
            match (left.advance(), right.advance()) {
                (false, false) => return true,
                (true, true) => {
                    let (Some(a), Some(b)) = (left.current(), right.current()) else {
                        return false;
                    };
                    if !comparer.equals(a, b) {
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }

    pub fn for_each(&self, mut action: impl FnMut(&T)) {
        let mut cursor = self.new_cursor();
        while cursor.advance() {
            if let Some(item) = cursor.current() {
                action(item);
            }
        }
    }

    pub fn for_each_indexed(&self, mut action: impl FnMut(&T, usize)) {
        let mut index = 0;
        self.for_each(|item| {
            action(item, index);
            index += 1;
        });
    }
}

fn number_at<N: Numeric>(operation: &'static str, index: usize, value: &N) -> QueryResult<f64> {
    value.to_number().ok_or_else(|| {
        QueryError::type_mismatch(operation, format_args!("a non-numeric value at index {index}"))
    })
}

/// The first element that no later element beats in direction `wanted`
fn extreme<T>(
    mut items: impl Iterator<Item = T>,
    operation: &'static str,
    compare: impl Fn(&T, &T) -> Ordering,
    wanted: Ordering,
) -> QueryResult<T> {
    let first = items.next().ok_or_else(|| QueryError::empty(operation))?;
    Ok(items.fold(first, |best, item| {
        if compare(&item, &best) == wanted { item } else { best }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sequin_core::QueryErrorKind;

    fn numbers() -> Sequence<i32> {
        Sequence::from(vec![3, 1, 4, 1, 5])
    }

    #[test]
    fn test_count_any_all() {
        assert_eq!(numbers().count(), 5);
        assert_eq!(numbers().count_where(|x| *x == 1), 2);
        assert!(numbers().any());
        assert!(!Sequence::<i32>::empty().any());
        assert!(numbers().any_where(|x| *x > 4));
        assert!(numbers().all(|x| *x > 0));
        assert!(Sequence::<i32>::empty().all(|_| false));
    }

    #[test]
    fn test_contains() {
        assert!(numbers().contains(&4));
        assert!(!numbers().contains(&9));
        let parity = EqualityComparer::new(|a: &i32, b: &i32| a % 2 == b % 2, |x| x % 2);
        assert!(Sequence::from(vec![1, 3]).contains_with(&5, &parity));
    }

    #[test]
    fn test_aggregate() {
        assert_eq!(numbers().aggregate(|a, b| a + b), Ok(14));
        let err = Sequence::<i32>::empty().aggregate(|a, b| a + b).unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::EmptySequence);
        assert_eq!(numbers().aggregate_seeded(100, |a, b| a - b), 86);
        let text = numbers().aggregate_with(String::new(), |s, x| s + &x.to_string(), |s| s.len());
        assert_eq!(text, 5);
    }

    #[test]
    fn test_sum_and_average() {
        assert_eq!(numbers().sum(), Ok(14.0));
        assert_eq!(Sequence::<i32>::empty().sum(), Ok(0.0));
        assert_eq!(Sequence::from(vec![1, 2]).average(), Ok(1.5));
        let err = Sequence::<f64>::empty().average().unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::EmptySequence);
        assert_eq!(Sequence::from(vec!["a", "bb"]).sum_by(|s| s.len()), Ok(3.0));
    }

    #[test]
    fn test_sum_rejects_non_numbers() {
        let values = Sequence::from(vec![Some(1), None]);
        let err = values.sum().unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::TypeMismatch);
        assert!(err.message.contains("index 1"));
    }

    #[test]
    fn test_min_max() {
        assert_eq!(numbers().min(), Ok(1));
        assert_eq!(numbers().max(), Ok(5));
        let err = Sequence::<i32>::empty().min().unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::EmptySequence);
        assert_eq!(numbers().max_with(&Comparer::<i32>::default().reversed()), Ok(1));
    }

    #[test]
    fn test_min_of_and_min_by() {
        let words = Sequence::from(vec!["pear", "fig", "apple", "kiwi"]);
        assert_eq!(words.min_of(|w| w.len()), Ok(3));
        assert_eq!(words.max_by(|w| w.len()), Ok("apple"));
        assert_eq!(words.min_by(|w| w.len() / 2), Ok("fig"));
        assert_eq!(words.max_by(|w| w.len() / 2), Ok("pear"));
    }

    #[test]
    fn test_sequence_equal() {
        assert!(numbers().sequence_equal(vec![3, 1, 4, 1, 5]));
        assert!(!numbers().sequence_equal(vec![3, 1, 4]));
        assert!(!Sequence::from(vec![1]).sequence_equal(vec![1, 2]));
    }

    #[test]
    fn test_for_each() {
        let mut seen = Vec::new();
        numbers().for_each_indexed(|x, i| seen.push((i, *x)));
        assert_eq!(seen.first(), Some(&(0, 3)));
        assert_eq!(seen.len(), 5);
    }
}
