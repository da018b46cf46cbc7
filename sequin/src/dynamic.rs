//! Operators over dynamic values that take their arguments as values too.
//!
//! Each one checks its arguments up front: callables must be functions and
//! counts must be numbers. A bad argument is an `Argument` error raised
//! before anything lazy is set up. Callbacks receive the element and, as
//! a second argument, its index.

use sequin_core::{Function, QueryError, QueryResult, Value, ValueKind};

use crate::collections::Grouping;
use crate::comparer::{Comparer, EqualityComparer};
use crate::ops::OrderedSequence;
use crate::sequence::Sequence;

fn callable(operation: &'static str, value: &Value) -> QueryResult<Function> {
    value.as_function().cloned().ok_or_else(|| {
        QueryError::argument(operation, format!("expected a function, got {}", value.kind()))
    })
}

fn count_argument(operation: &'static str, value: &Value) -> QueryResult<i64> {
    match value.as_number() {
        Some(n) if n.is_nan() => Ok(0),
        Some(n) => Ok(n.trunc() as i64),
        None => Err(QueryError::argument(
            operation,
            format!("expected a number, got {}", value.kind()),
        )),
    }
}

impl Sequence<Value> {
    /// Elements of the given kind.
    pub fn of_type(&self, kind: ValueKind) -> Sequence<Value> {
        self.where_(move |item| item.kind() == kind)
    }

    pub fn where_dyn(&self, predicate: &Value) -> QueryResult<Sequence<Value>> {
        let predicate = callable("where", predicate)?;
        Ok(self.where_indexed(move |item, index| {
            predicate.call(&[item.clone(), Value::from(index)]).is_truthy()
        }))
    }

    pub fn select_dyn(&self, selector: &Value) -> QueryResult<Sequence<Value>> {
        let selector = callable("select", selector)?;
        Ok(self.select_indexed(move |item, index| {
            selector.call(&[item.clone(), Value::from(index)])
        }))
    }

    /// Sort by a key function, with an optional comparer value (null for
    /// the default ordering).
    pub fn order_by_dyn(
        &self,
        key: &Value,
        comparer: &Value,
    ) -> QueryResult<OrderedSequence<Value>> {
        let key = callable("order_by", key)?;
        let comparer = Comparer::from_value(comparer)?;
        Ok(self.order_by_with(move |item| key.call(std::slice::from_ref(item)), comparer))
    }

    /// Group by a key function, with an optional equality comparer value.
    pub fn group_by_dyn(
        &self,
        key: &Value,
        comparer: &Value,
    ) -> QueryResult<Sequence<Grouping<Value, Value>>> {
        let key = callable("group_by", key)?;
        let comparer = EqualityComparer::from_value(comparer)?;
        Ok(self.group_by_with(
            move |item| key.call(std::slice::from_ref(item)),
            Value::clone,
            comparer,
        ))
    }

    /// Left fold; without a seed the first element seeds it.
    pub fn aggregate_dyn(&self, seed: Option<Value>, func: &Value) -> QueryResult<Value> {
        let func = callable("aggregate", func)?;
        let step = |acc: Value, item: &Value| func.call(&[acc, item.clone()]);
        match seed {
            Some(seed) => Ok(self.aggregate_seeded(seed, step)),
            None => self.aggregate(step),
        }
    }

    pub fn take_dyn(&self, count: &Value) -> QueryResult<Sequence<Value>> {
        Ok(self.take(count_argument("take", count)?))
    }

    pub fn skip_dyn(&self, count: &Value) -> QueryResult<Sequence<Value>> {
        Ok(self.skip(count_argument("skip", count)?))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use sequin_core::QueryErrorKind;

    fn values() -> Sequence<Value> {
        Sequence::from(vec![Value::from(1), Value::from("two"), Value::from(3), Value::Null])
    }

    fn add() -> Value {
        Value::function(2, |args| {
            let a = args[0].as_number().unwrap_or(0.0);
            let b = args[1].as_number().unwrap_or(0.0);
            Value::from(a + b)
        })
    }

    #[test]
    fn test_of_type() {
        let numbers = values().of_type(ValueKind::Number);
        assert_eq!(numbers.to_list(), vec![Value::from(1), Value::from(3)]);
    }

    #[test]
    fn test_where_dyn_validates_eagerly() {
        let err = values().where_dyn(&Value::from(1)).unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::Argument);
        assert_eq!(err.operation, "where");
    }

    #[test]
    fn test_where_dyn_passes_index() {
        let even_positions = Value::function(2, |args| {
            Value::from(args[1].as_number().unwrap_or(1.0) % 2.0 == 0.0)
        });
        let seq = values().where_dyn(&even_positions).unwrap();
        assert_eq!(seq.to_list(), vec![Value::from(1), Value::from(3)]);
    }

    #[test]
    fn test_select_dyn_is_lazy() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let selector = Value::function(1, move |args| {
            counter.set(counter.get() + 1);
            args[0].clone()
        });
        let seq = values().select_dyn(&selector).unwrap();
        assert_eq!(calls.get(), 0);
        assert_eq!(seq.count(), 4);
        assert_eq!(calls.get(), 4);
    }

    #[test]
    fn test_order_by_dyn() {
        let identity = Value::function(1, |args| args[0].clone());
        let seq = Sequence::from(vec![Value::from(3), Value::from(1), Value::from(2)]);
        let sorted = seq.order_by_dyn(&identity, &Value::Null).unwrap();
        let expected = vec![Value::from(1), Value::from(2), Value::from(3)];
        assert_eq!(sorted.to_list(), expected);
        assert!(seq.order_by_dyn(&identity, &Value::from(true)).is_err());
    }

    #[test]
    fn test_group_by_dyn() {
        let identity = Value::function(1, |args| args[0].clone());
        let seq = Sequence::from(vec![Value::from("A"), Value::from("A"), Value::from("B")]);
        let groups = seq.group_by_dyn(&identity, &Value::Undefined).unwrap();
        let counts: Vec<(Value, usize)> =
            groups.iter().map(|g| (g.key().clone(), g.count())).collect();
        assert_eq!(counts, vec![(Value::from("A"), 2), (Value::from("B"), 1)]);
    }

    #[test]
    fn test_aggregate_dyn() {
        let seq = Sequence::from(vec![Value::from(1), Value::from(2)]);
        assert_eq!(seq.aggregate_dyn(None, &add()), Ok(Value::from(3)));
        assert_eq!(seq.aggregate_dyn(Some(Value::from(10)), &add()), Ok(Value::from(13)));
        let err = Sequence::<Value>::empty().aggregate_dyn(None, &add()).unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::EmptySequence);
    }

    #[test]
    fn test_take_and_skip_dyn() {
        assert_eq!(values().take_dyn(&Value::from(2)).unwrap().count(), 2);
        assert_eq!(values().skip_dyn(&Value::from(3.9)).unwrap().count(), 1);
        assert_eq!(values().take_dyn(&Value::from(-1)).unwrap().count(), 0);
        let err = values().take_dyn(&Value::from("2")).unwrap_err();
        assert_eq!(err.kind, QueryErrorKind::Argument);
    }
}
