//! Adapters from dynamic values to sequences.
//!
//! [`Sequence::from_value`] inspects a [`Value`] once and picks a cursor
//! shape for it, checked in this order:
//!
//! 1. an iterable that already is a `Sequence<Value>`: returned as-is
//! 2. any other iterable: each traversal asks it for a fresh iterator
//! 3. a string: one single-character string per UTF-16 code unit; each
//!    half of a surrogate pair comes out as U+FFFD
//! 4. an array, or a record with a non-negative integer `length`: by index
//! 5. a zero-argument function: a generator factory, called per traversal
//! 6. a function taking arguments: a generator, fed a sink function once
//! 7. any other record: its enumerable fields as `[key, value]` pairs
//! 8. null or undefined: empty
//! 9. anything else: that single value
//!
//! Building an adapter never fails and never calls into the value.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use sequin_core::{Function, Iterable, Record, Value};

use crate::cursor::{BoxCursor, Cursor};
use crate::sequence::Sequence;
use crate::source::Sink;

impl Sequence<Value> {
    /// Resolve any value into a sequence.
    pub fn from_value(value: Value) -> Sequence<Value> {
        match value {
            Value::Iterable(iterable) => from_iterable(iterable),
            Value::String(text) => Sequence::from_utf16(&text).select(code_unit_string),
            Value::Array(array) => Sequence::generate(move || {
                let array = Rc::clone(&array);
                let mut index = 0;
                move || {
                    let item = array.get(index)?;
                    index += 1;
                    Some(item)
                }
            }),
            Value::Object(record) => match record.array_length() {
                Some(_) => from_array_like(record),
                None => from_entries(record),
            },
            Value::Function(function) if function.arity() == 0 => from_factory(function),
            Value::Function(generator) => Sequence::from_generator(move |sink: &mut Sink<Value>| {
                for item in run_generator(&generator) {
                    sink.emit(item);
                }
            }),
            Value::Null | Value::Undefined => Sequence::empty(),
            single => Sequence::from(vec![single]),
        }
    }

    /// Wrap this sequence as a dynamic value.
    pub fn into_value(self) -> Value {
        Value::iterable(self)
    }
}

/// A lone surrogate has no `str` form.
fn code_unit_string(unit: &u16) -> Value {
    let c = char::from_u32(u32::from(*unit)).unwrap_or(char::REPLACEMENT_CHARACTER);
    Value::string(c.to_string())
}

impl Iterable for Sequence<Value> {
    fn iter_values(&self) -> Box<dyn Iterator<Item = Value>> {
        Box::new(self.iter())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl From<Sequence<Value>> for Value {
    fn from(sequence: Sequence<Value>) -> Value {
        sequence.into_value()
    }
}

fn from_iterable(iterable: Rc<dyn Iterable>) -> Sequence<Value> {
    if let Some(sequence) = iterable.as_any().downcast_ref::<Sequence<Value>>() {
        return sequence.clone();
    }
    Sequence::generate(move || {
        let iterable = Rc::clone(&iterable);
        let mut iter: Option<Box<dyn Iterator<Item = Value>>> = None;
        move || iter.get_or_insert_with(|| iterable.iter_values()).next()
    })
}

/// Index cursor over a record's `"0"`, `"1"`, ... fields. The length is
/// read again on every advance; missing indices yield undefined.
fn from_array_like(record: Rc<Record>) -> Sequence<Value> {
    Sequence::generate(move || {
        let record = Rc::clone(&record);
        let mut index = 0;
        move || {
            if index >= record.array_length()? {
                return None;
            }
            index += 1;
            Some(record.get_index(index - 1).unwrap_or(Value::Undefined))
        }
    })
}

/// Enumerable fields as two-element `[key, value]` arrays, snapshotted on
/// the first advance of each traversal.
fn from_entries(record: Rc<Record>) -> Sequence<Value> {
    Sequence::generate(move || {
        let record = Rc::clone(&record);
        let mut entries = None;
        move || {
            let (name, value) = entries
                .get_or_insert_with(|| record.entries().into_iter())
                .next()?;
            Some(Value::array(vec![Value::string(name.to_string()), value]))
        }
    })
}

/// A zero-argument function called once per traversal. A function result
/// is run as a generator; anything else is resolved as a value.
fn from_factory(factory: Function) -> Sequence<Value> {
    Sequence::generate(move || {
        let factory = factory.clone();
        let mut cursor: Option<BoxCursor<Value>> = None;
        move || {
            cursor
                .get_or_insert_with(|| match factory.call(&[]) {
                    Value::Function(generator) => {
                        Sequence::from(run_generator(&generator)).new_cursor()
                    }
                    other => Sequence::from_value(other).new_cursor(),
                })
                .next_value()
        }
    })
}

/// Call `generator` with a sink function and collect what it yields.
fn run_generator(generator: &Function) -> Vec<Value> {
    let buffer = Rc::new(RefCell::new(Vec::new()));
    let target = Rc::clone(&buffer);
    let sink = Value::function(1, move |args| {
        target
            .borrow_mut()
            .push(args.first().cloned().unwrap_or(Value::Undefined));
        Value::Undefined
    });
    generator.call(&[sink]);
    buffer.take()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn numbers(values: &[f64]) -> Vec<Value> {
        values.iter().map(|n| Value::from(*n)).collect()
    }

    fn collect(value: Value) -> Vec<Value> {
        Sequence::from_value(value).to_list()
    }

    #[test]
    fn test_sequence_value_is_returned_as_is() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let original = Sequence::from(numbers(&[1.0, 2.0])).select(move |v| {
            counter.set(counter.get() + 1);
            v.clone()
        });
        let round_trip = Sequence::from_value(original.clone().into_value());
        assert_eq!(round_trip.to_list(), numbers(&[1.0, 2.0]));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_string_yields_characters() {
        let chars = collect(Value::from("ab"));
        assert_eq!(chars, vec![Value::from("a"), Value::from("b")]);
        assert!(collect(Value::from("")).is_empty());
    }

    #[test]
    fn test_string_steps_by_code_unit() {
        let units = collect(Value::from("a\u{1F600}b"));
        assert_eq!(units.len(), 4);
        assert_eq!(units[1], Value::from("\u{FFFD}"));
        assert_eq!(units[3], Value::from("b"));
        assert_eq!(collect(Value::from("\u{00E9}")), vec![Value::from("\u{00E9}")]);
    }

    #[test]
    fn test_array_by_index() {
        let array = Value::array(numbers(&[1.0, 2.0, 3.0]));
        assert_eq!(collect(array), numbers(&[1.0, 2.0, 3.0]));
    }

    #[test]
    fn test_array_like_record() {
        let record = Record::new().with("length", 3).with("0", "a").with("2", "c");
        let items = collect(Value::object(record));
        assert_eq!(items, vec![Value::from("a"), Value::Undefined, Value::from("c")]);
    }

    #[test]
    fn test_plain_record_yields_pairs() {
        let record = Record::new()
            .with("x", 1)
            .with_hidden("secret", 2)
            .with("y", 3);
        let pairs = collect(Value::object(record));
        assert_eq!(pairs.len(), 2);
        let Value::Array(first) = &pairs[0] else {
            panic!("expected a pair, got {:?}", pairs[0]);
        };
        assert_eq!(first.to_vec(), vec![Value::from("x"), Value::from(1)]);
    }

    #[test]
    fn test_generator_is_single_pass() {
        let generator = Value::function(1, |args| {
            if let Some(sink) = args[0].as_function() {
                for n in 1..=3 {
                    sink.call(&[Value::from(n)]);
                }
            }
            Value::Undefined
        });
        let seq = Sequence::from_value(generator);
        assert_eq!(seq.count(), 3);
        assert_eq!(seq.count(), 0);
    }

    #[test]
    fn test_factory_is_restartable_and_lazy() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let factory = Value::function(0, move |_| {
            counter.set(counter.get() + 1);
            Value::function(1, |args| {
                if let Some(sink) = args[0].as_function() {
                    sink.call(&[Value::from("x")]);
                }
                Value::Undefined
            })
        });
        let seq = Sequence::from_value(factory);
        assert_eq!(calls.get(), 0);
        assert_eq!(seq.count(), 1);
        assert_eq!(seq.count(), 1);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_factory_returning_a_value() {
        let factory = Value::function(0, |_| Value::array(numbers(&[4.0, 5.0])));
        assert_eq!(collect(factory), numbers(&[4.0, 5.0]));
    }

    #[test]
    fn test_nullish_and_scalars() {
        assert!(collect(Value::Null).is_empty());
        assert!(collect(Value::Undefined).is_empty());
        assert_eq!(collect(Value::from(7)), vec![Value::from(7)]);
        assert_eq!(collect(Value::date(0)), vec![Value::date(0)]);
    }

    struct Countdown(i32);

    impl Iterable for Countdown {
        fn iter_values(&self) -> Box<dyn Iterator<Item = Value>> {
            Box::new((0..self.0).rev().map(Value::from))
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_external_iterable_is_restartable() {
        let seq = Sequence::from_value(Value::iterable(Countdown(3)));
        assert_eq!(seq.to_list(), numbers(&[2.0, 1.0, 0.0]));
        assert_eq!(seq.count(), 3);
    }
}
