//! Source adapters for typed sequences.
//!
//! Every adapter wraps a concrete collaborator behind the cursor protocol.
//! All of them are restartable except the ones built on a single-pass,
//! stateful producer (`from_iter_once`, `from_generator`): those are
//! exhausted after one traversal, and iterating again yields nothing.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use sequin_core::{QueryError, QueryResult};

use crate::cursor::EmptyCursor;
use crate::sequence::Sequence;

/// Receives the values a push-style generator produces.
pub struct Sink<T> {
    buffer: VecDeque<T>,
}

impl<T> Sink<T> {
    fn new() -> Self {
        Sink {
            buffer: VecDeque::new(),
        }
    }

    /// Hand one value to the consuming cursor.
    pub fn emit(&mut self, value: T) {
        self.buffer.push_back(value);
    }
}

type Generator<T> = Box<dyn FnOnce(&mut Sink<T>)>;

/// Run a generator into a fresh sink, returning what it produced
fn run_generator<T>(generator: impl FnOnce(&mut Sink<T>)) -> VecDeque<T> {
    let mut sink = Sink::new();
    generator(&mut sink);
    sink.buffer
}

impl<T: Clone + 'static> Sequence<T> {
    pub fn empty() -> Self {
        Sequence::new(|| Box::new(EmptyCursor))
    }

    /// A sequence holding `element` `count` times.
    pub fn repeat(element: T, count: i64) -> QueryResult<Self> {
        if count < 0 {
            return Err(QueryError::argument("repeat", "count must not be negative"));
        }
        Ok(Sequence::generate(move || {
            let element = element.clone();
            let mut remaining = count;
            move || {
                if remaining == 0 {
                    return None;
                }
                remaining -= 1;
                Some(element.clone())
            }
        }))
    }

    /// Restartable adapter: each traversal iterates a fresh clone of `iterable`.
    pub fn from_iterable<I>(iterable: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + 'static,
        I::IntoIter: 'static,
    {
        Sequence::generate(move || {
            let mut iter = iterable.clone().into_iter();
            move || iter.next()
        })
    }

    /// Single-pass adapter over a stateful external iterator.
    pub fn from_iter_once<I>(iter: I) -> Self
    where
        I: Iterator<Item = T> + 'static,
    {
        let shared = Rc::new(RefCell::new(iter));
        Sequence::generate(move || {
            let shared = Rc::clone(&shared);
            move || shared.borrow_mut().next()
        })
    }

    /// Single-pass adapter over a push-style generator.
    ///
    /// The generator runs to completion on the first advance of the first
    /// traversal, emitting into a sink that the cursor then drains in order.
    pub fn from_generator<G>(generator: G) -> Self
    where
        G: FnOnce(&mut Sink<T>) + 'static,
    {
        let slot: Rc<RefCell<Option<Generator<T>>>> =
            Rc::new(RefCell::new(Some(Box::new(generator))));
        Sequence::generate(move || {
            let slot = Rc::clone(&slot);
            let mut buffer: Option<VecDeque<T>> = None;
            move || {
                if buffer.is_none() {
                    let generator = slot.borrow_mut().take();
                    buffer = Some(generator.map(run_generator).unwrap_or_default());
                }
                buffer.as_mut()?.pop_front()
            }
        })
    }

    /// Restartable adapter: `factory` builds a new generator per traversal.
    pub fn from_generator_factory<F, G>(factory: F) -> Self
    where
        F: Fn() -> G + 'static,
        G: FnOnce(&mut Sink<T>) + 'static,
    {
        let factory = Rc::new(factory);
        Sequence::generate(move || {
            let factory = Rc::clone(&factory);
            let mut buffer: Option<VecDeque<T>> = None;
            move || buffer.get_or_insert_with(|| run_generator(factory())).pop_front()
        })
    }
}

impl Sequence<i64> {
    /// `count` consecutive integers starting at `start`.
    pub fn range(start: i64, count: i64) -> QueryResult<Self> {
        if count < 0 {
            return Err(QueryError::argument("range", "count must not be negative"));
        }
        if start.checked_add(count).is_none() {
            return Err(QueryError::argument("range", "range overflows i64"));
        }
        Ok(Sequence::generate(move || {
            let mut next = start;
            let end = start + count;
            move || {
                if next >= end {
                    return None;
                }
                next += 1;
                Some(next - 1)
            }
        }))
    }
}

impl Sequence<char> {
    /// The characters of `text`, one Unicode scalar value at a time
    pub fn from_chars(text: &str) -> Self {
        let text: Rc<str> = Rc::from(text);
        Sequence::generate(move || {
            let text = Rc::clone(&text);
            let mut offset = 0;
            move || {
                let c = text[offset..].chars().next()?;
                offset += c.len_utf8();
                Some(c)
            }
        })
    }
}

impl Sequence<u16> {
    /// The UTF-16 code units of `text`
    pub fn from_utf16(text: &str) -> Self {
        Sequence::from(text.encode_utf16().collect::<Vec<u16>>())
    }
}
