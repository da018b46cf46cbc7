use std::any::Any;
use std::cell::{Ref, RefCell};
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::unsync::OnceCell;
use rustc_hash::FxHashSet;

use crate::interner::FieldName;
use crate::numeric::{Numeric, format_number, is_integral};

// ============================================================================
// Core Value Model
// ============================================================================

/// A point in time, stored as milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    millis: i64,
}

impl Date {
    pub fn from_millis(millis: i64) -> Self {
        Date { millis }
    }

    /// The current instant; falls back to the epoch if the clock is before it
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
            .unwrap_or(0);
        Date { millis }
    }

    pub fn millis(&self) -> i64 {
        self.millis
    }
}

/// Native function body: receives its arguments as a slice
pub type NativeFn = dyn Fn(&[Value]) -> Value;

/// A callable value with a declared arity.
///
/// The arity plays the role of a function's parameter count: the sequence
/// adapters use it to tell a generator factory (arity 0) from a generator
/// that expects a sink (arity 1 or more).
#[derive(Clone)]
pub struct Function {
    arity: usize,
    body: Rc<NativeFn>,
}

impl Function {
    pub fn new(arity: usize, body: impl Fn(&[Value]) -> Value + 'static) -> Self {
        Function {
            arity,
            body: Rc::new(body),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.body)(args)
    }

    /// Identity comparison: true only for clones of the same function
    pub fn ptr_eq(&self, other: &Function) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.body), Rc::as_ptr(&other.body))
    }

    pub(crate) fn address(&self) -> usize {
        Rc::as_ptr(&self.body) as *const () as usize
    }
}

/// A mutable array. Arrays are reference values: clones share storage.
pub struct ArrayValue {
    items: RefCell<Vec<Value>>,
    hash_tag: OnceCell<i32>,
}

impl ArrayValue {
    pub fn new(items: Vec<Value>) -> Self {
        ArrayValue {
            items: RefCell::new(items),
            hash_tag: OnceCell::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    pub fn push(&self, value: Value) {
        self.items.borrow_mut().push(value);
    }

    /// Store `value` at `index`, padding with `Undefined` when past the end
    pub fn set(&self, index: usize, value: Value) {
        let mut items = self.items.borrow_mut();
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value;
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    pub(crate) fn items(&self) -> Ref<'_, Vec<Value>> {
        self.items.borrow()
    }

    pub(crate) fn hash_tag(&self) -> &OnceCell<i32> {
        &self.hash_tag
    }
}

/// One named slot of a record
#[derive(Clone, Debug)]
pub struct Field {
    pub name: FieldName,
    pub value: Value,
    /// Hidden fields take no part in hashing or key/value iteration
    pub enumerable: bool,
}

/// A plain structured value: named fields, no behavior.
#[derive(Default)]
pub struct Record {
    fields: RefCell<Vec<Field>>,
    hash_tag: OnceCell<i32>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    /// Builder form of [`Record::set`]
    pub fn with(self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder form of [`Record::define_hidden`]
    pub fn with_hidden(self, name: &str, value: impl Into<Value>) -> Self {
        self.define_hidden(name, value);
        self
    }

    /// Set a field, keeping its enumerability when it already exists
    pub fn set(&self, name: &str, value: impl Into<Value>) {
        self.put(FieldName::new(name), value.into(), true);
    }

    /// Define a non-enumerable field
    pub fn define_hidden(&self, name: &str, value: impl Into<Value>) {
        let name = FieldName::new(name);
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.value = value.into();
                field.enumerable = false;
            }
            None => fields.push(Field {
                name,
                value: value.into(),
                enumerable: false,
            }),
        }
    }

    fn put(&self, name: FieldName, value: Value, enumerable: bool) {
        let mut fields = self.fields.borrow_mut();
        match fields.iter_mut().find(|f| f.name == name) {
            Some(field) => field.value = value,
            None => fields.push(Field {
                name,
                value,
                enumerable,
            }),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.get_field(FieldName::existing(name)?)
    }

    /// Element `index` of an array-like record
    pub fn get_index(&self, index: usize) -> Option<Value> {
        self.get_field(FieldName::existing_index(index)?)
    }

    pub fn get_field(&self, name: FieldName) -> Option<Value> {
        self.fields
            .borrow()
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.clone())
    }

    /// Number of enumerable fields
    pub fn len(&self) -> usize {
        self.fields.borrow().iter().filter(|f| f.enumerable).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Enumerable fields in definition order
    pub fn entries(&self) -> Vec<(FieldName, Value)> {
        self.fields
            .borrow()
            .iter()
            .filter(|f| f.enumerable)
            .map(|f| (f.name, f.value.clone()))
            .collect()
    }

    /// The `length` field, when it holds a non-negative integer
    pub fn array_length(&self) -> Option<usize> {
        match self.get_field(FieldName::length())? {
            Value::Number(n) if is_integral(n) && n >= 0.0 => usize::try_from(n as i64).ok(),
            _ => None,
        }
    }

    pub(crate) fn hash_tag(&self) -> &OnceCell<i32> {
        &self.hash_tag
    }
}

/// Override hooks a class instance may expose.
///
/// Every hook is optional: returning `None` falls back to the default
/// identity rules (reference identity for equality and hashing, numeric or
/// string conversion for ordering). A hook's answer is trusted verbatim.
pub trait ObjectHooks {
    fn type_name(&self) -> &str;

    fn hash_code(&self) -> Option<i32> {
        None
    }

    fn equals(&self, _other: &Value) -> Option<bool> {
        None
    }

    fn compare_to(&self, _other: &Value) -> Option<Ordering> {
        None
    }

    /// Numeric conversion used when ordering against other values
    fn value_of(&self) -> Option<f64> {
        None
    }

    /// String conversion used when ordering falls back to text
    fn to_display(&self) -> Option<String> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// A class instance: an object with optional identity hooks
pub struct Instance {
    object: Box<dyn ObjectHooks>,
}

impl Instance {
    pub fn hooks(&self) -> &dyn ObjectHooks {
        self.object.as_ref()
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.object.as_any().downcast_ref::<T>()
    }
}

/// An external iterable: anything that can hand out a fresh iterator.
pub trait Iterable {
    fn iter_values(&self) -> Box<dyn Iterator<Item = Value>>;

    fn as_any(&self) -> &dyn Any;
}

/// Kinds of [`Value`], used for filtering by type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Bool,
    Number,
    String,
    Date,
    Array,
    Object,
    Instance,
    Function,
    Iterable,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Undefined => "undefined",
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Date => "date",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
            ValueKind::Instance => "instance",
            ValueKind::Function => "function",
            ValueKind::Iterable => "iterable",
        };
        f.write_str(name)
    }
}

/// A dynamically typed value.
#[derive(Clone, Default)]
pub enum Value {
    /// Absence of a value
    Undefined,
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(Rc<str>),
    Date(Date),
    Array(Rc<ArrayValue>),
    /// Plain record literal
    Object(Rc<Record>),
    /// Class instance with optional override hooks
    Instance(Rc<Instance>),
    Function(Function),
    Iterable(Rc<dyn Iterable>),
}

impl Value {
    pub fn string(s: impl AsRef<str>) -> Value {
        Value::String(Rc::from(s.as_ref()))
    }

    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(ArrayValue::new(items)))
    }

    pub fn object(record: Record) -> Value {
        Value::Object(Rc::new(record))
    }

    pub fn instance(object: impl ObjectHooks + 'static) -> Value {
        Value::Instance(Rc::new(Instance {
            object: Box::new(object),
        }))
    }

    pub fn function(arity: usize, body: impl Fn(&[Value]) -> Value + 'static) -> Value {
        Value::Function(Function::new(arity, body))
    }

    pub fn date(millis: i64) -> Value {
        Value::Date(Date::from_millis(millis))
    }

    pub fn iterable(source: impl Iterable + 'static) -> Value {
        Value::Iterable(Rc::new(source))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Undefined => ValueKind::Undefined,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Date(_) => ValueKind::Date,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
            Value::Instance(_) => ValueKind::Instance,
            Value::Function(_) => ValueKind::Function,
            Value::Iterable(_) => ValueKind::Iterable,
        }
    }

    /// True for `Null` and `Undefined`
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Null | Value::Undefined)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Numeric conversion used by ordering: numbers, booleans, dates and
    /// instances that expose `value_of`
    pub fn numeric_value(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Date(d) => Some(d.millis() as f64),
            Value::Instance(i) => i.hooks().value_of(),
            _ => None,
        }
    }
}

impl Numeric for Value {
    fn to_number(&self) -> Option<f64> {
        self.as_number()
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Number(n as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Rc::from(s))
    }
}

impl From<Rc<str>> for Value {
    fn from(s: Rc<str>) -> Self {
        Value::String(s)
    }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self {
        Value::Date(d)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::object(record)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::array(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::array(iter.into_iter().collect())
    }
}

// ============================================================================
// Display Implementation (string conversion)
// ============================================================================

fn write_display(
    value: &Value,
    f: &mut fmt::Formatter<'_>,
    visiting: &mut FxHashSet<usize>,
) -> fmt::Result {
    match value {
        Value::Undefined => f.write_str("undefined"),
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Number(n) => f.write_str(&format_number(*n)),
        Value::String(s) => f.write_str(s),
        Value::Date(d) => write!(f, "Date({})", d.millis()),
        Value::Array(array) => {
            // Cyclic arrays render the inner reference as empty text
            let addr = Rc::as_ptr(array) as usize;
            if !visiting.insert(addr) {
                return Ok(());
            }
            for (i, item) in array.items().iter().enumerate() {
                if i > 0 {
                    f.write_str(",")?;
                }
                if !item.is_nullish() {
                    write_display(item, f, visiting)?;
                }
            }
            visiting.remove(&addr);
            Ok(())
        }
        Value::Object(_) => f.write_str("[object Object]"),
        Value::Instance(instance) => match instance.hooks().to_display() {
            Some(text) => f.write_str(&text),
            None => write!(f, "[object {}]", instance.hooks().type_name()),
        },
        Value::Function(_) => f.write_str("function"),
        Value::Iterable(_) => f.write_str("[object Iterable]"),
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_display(self, f, &mut FxHashSet::default())
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("Undefined"),
            Value::Null => f.write_str("Null"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Number(n) => f.debug_tuple("Number").field(n).finish(),
            Value::String(s) => f.debug_tuple("String").field(&&**s).finish(),
            Value::Date(d) => f.debug_tuple("Date").field(&d.millis()).finish(),
            Value::Array(_) => write!(f, "Array[{self}]"),
            Value::Object(record) => {
                let mut map = f.debug_map();
                for (name, value) in record.entries() {
                    map.entry(&name.resolve(), &format_args!("{value}"));
                }
                map.finish()
            }
            Value::Instance(instance) => write!(f, "Instance<{}>", instance.hooks().type_name()),
            Value::Function(func) => write!(f, "Function/{}", func.arity()),
            Value::Iterable(_) => f.write_str("Iterable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_fields() {
        let record = Record::new().with("a", 1).with("b", "two").with_hidden("secret", true);
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("a").and_then(|v| v.as_number()), Some(1.0));
        assert_eq!(record.get("secret").and_then(|v| v.as_bool()), Some(true));
        let names: Vec<String> = record.entries().iter().map(|(n, _)| n.resolve()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_record_set_keeps_hidden_flag() {
        let record = Record::new().with_hidden("h", 1);
        record.set("h", 2);
        assert_eq!(record.len(), 0);
        assert_eq!(record.get("h").and_then(|v| v.as_number()), Some(2.0));
    }

    #[test]
    fn test_array_length_requires_integer() {
        assert_eq!(Record::new().with("length", 3).array_length(), Some(3));
        assert_eq!(Record::new().with("length", 2.5).array_length(), None);
        assert_eq!(Record::new().with("length", -1).array_length(), None);
        assert_eq!(Record::new().with("length", "3").array_length(), None);
    }

    #[test]
    fn test_array_set_pads_with_undefined() {
        let array = ArrayValue::new(vec![]);
        array.set(2, Value::from(9));
        assert_eq!(array.len(), 3);
        assert!(matches!(array.get(0), Some(Value::Undefined)));
    }

    #[test]
    fn test_display_string_conversion() {
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::from("hi").to_string(), "hi");
        let array = Value::array(vec![Value::from(1), Value::Null, Value::from("x")]);
        assert_eq!(array.to_string(), "1,,x");
        assert_eq!(Value::object(Record::new()).to_string(), "[object Object]");
    }

    #[test]
    fn test_display_cyclic_array_terminates() {
        let array = Rc::new(ArrayValue::new(vec![Value::from(1)]));
        array.push(Value::Array(Rc::clone(&array)));
        assert_eq!(Value::Array(array).to_string(), "1,");
    }

    #[test]
    fn test_truthiness() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::from(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::array(vec![]).is_truthy());
    }

    #[test]
    fn test_kind_and_option_conversion() {
        assert_eq!(Value::from(None::<i32>).kind(), ValueKind::Null);
        assert_eq!(Value::from(Some(2)).kind(), ValueKind::Number);
        assert_eq!(Value::date(5).kind(), ValueKind::Date);
        assert_eq!(ValueKind::Bool.to_string(), "boolean");
    }

    #[test]
    fn test_function_call_and_identity() {
        let double = Function::new(1, |args| {
            Value::from(args[0].as_number().unwrap_or(0.0) * 2.0)
        });
        assert_eq!(double.call(&[Value::from(4)]).as_number(), Some(8.0));
        let same = double.clone();
        assert!(double.ptr_eq(&same));
        let other = Function::new(1, |_| Value::Null);
        assert!(!double.ptr_eq(&other));
    }
}
