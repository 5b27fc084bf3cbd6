//! Dynamic property values
//!
//! `Value` is what every property slot stores. Containers nest values, and
//! model references are shared handles compared by identity.

use crate::model::ModelRef;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use std::fmt;

#[derive(Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Complex { re: f64, im: f64 },
    Bytes(Vec<u8>),
    String(String),
    Date(NaiveDate),
    Datetime(NaiveDateTime),
    TimeDelta(TimeDelta),
    List(Vec<Value>),
    /// Unordered collection without duplicates; insertion order is kept
    Set(Vec<Value>),
    /// Ordered key/value pairs with unique keys
    Dict(Vec<(Value, Value)>),
    Model(ModelRef),
}

impl Value {
    /// Build a list value
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// Build a set value, dropping duplicate members
    pub fn set<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let mut members: Vec<Value> = Vec::new();
        for item in items {
            let item = item.into();
            if !members.contains(&item) {
                members.push(item);
            }
        }
        Value::Set(members)
    }

    /// Build a dict value; a repeated key replaces the earlier entry in place
    pub fn dict<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mut pairs: Vec<(Value, Value)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();
            match pairs.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => pairs.push((key, value)),
            }
        }
        Value::Dict(pairs)
    }

    /// Decode wire JSON, reversing the typed encodings
    ///
    /// Reference tokens stay plain `{"id": ..}` dicts; use
    /// [`crate::serialize::decode`] with a lookup to resolve them.
    pub fn from_json(json: &serde_json::Value) -> Self {
        crate::serialize::decode(json, None)
    }

    /// Short type label used in validation messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Complex { .. } => "complex",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "str",
            Value::Date(_) => "date",
            Value::Datetime(_) => "datetime",
            Value::TimeDelta(_) => "timedelta",
            Value::List(_) => "list",
            Value::Set(_) => "set",
            Value::Dict(_) => "dict",
            Value::Model(_) => "model",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view of ints and floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Items of a list or members of a set
    pub fn as_items(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Set(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Dict(pairs) => Some(pairs),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&ModelRef> {
        match self {
            Value::Model(model) => Some(model),
            _ => None,
        }
    }

    /// Look up a string key in a dict value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_dict()?
            .iter()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Number of items for containers and characters for strings
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Bytes(b) => Some(b.len()),
            Value::List(items) | Value::Set(items) => Some(items.len()),
            Value::Dict(pairs) => Some(pairs.len()),
            _ => None,
        }
    }

    /// Whether the value can be expressed as plain JSON without typed encodings
    pub fn is_json_compatible(&self) -> bool {
        match self {
            Value::Null | Value::Bool(_) | Value::Int(_) | Value::String(_) => true,
            Value::Float(f) => f.is_finite(),
            Value::List(items) => items.iter().all(Value::is_json_compatible),
            Value::Dict(pairs) => pairs
                .iter()
                .all(|(k, v)| matches!(k, Value::String(_)) && v.is_json_compatible()),
            _ => false,
        }
    }

    /// Append every model referenced anywhere inside this value
    pub fn collect_models(&self, out: &mut Vec<ModelRef>) {
        match self {
            Value::Model(model) => out.push(model.clone()),
            Value::List(items) | Value::Set(items) => {
                for item in items {
                    item.collect_models(out);
                }
            }
            Value::Dict(pairs) => {
                for (key, value) in pairs {
                    key.collect_models(out);
                    value.collect_models(out);
                }
            }
            _ => {}
        }
    }
}

fn float_eq(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_eq(*a, *b),
            (Value::Complex { re: ar, im: ai }, Value::Complex { re: br, im: bi }) => {
                float_eq(*ar, *br) && float_eq(*ai, *bi)
            }
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Datetime(a), Value::Datetime(b)) => a == b,
            (Value::TimeDelta(a), Value::TimeDelta(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|member| b.contains(member))
            }
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.iter().any(|(bk, bv)| bk == k && bv == v))
            }
            (Value::Model(a), Value::Model(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", item)?;
            }
            Ok(())
        }

        match self {
            Value::Null => write!(f, "None"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) if x.is_nan() => write!(f, "nan"),
            Value::Float(x) if x.is_infinite() => {
                write!(f, "{}", if *x > 0.0 { "inf" } else { "-inf" })
            }
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Complex { re, im } => {
                let sign = if *im < 0.0 { '-' } else { '+' };
                write!(f, "({}{}{}j)", re, sign, im.abs())
            }
            Value::Bytes(bytes) => write!(f, "b\"{}\"", bytes.escape_ascii()),
            Value::String(s) => write!(f, "{:?}", s),
            Value::Date(d) => write!(f, "{}", d),
            Value::Datetime(dt) => write!(f, "{}", dt),
            Value::TimeDelta(td) => write!(f, "{}", td),
            Value::List(items) => {
                write!(f, "[")?;
                join(f, items)?;
                write!(f, "]")
            }
            Value::Set(items) if items.is_empty() => write!(f, "set()"),
            Value::Set(items) => {
                write!(f, "{{")?;
                join(f, items)?;
                write!(f, "}}")
            }
            Value::Dict(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Model(model) => write!(f, "{}", model),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({})", self)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u8> for Value {
    fn from(i: u8) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::Datetime(dt)
    }
}

impl From<TimeDelta> for Value {
    fn from(td: TimeDelta) -> Self {
        Value::TimeDelta(td)
    }
}

impl From<ModelRef> for Value {
    fn from(model: ModelRef) -> Self {
        Value::Model(model)
    }
}

impl From<&ModelRef> for Value {
    fn from(model: &ModelRef) -> Self {
        Value::Model(model.clone())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::List(vec![a.into(), b.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::List(vec![a.into(), b.into(), c.into()])
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>, D: Into<Value>> From<(A, B, C, D)>
    for Value
{
    fn from((a, b, c, d): (A, B, C, D)) -> Self {
        Value::List(vec![a.into(), b.into(), c.into(), d.into()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_equals_nan() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(f64::NAN));
    }

    #[test]
    fn test_int_and_float_are_distinct() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
    }

    #[test]
    fn test_set_ignores_order_and_duplicates() {
        let a = Value::set([1, 2, 2, 3]);
        let b = Value::set([3, 1, 2]);
        assert_eq!(a.len(), Some(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_dict_repeated_key_replaces_in_place() {
        let d = Value::dict([("a", 1), ("b", 2), ("a", 3)]);
        assert_eq!(d.get("a"), Some(&Value::Int(3)));
        assert_eq!(d.as_dict().map(<[_]>::len), Some(2));
    }

    #[test]
    fn test_display_repr() {
        assert_eq!(Value::from("a").to_string(), "\"a\"");
        assert_eq!(Value::from((1, 2)).to_string(), "[1, 2]");
        assert_eq!(Value::Float(1.5).to_string(), "1.5");
        assert_eq!(Value::Null.to_string(), "None");
        assert_eq!(
            Value::Complex { re: 1.0, im: -2.0 }.to_string(),
            "(1-2j)"
        );
    }

    #[test]
    fn test_json_compatibility() {
        assert!(Value::dict([("a", Value::list([1, 2]))]).is_json_compatible());
        assert!(!Value::Float(f64::INFINITY).is_json_compatible());
        assert!(!Value::dict([(1, 2)]).is_json_compatible());
        assert!(!Value::Bytes(vec![1]).is_json_compatible());
    }
}
