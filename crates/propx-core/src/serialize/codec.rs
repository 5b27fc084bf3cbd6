//! Wire encoding of values
//!
//! Values JSON cannot express directly use typed objects:
//!
//! | value | encoding |
//! |---|---|
//! | non-finite float | `{"type": "number", "value": "nan" \| "+inf" \| "-inf"}` |
//! | bytes | `{"type": "bytes", "data": <base64>}` |
//! | set | `{"type": "set", "entries": [..]}` |
//! | dict with non-string keys | `{"type": "map", "entries": [[k, v], ..]}` |
//! | complex | `{"type": "complex", "real": .., "imag": ..}` |
//!
//! Dates are ISO strings; datetimes and time deltas are milliseconds. Those
//! carry no tag and decode as plain strings and numbers, which the temporal
//! property kinds accept and turn back into native values.

use super::ReferenceResolver;
use crate::model::ModelRef;
use crate::property::temporal;
use crate::value::Value;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Map, Number, Value as JsonValue};

fn encode_float(x: f64) -> JsonValue {
    if x.is_nan() {
        json!({"type": "number", "value": "nan"})
    } else if x.is_infinite() {
        let value = if x > 0.0 { "+inf" } else { "-inf" };
        json!({"type": "number", "value": value})
    } else {
        Number::from_f64(x).map_or(JsonValue::Null, JsonValue::Number)
    }
}

/// Encode a value, turning model references into resolver tokens
pub fn encode(value: &Value, resolver: &mut dyn ReferenceResolver) -> JsonValue {
    match value {
        Value::Null => JsonValue::Null,
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Int(i) => JsonValue::from(*i),
        Value::Float(x) => encode_float(*x),
        Value::Complex { re, im } => json!({
            "type": "complex",
            "real": encode_float(*re),
            "imag": encode_float(*im),
        }),
        Value::Bytes(bytes) => json!({"type": "bytes", "data": STANDARD.encode(bytes)}),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Date(d) => JsonValue::String(temporal::date_to_wire(d)),
        Value::Datetime(dt) => encode_float(temporal::datetime_to_ms(dt)),
        Value::TimeDelta(td) => encode_float(temporal::timedelta_to_ms(td)),
        Value::List(items) => JsonValue::Array(items.iter().map(|v| encode(v, resolver)).collect()),
        Value::Set(items) => json!({
            "type": "set",
            "entries": items.iter().map(|v| encode(v, resolver)).collect::<Vec<_>>(),
        }),
        Value::Dict(pairs) => {
            if pairs.iter().all(|(k, _)| k.as_str().is_some()) {
                let mut map = Map::new();
                for (k, v) in pairs {
                    if let Some(key) = k.as_str() {
                        map.insert(key.to_string(), encode(v, resolver));
                    }
                }
                JsonValue::Object(map)
            } else {
                let entries: Vec<JsonValue> = pairs
                    .iter()
                    .map(|(k, v)| JsonValue::Array(vec![encode(k, resolver), encode(v, resolver)]))
                    .collect();
                json!({"type": "map", "entries": entries})
            }
        }
        Value::Model(model) => resolver.reference(model),
    }
}

/// Decode JSON, reversing the typed encodings
///
/// `lookup` resolves `{"id": ..}` reference tokens back to models; without
/// it, or when it finds nothing, the token stays a dict.
pub fn decode(json: &JsonValue, lookup: Option<&dyn Fn(&str) -> Option<ModelRef>>) -> Value {
    match json {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Array(items) => Value::List(items.iter().map(|j| decode(j, lookup)).collect()),
        JsonValue::Object(map) => decode_object(map, lookup),
    }
}

fn decode_object(map: &Map<String, JsonValue>, lookup: Option<&dyn Fn(&str) -> Option<ModelRef>>) -> Value {
    let decoded = match map.get("type").and_then(JsonValue::as_str) {
        Some("number") => match map.get("value").and_then(JsonValue::as_str) {
            Some("nan") => Some(Value::Float(f64::NAN)),
            Some("+inf") => Some(Value::Float(f64::INFINITY)),
            Some("-inf") => Some(Value::Float(f64::NEG_INFINITY)),
            _ => None,
        },
        Some("bytes") => map
            .get("data")
            .and_then(JsonValue::as_str)
            .and_then(|data| STANDARD.decode(data).ok())
            .map(Value::Bytes),
        Some("set") => map
            .get("entries")
            .and_then(JsonValue::as_array)
            .map(|entries| Value::set(entries.iter().map(|j| decode(j, lookup)))),
        Some("map") => map.get("entries").and_then(JsonValue::as_array).and_then(|entries| {
            entries
                .iter()
                .map(|entry| match entry.as_array().map(Vec::as_slice) {
                    Some([k, v]) => Some((decode(k, lookup), decode(v, lookup))),
                    _ => None,
                })
                .collect::<Option<Vec<_>>>()
                .map(Value::dict)
        }),
        Some("complex") => {
            let part = |key: &str| map.get(key).and_then(|j| decode(j, lookup).as_f64());
            match (part("real"), part("imag")) {
                (Some(re), Some(im)) => Some(Value::Complex { re, im }),
                _ => None,
            }
        }
        _ => None,
    };
    if let Some(value) = decoded {
        return value;
    }

    if let (Some(lookup), 1, Some(id)) = (lookup, map.len(), map.get("id").and_then(JsonValue::as_str)) {
        if let Some(model) = lookup(id) {
            return Value::Model(model);
        }
    }

    Value::Dict(
        map.iter()
            .map(|(k, v)| (Value::String(k.clone()), decode(v, lookup)))
            .collect(),
    )
}

impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        decode(&json, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoModels;

    impl ReferenceResolver for NoModels {
        fn reference(&mut self, model: &ModelRef) -> JsonValue {
            json!({"id": model.id()})
        }
    }

    fn roundtrip(value: Value) -> Value {
        Value::from_json(&encode(&value, &mut NoModels))
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(
            encode(&Value::Float(f64::NEG_INFINITY), &mut NoModels),
            json!({"type": "number", "value": "-inf"})
        );
        assert_eq!(roundtrip(Value::Float(f64::NAN)), Value::Float(f64::NAN));
    }

    #[test]
    fn test_typed_containers() {
        assert_eq!(roundtrip(Value::Bytes(vec![0, 1, 254])), Value::Bytes(vec![0, 1, 254]));
        assert_eq!(roundtrip(Value::set([1, 2])), Value::set([2, 1]));
        let map = Value::dict([(1, "a"), (2, "b")]);
        assert_eq!(
            encode(&map, &mut NoModels),
            json!({"type": "map", "entries": [[1, "a"], [2, "b"]]})
        );
        assert_eq!(roundtrip(map.clone()), map);
    }

    #[test]
    fn test_complex() {
        let c = Value::Complex { re: 1.5, im: -2.0 };
        assert_eq!(
            encode(&c, &mut NoModels),
            json!({"type": "complex", "real": 1.5, "imag": -2.0})
        );
        assert_eq!(roundtrip(c.clone()), c);
    }

    #[test]
    fn test_string_keyed_dict_is_plain_object() {
        let d = Value::dict([("b", 1), ("a", 2)]);
        let encoded = encode(&d, &mut NoModels);
        assert_eq!(encoded.to_string(), r#"{"b":1,"a":2}"#);
        assert_eq!(roundtrip(d.clone()), d);
    }

    #[test]
    fn test_dates() {
        let d = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(encode(&Value::Date(d), &mut NoModels), json!("2024-03-01"));
        let dt = d.and_hms_opt(0, 0, 1).unwrap();
        let ms = encode(&Value::Datetime(dt), &mut NoModels).as_f64().unwrap();
        assert_eq!(ms, 1_709_251_201_000.0);
        let td = chrono::TimeDelta::milliseconds(1500);
        assert_eq!(encode(&Value::TimeDelta(td), &mut NoModels), json!(1500.0));
    }
}
