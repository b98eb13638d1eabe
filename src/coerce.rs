//! Weakly-typed scalar conversions.
//!
//! Values reach the merged view from YAML files, environment variables and
//! `set` calls, so a field declared as an integer may arrive as the string
//! `"9000"`. These helpers convert between strings, integers and booleans the
//! way a user would expect, and [`conform`] reshapes a value to match the type
//! already present at the same key.

use serde_yaml::{Mapping, Value};

/// Interpret a value as a string. Mappings, sequences and null have no string form.
pub fn as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => as_string(&tagged.value),
        _ => None,
    }
}

/// Interpret a value as an integer. Floats truncate; booleans map to 1/0.
pub fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f as i64))
        }
        Value::Bool(b) => Some(i64::from(*b)),
        Value::Tagged(tagged) => as_int(&tagged.value),
        _ => None,
    }
}

/// Interpret a value as a boolean. Numbers are true when non-zero.
pub fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => parse_bool(s),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::Tagged(tagged) => as_bool(&tagged.value),
        _ => None,
    }
}

/// Accepts `1/0`, `t/f` and `true/false` in any case.
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "t" | "true" => Some(true),
        "0" | "f" | "false" => Some(false),
        _ => None,
    }
}

/// Reshape `value` so its scalar types match `shape`.
///
/// Mappings are walked key by key. A scalar leaf is converted only when the
/// conversion succeeds; otherwise it is returned unchanged and the typed decode
/// reports the mismatch. Keys missing from `shape` pass through untouched.
pub fn conform(value: Value, shape: &Value) -> Value {
    match (value, shape) {
        (Value::Mapping(map), Value::Mapping(shape_map)) => {
            Value::Mapping(conform_mapping(map, shape_map))
        }
        (v @ (Value::Number(_) | Value::Bool(_)), Value::String(_)) => match as_string(&v) {
            Some(s) => Value::String(s),
            None => v,
        },
        (v @ (Value::String(_) | Value::Bool(_)), Value::Number(n)) if !n.is_f64() => {
            match as_int(&v) {
                Some(i) => Value::Number(i.into()),
                None => v,
            }
        }
        (Value::String(s), Value::Number(_)) => match s.trim().parse::<f64>() {
            Ok(f) => Value::Number(f.into()),
            Err(_) => Value::String(s),
        },
        (v @ (Value::String(_) | Value::Number(_)), Value::Bool(_)) => match as_bool(&v) {
            Some(b) => Value::Bool(b),
            None => v,
        },
        (v, _) => v,
    }
}

/// [`conform`] over every entry of a mapping.
pub fn conform_mapping(map: Mapping, shape: &Mapping) -> Mapping {
    map.into_iter()
        .map(|(key, value)| {
            let value = match key.as_str().and_then(|k| shape.get(k)) {
                Some(s) => conform(value, s),
                None => value,
            };
            (key, value)
        })
        .collect()
}
