//! Flatten nested mappings (or any `Serialize` value) into dotted key-value pairs.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::coerce;

/// Flatten a mapping into `(dotted_key, leaf)` pairs in document order.
///
/// Nested mappings are recursed into; everything else (scalars, sequences,
/// null) is a leaf. Empty nested mappings produce no entries.
pub fn flatten(mapping: &Mapping) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into(mapping, "", &mut out);
    out
}

fn flatten_into(mapping: &Mapping, prefix: &str, out: &mut Vec<(String, Value)>) {
    for (key, value) in mapping {
        let Some(segment) = coerce::as_string(key) else {
            continue;
        };
        let dotted = if prefix.is_empty() {
            segment
        } else {
            format!("{prefix}.{segment}")
        };
        match value {
            Value::Mapping(inner) => flatten_into(inner, &dotted, out),
            leaf => out.push((dotted, leaf.clone())),
        }
    }
}

/// Flatten any `Serialize` value. `None` fields come back as `(key, None)`.
pub fn flatten_serialize<S: Serialize>(
    source: &S,
) -> Result<Vec<(String, Option<Value>)>, serde_yaml::Error> {
    let value = serde_yaml::to_value(source)?;
    let pairs = match value {
        Value::Mapping(mapping) => flatten(&mapping),
        Value::Null => Vec::new(),
        other => vec![(String::new(), other)],
    };
    Ok(pairs
        .into_iter()
        .map(|(k, v)| if v.is_null() { (k, None) } else { (k, Some(v)) })
        .collect())
}
