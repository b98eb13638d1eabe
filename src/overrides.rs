//! Dotted keys and the nested mappings they address.
//!
//! `("server.default_port", 3000)` is expanded into `{server: {default_port: 3000}}`
//! so it can be deep-merged with the other layers. Keys are case-insensitive:
//! every segment is lowercased on the way in.

use serde_yaml::{Mapping, Value};

use crate::coerce;

/// Convert dotted-key overrides into a nested mapping.
///
/// If multiple entries target the same key, the last one wins.
pub fn overrides_to_mapping(entries: &[(String, Value)]) -> Mapping {
    let mut mapping = Mapping::new();
    for (dotted_key, value) in entries {
        set_nested(&mut mapping, dotted_key, value.clone());
    }
    mapping
}

/// Insert `value` at `dotted_key`, creating intermediate mappings as needed.
///
/// An intermediate key that currently holds a scalar is replaced by a mapping.
pub fn set_nested(mapping: &mut Mapping, dotted_key: &str, value: Value) {
    let key = normalize_key(dotted_key);
    let segments: Vec<&str> = key.split('.').collect();
    let (leaf, parents) = match segments.split_last() {
        Some(split) => split,
        None => return,
    };

    let mut current = mapping;
    for segment in parents {
        if !matches!(current.get(*segment), Some(Value::Mapping(_))) {
            current.insert(Value::String(segment.to_string()), Value::Mapping(Mapping::new()));
        }
        let Some(Value::Mapping(next)) = current.get_mut(*segment) else {
            return;
        };
        current = next;
    }

    current.insert(Value::String(leaf.to_string()), value);
}

/// Navigate a mapping by dotted key path (e.g. `"server.default_port"`).
pub fn get_nested<'a>(mapping: &'a Mapping, dotted_key: &str) -> Option<&'a Value> {
    let key = normalize_key(dotted_key);
    let (path, leaf) = match key.rsplit_once('.') {
        Some((p, l)) => (Some(p), l),
        None => (None, key.as_str()),
    };

    let map = match path {
        Some(path) => {
            let mut current = mapping;
            for segment in path.split('.') {
                current = current.get(segment)?.as_mapping()?;
            }
            current
        }
        None => mapping,
    };

    map.get(leaf)
}

/// Lowercase every string key, recursively.
pub fn normalize_keys(mapping: Mapping) -> Mapping {
    mapping
        .into_iter()
        .map(|(key, value)| {
            let key = match key {
                Value::String(s) => Value::String(s.to_lowercase()),
                other => other,
            };
            let value = match value {
                Value::Mapping(inner) => Value::Mapping(normalize_keys(inner)),
                other => other,
            };
            (key, value)
        })
        .collect()
}

pub fn normalize_key(dotted_key: &str) -> String {
    dotted_key.trim().to_lowercase()
}

/// Parse a raw string value into a typed YAML scalar.
/// Tries: integer → bool (`t`, `F`, `true`, any case) → float → string.
pub fn parse_scalar(s: &str) -> Value {
    if let Ok(i) = s.parse::<i64>() {
        return Value::Number(i.into());
    }
    if let Some(b) = coerce::parse_bool(s) {
        return Value::Bool(b);
    }
    // Only use float if the string actually contains a dot,
    // to avoid "NaN" / "inf" being parsed as float.
    if s.contains('.')
        && let Ok(f) = s.parse::<f64>()
    {
        return Value::Number(f.into());
    }
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn flat_key() {
        let mapping = overrides_to_mapping(&entries(&[("host", "0.0.0.0".into())]));
        assert_eq!(mapping["host"].as_str().unwrap(), "0.0.0.0");
    }

    #[test]
    fn nested_key() {
        let mapping = overrides_to_mapping(&entries(&[("app.name", "x".into())]));
        let app = mapping["app"].as_mapping().unwrap();
        assert_eq!(app["name"].as_str().unwrap(), "x");
    }

    #[test]
    fn deep_nesting() {
        let mapping = overrides_to_mapping(&entries(&[("a.b.c.d", 42.into())]));
        assert_eq!(mapping["a"]["b"]["c"]["d"].as_i64().unwrap(), 42);
    }

    #[test]
    fn keys_are_lowercased() {
        let mapping = overrides_to_mapping(&entries(&[("Server.Default_Port", 1.into())]));
        assert_eq!(mapping["server"]["default_port"].as_i64().unwrap(), 1);
    }

    #[test]
    fn last_entry_wins_for_same_key() {
        let mapping = overrides_to_mapping(&entries(&[
            ("server.default_port", 3000.into()),
            ("server.default_port", 5000.into()),
        ]));
        assert_eq!(mapping["server"]["default_port"].as_i64().unwrap(), 5000);
    }

    #[test]
    fn scalar_parent_is_replaced() {
        let mut mapping = overrides_to_mapping(&entries(&[("server", "flat".into())]));
        set_nested(&mut mapping, "server.timeout", 5.into());
        assert_eq!(mapping["server"]["timeout"].as_i64().unwrap(), 5);
    }

    #[test]
    fn empty_list_empty_mapping() {
        assert!(overrides_to_mapping(&[]).is_empty());
    }

    #[test]
    fn get_nested_finds_leaf_and_section() {
        let mapping: Mapping = serde_yaml::from_str("server:\n  default_port: 8080\n").unwrap();
        assert_eq!(
            get_nested(&mapping, "SERVER.default_port").unwrap().as_i64(),
            Some(8080)
        );
        assert!(get_nested(&mapping, "server").unwrap().is_mapping());
        assert!(get_nested(&mapping, "server.nope").is_none());
        assert!(get_nested(&mapping, "nope.deeper").is_none());
    }

    #[test]
    fn normalize_keys_recurses() {
        let mapping: Mapping = serde_yaml::from_str("App:\n  NAME: x\n").unwrap();
        let normalized = normalize_keys(mapping);
        assert_eq!(normalized["app"]["name"].as_str().unwrap(), "x");
    }

    #[test]
    fn parse_scalar_types() {
        assert_eq!(parse_scalar("TRUE"), Value::Bool(true));
        assert_eq!(parse_scalar("3000").as_i64(), Some(3000));
        assert_eq!(parse_scalar("-5").as_i64(), Some(-5));
        assert_eq!(parse_scalar("1.5").as_f64(), Some(1.5));
        assert_eq!(parse_scalar("debug").as_str(), Some("debug"));
        assert_eq!(parse_scalar("inf").as_str(), Some("inf"));
    }

    #[test]
    fn parse_scalar_short_bools_and_int_first() {
        assert_eq!(parse_scalar("t"), Value::Bool(true));
        assert_eq!(parse_scalar("F"), Value::Bool(false));
        assert_eq!(parse_scalar("False"), Value::Bool(false));
        assert_eq!(parse_scalar("1").as_i64(), Some(1));
        assert_eq!(parse_scalar("0").as_i64(), Some(0));
        assert_eq!(parse_scalar("yes").as_str(), Some("yes"));
    }
}
