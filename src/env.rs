use std::collections::HashMap;

use serde_yaml::{Mapping, Value};

use crate::coerce;
use crate::flatten::flatten;
use crate::overrides::set_nested;

/// Build a mapping from environment variables for every key in `known`.
///
/// The variable for a dotted key is `{PREFIX}_{KEY}` with dots replaced by
/// underscores, uppercased: `server.default_port` → `BAST_SERVER_DEFAULT_PORT`.
/// Variable names are matched case-insensitively.
///
/// The lookup is driven by `known` rather than by scanning the environment,
/// because a single underscore cannot tell `SERVER_DEFAULT_PORT` apart from
/// `SERVER_DEFAULT.PORT`. Each value is conformed to the type of the value it
/// overrides, so `"9000"` becomes an integer for an integer key.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_mapping(
    prefix: &str,
    known: &Mapping,
    vars: impl IntoIterator<Item = (String, String)>,
) -> Mapping {
    let vars: HashMap<String, String> = vars
        .into_iter()
        .map(|(k, v)| (k.to_uppercase(), v))
        .collect();

    let mut mapping = Mapping::new();
    if vars.is_empty() {
        return mapping;
    }

    for (key, current) in flatten(known) {
        let Some(raw) = vars.get(&env_var_name(prefix, &key)) else {
            continue;
        };
        let value = coerce::conform(Value::String(raw.clone()), &current);
        set_nested(&mut mapping, &key, value);
    }

    mapping
}

/// The environment variable consulted for a dotted key.
pub fn env_var_name(prefix: &str, dotted_key: &str) -> String {
    format!("{prefix}_{}", dotted_key.replace('.', "_")).to_uppercase()
}
