//! Core resolution pipeline: layer the sources and produce a typed snapshot.
//!
//! Operates on pre-loaded data (`ResolveInput`) with no I/O, making the full
//! pipeline testable with synthetic inputs. Steps:
//!
//! 1. Start from the default table
//! 2. Parse the config file (if any) and lowercase its keys
//! 3. Build the env layer for every key known so far
//! 4. Put explicit overrides on top (highest priority)
//! 5. Conform the merged view to the default shapes and decode `C`
//!
//! Steps 1-4 ([`build_layers`]) and step 5 ([`decode`]) are separate: a
//! merged view that does not decode is still a valid merged view.

use std::path::{Path, PathBuf};

use confique::Config;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::coerce;
use crate::env;
use crate::error::ConfigError;
use crate::flatten::flatten;
use crate::merge::{deep_merge, merge_layers};
use crate::overrides::{get_nested, normalize_keys, set_nested};

/// All pre-loaded data needed to resolve a config. No I/O happens here.
pub struct ResolveInput {
    /// The located config file and its contents, if one was found.
    pub file: Option<(PathBuf, String)>,
    /// Raw environment variable pairs (pass `std::env::vars().collect()` or synthetic data).
    pub env_vars: Vec<(String, String)>,
    /// Env var prefix (e.g. `"BAST"`). `None` means env disabled.
    pub env_prefix: Option<String>,
    /// Explicit overrides, already expanded into a nested mapping.
    pub overrides: Mapping,
}

/// The sparse layers of the merged view, lowest precedence first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layers {
    pub defaults: Mapping,
    pub file: Mapping,
    pub env: Mapping,
    pub overrides: Mapping,
}

impl Layers {
    pub fn defaults_only(defaults: Mapping) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Defaults < file < env < overrides.
    pub fn merged(&self) -> Mapping {
        merge_layers([&self.defaults, &self.file, &self.env, &self.overrides])
    }
}

/// The outcome of a resolution: the layers, their merge, and the typed snapshot.
#[cfg(test)]
pub struct Resolved<C> {
    pub layers: Layers,
    pub merged: Mapping,
    pub snapshot: C,
}

/// Parse YAML file contents into a mapping with lowercased keys.
///
/// An empty document is an empty mapping. A document whose top level is not
/// a mapping is rejected.
pub fn parse_file(path: &Path, content: &str) -> Result<Mapping, ConfigError> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    match value {
        Value::Mapping(mapping) => Ok(normalize_keys(mapping)),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}

/// Decode the typed snapshot from a merged view.
///
/// Scalars are first conformed to the types in `shape` (the default table),
/// so `"3000"` decodes into an integer field and `5` into a string field.
/// Keys absent from `C` are ignored. A value of the wrong type is reported
/// as [`ConfigError::InvalidValue`] naming its key.
pub fn decode<C: Config>(merged: &Mapping, shape: &Mapping) -> Result<C, ConfigError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let conformed = coerce::conform_mapping(merged.clone(), shape);
    let layer: C::Layer = match serde_yaml::from_value(Value::Mapping(conformed.clone())) {
        Ok(layer) => layer,
        Err(e) => {
            return Err(match invalid_field::<C>(&conformed, shape) {
                Some((key, reason)) => ConfigError::InvalidValue { key, reason },
                None => ConfigError::TypeMismatch(e),
            });
        }
    };

    C::builder()
        .preloaded(layer)
        .load()
        .map_err(ConfigError::from)
}

/// The first known field of `conformed` that `C::Layer` rejects on its own.
fn invalid_field<C: Config>(conformed: &Mapping, shape: &Mapping) -> Option<(String, String)>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let mut checked: Vec<String> = Vec::new();
    for (leaf, _) in flatten(conformed) {
        let Some(key) = field_of(shape, &leaf) else {
            continue;
        };
        if checked.contains(&key) {
            continue;
        }
        let value = get_nested(conformed, &key).cloned().unwrap_or(Value::Null);
        let mut candidate = Mapping::new();
        set_nested(&mut candidate, &key, value);
        if let Err(e) = serde_yaml::from_value::<C::Layer>(Value::Mapping(candidate)) {
            return Some((key, e.to_string()));
        }
        checked.push(key);
    }
    None
}

/// The field of `shape` that the dotted `leaf` sits in: the leaf itself, or the
/// scalar field a nested value was written under. `None` for unknown keys.
fn field_of(shape: &Mapping, leaf: &str) -> Option<String> {
    let mut current = shape;
    let mut path: Vec<&str> = Vec::new();
    for segment in leaf.split('.') {
        path.push(segment);
        match current.get(segment)? {
            Value::Mapping(inner) => current = inner,
            _ => break,
        }
    }
    Some(path.join("."))
}

/// Resolve configuration from pre-loaded inputs.
#[cfg(test)]
pub fn resolve<C: Config + serde::Serialize>(
    input: ResolveInput,
) -> Result<Resolved<C>, ConfigError>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let layers = build_layers(crate::defaults::default_table::<C>()?, input)?;
    let merged = layers.merged();
    let snapshot = decode::<C>(&merged, &layers.defaults)?;
    Ok(Resolved {
        layers,
        merged,
        snapshot,
    })
}

/// Build the file, env and override layers over `defaults`.
///
/// Fails only when the file cannot be parsed. Whether the result decodes is
/// left to [`decode`].
pub fn build_layers(defaults: Mapping, input: ResolveInput) -> Result<Layers, ConfigError> {
    // 2: File layer
    let file = match &input.file {
        Some((path, content)) => {
            let mapping = parse_file(path, content)?;
            tracing::debug!(path = %path.display(), "Loaded config file");
            mapping
        }
        None => Mapping::new(),
    };

    // 3: Env vars, looked up for every key defaults and file know about
    let env = match &input.env_prefix {
        Some(prefix) => {
            let known = deep_merge(defaults.clone(), file.clone());
            env::env_to_mapping(prefix, &known, input.env_vars)
        }
        None => Mapping::new(),
    };
    if !env.is_empty() {
        tracing::debug!(keys = env.len(), "Applied environment overrides");
    }

    // 4: Overrides on top
    Ok(Layers {
        defaults,
        file,
        env,
        overrides: input.overrides,
    })
}
