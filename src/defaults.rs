//! The default value table as a mapping.
//!
//! The defaults themselves live on the config struct (`#[config(default)]`).
//! This module loads the struct from defaults alone and serializes it, giving
//! the lowest layer of the merged view: one entry for every key the snapshot
//! expects.

use confique::Config;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

/// Every key of `C` with its compiled default.
///
/// Fails if `C` has a required field without a default.
pub fn default_table<C: Config + Serialize>() -> Result<Mapping, ConfigError> {
    let config = C::builder().load()?;
    match serde_yaml::to_value(&config).map_err(ConfigError::SerializeError)? {
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(ConfigError::InvalidValue {
            key: "<defaults>".into(),
            reason: format!("config did not serialize to a mapping: {other:?}"),
        }),
    }
}
