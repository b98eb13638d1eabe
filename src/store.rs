//! The layered configuration store.
//!
//! A [`ConfigStore`] owns the layers of the merged view (defaults, file,
//! environment, explicit overrides) and the typed snapshot decoded from them.
//! It is a plain value: build one at startup with [`StoreBuilder`] and pass it
//! to whatever needs configuration.
//!
//! [`StoreBuilder`]: crate::builder::StoreBuilder

use std::path::{Path, PathBuf};

use confique::Config;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::builder::StoreBuilder;
use crate::coerce;
use crate::error::ConfigError;
use crate::file;
use crate::ops::{self, ConfigResult};
use crate::overrides::{get_nested, normalize_key, parse_scalar, set_nested};
use crate::persist;
use crate::resolve::{self, Layers, ResolveInput};
use crate::types::{ConfigAction, SearchPath};
use crate::validate;

/// Where the store looks for and writes its file, and how it reads the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreOptions {
    pub app_name: String,
    pub file_name: String,
    pub search_paths: Vec<SearchPath>,
    pub persist_path: SearchPath,
    /// `None` disables the environment layer.
    pub env_prefix: Option<String>,
    /// Fixed variables to use instead of the process environment.
    pub env_vars: Option<Vec<(String, String)>>,
}

pub struct ConfigStore<C> {
    options: StoreOptions,
    layers: Layers,
    merged: Mapping,
    snapshot: C,
    defaults_snapshot: C,
    source_path: Option<PathBuf>,
    initialized: bool,
}

impl<C> ConfigStore<C>
where
    C: Config + Serialize + Clone,
    C::Layer: for<'de> Deserialize<'de>,
{
    pub fn builder() -> StoreBuilder<C> {
        StoreBuilder::new()
    }

    /// A store holding only `defaults` and `overrides`. Nothing is read until [`init`](Self::init).
    pub(crate) fn new(
        options: StoreOptions,
        defaults: Mapping,
        overrides: Mapping,
    ) -> Result<Self, ConfigError> {
        let defaults_snapshot = resolve::decode::<C>(&defaults, &defaults)?;
        let layers = Layers {
            overrides,
            ..Layers::defaults_only(defaults)
        };
        let merged = layers.merged();
        let snapshot = resolve::decode::<C>(&merged, &layers.defaults)?;
        Ok(Self {
            options,
            layers,
            merged,
            snapshot,
            defaults_snapshot,
            source_path: None,
            initialized: false,
        })
    }

    /// Load the file and environment layers and decode the snapshot.
    ///
    /// With `explicit`, only that file is considered; otherwise the search paths
    /// are tried in order. A missing file leaves the file layer empty. Explicit
    /// overrides (bound flags and earlier [`set`](Self::set) calls) survive.
    ///
    /// When the merged view does not decode, the layers are still installed so
    /// lookups and [`save`](Self::save) see every loaded value, the previous
    /// snapshot is kept, and the decode error is returned.
    pub fn init(&mut self, explicit: Option<&Path>) -> Result<(), ConfigError> {
        self.initialized = true;

        let file = file::locate_config_file(
            explicit,
            &self.options.search_paths,
            &self.options.file_name,
        )?;
        let source_path = file.as_ref().map(|(path, _)| path.clone());
        if source_path.is_none() {
            tracing::debug!("No config file found, using defaults");
        }

        let env_vars = match &self.options.env_vars {
            Some(vars) => vars.clone(),
            None => std::env::vars().collect(),
        };

        let layers = resolve::build_layers(
            self.layers.defaults.clone(),
            ResolveInput {
                file,
                env_vars,
                env_prefix: self.options.env_prefix.clone(),
                overrides: self.layers.overrides.clone(),
            },
        )?;

        self.merged = layers.merged();
        self.layers = layers;
        self.source_path = source_path;
        self.snapshot = resolve::decode::<C>(&self.merged, &self.layers.defaults)?;
        Ok(())
    }

    /// Log every key in the loaded file that the snapshot does not know.
    ///
    /// Returns how many were found. Call after logging is set up.
    pub fn report_unknown_keys(&self) -> usize {
        match &self.source_path {
            Some(path) => validate::report_unknown_keys::<C>(&self.layers.file, path),
            None => 0,
        }
    }

    /// The typed snapshot. Runs `init(None)` first if the store was never initialised.
    ///
    /// A failed lazy init is logged. A file that cannot be read or parsed leaves
    /// the defaults (plus explicit overrides); a merged view that does not
    /// decode keeps the previous snapshot.
    pub fn get(&mut self) -> &C {
        if !self.initialized
            && let Err(e) = self.init(None)
        {
            tracing::warn!(error = %e, "Failed to load configuration, using defaults");
        }
        &self.snapshot
    }

    /// The snapshot as it stands, without triggering a lazy init.
    pub fn snapshot(&self) -> &C {
        &self.snapshot
    }

    /// Set `key` in the override layer and re-decode the snapshot.
    ///
    /// Never fails. A value the snapshot cannot accept stays in the merged view
    /// and the previous snapshot is kept.
    pub fn set<V: Into<Value>>(&mut self, key: &str, value: V) {
        set_nested(&mut self.layers.overrides, key, value.into());
        self.merged = self.layers.merged();
        match resolve::decode::<C>(&self.merged, &self.layers.defaults) {
            Ok(snapshot) => self.snapshot = snapshot,
            Err(e) => {
                tracing::warn!(key = %normalize_key(key), error = %e, "Value does not fit the configuration, snapshot unchanged");
            }
        }
    }

    /// The raw value at `key` in the merged view, or `None` when absent.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        get_nested(&self.merged, key)
    }

    /// The value at `key` as a string; `""` when absent or not a scalar.
    pub fn get_string(&self, key: &str) -> String {
        self.lookup(key)
            .and_then(coerce::as_string)
            .unwrap_or_default()
    }

    /// The value at `key` as an integer; `0` when absent or not convertible.
    pub fn get_int(&self, key: &str) -> i64 {
        self.lookup(key).and_then(coerce::as_int).unwrap_or_default()
    }

    /// The value at `key` as a boolean; `false` when absent or not convertible.
    pub fn get_bool(&self, key: &str) -> bool {
        self.lookup(key).and_then(coerce::as_bool).unwrap_or_default()
    }

    pub fn merged(&self) -> &Mapping {
        &self.merged
    }

    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    /// The file the last `init` loaded, if any.
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// The file [`save`](Self::save) writes to.
    pub fn persist_file(&self) -> Result<PathBuf, ConfigError> {
        file::resolve_persist_path(&self.options.persist_path, &self.options.file_name)
    }

    /// Write the whole merged view to the persist file.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = self.persist_file()?;
        persist::save_mapping(&path, &self.merged)?;
        Ok(path)
    }

    /// Drop the file, environment and override layers. Only defaults remain.
    pub fn reset(&mut self) {
        self.layers = Layers::defaults_only(self.layers.defaults.clone());
        self.merged = self.layers.merged();
        self.snapshot = self.defaults_snapshot.clone();
        self.source_path = None;
        tracing::debug!("Configuration reset to defaults");
    }

    /// Run a `config` subcommand against this store.
    pub fn handle(&mut self, action: &ConfigAction) -> Result<ConfigResult, ConfigError> {
        match action {
            ConfigAction::List => {
                let path = self.persist_file().ok();
                ops::list_values(self.get(), path)
            }
            ConfigAction::Gen { output } => {
                let template = ops::generate_template::<C>();
                match output {
                    Some(path) => {
                        persist::write_atomic(path, &template)?;
                        Ok(ConfigResult::TemplateWritten { path: path.clone() })
                    }
                    None => Ok(ConfigResult::Template(template)),
                }
            }
            ConfigAction::Get { key } => {
                self.get();
                ops::get_value(&self.merged, key)
            }
            ConfigAction::Set { key, value } => {
                self.get();
                self.set(key, parse_scalar(value));
                let path = self.save()?;
                Ok(ConfigResult::ValueSet {
                    key: normalize_key(key),
                    value: value.clone(),
                    path,
                })
            }
            ConfigAction::Reset => {
                self.reset();
                let path = self.save()?;
                Ok(ConfigResult::Reset { path })
            }
            ConfigAction::Init => {
                let path = self.persist_file()?;
                self.get();
                let app_name = self.display_name();
                if path.exists() {
                    return Ok(ConfigResult::AlreadyExists { path, app_name });
                }
                let path = self.save()?;
                Ok(ConfigResult::Created { path, app_name })
            }
        }
    }

    fn display_name(&self) -> String {
        match self.get_string("app.name") {
            name if name.is_empty() => self.options.app_name.clone(),
            name => name,
        }
    }
}
