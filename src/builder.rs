use std::marker::PhantomData;

use confique::Config;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use crate::defaults::default_table;
use crate::error::ConfigError;
use crate::overrides;
use crate::store::{ConfigStore, StoreOptions};
use crate::types::SearchPath;

/// Builder for a [`ConfigStore`].
///
/// Only [`app_name()`](Self::app_name) is required. Everything else derives
/// from it:
///
/// - **Discovery**: `~/.{app}/config.yaml`, then `./config.yaml`, then
///   `./config/config.yaml`; the first existing file wins.
/// - **Persistence**: `~/.{app}/config.yaml`.
/// - **Environment**: `{APP}_` prefix, e.g. `BAST_SERVER_DEFAULT_PORT`.
pub struct StoreBuilder<C> {
    app_name: Option<String>,
    file_name: Option<String>,
    search_paths: Option<Vec<SearchPath>>,
    persist_path: Option<SearchPath>,
    env_prefix: Option<String>,
    env_enabled: bool,
    env_vars: Option<Vec<(String, String)>>,
    cli_overrides: Vec<(String, Value)>,
    _phantom: PhantomData<C>,
}

impl<C> StoreBuilder<C>
where
    C: Config + Serialize + Clone,
    C::Layer: for<'de> Deserialize<'de>,
{
    pub(crate) fn new() -> Self {
        Self {
            app_name: None,
            file_name: None,
            search_paths: None,
            persist_path: None,
            env_prefix: None,
            env_enabled: true,
            env_vars: None,
            cli_overrides: Vec::new(),
            _phantom: PhantomData,
        }
    }

    /// Set the application name. This derives sensible defaults:
    /// - `search_paths` → `[Home(".{app_name}"), Cwd, Path("config")]`
    /// - `persist_path` → `Home(".{app_name}")`
    /// - `env_prefix` → `"{APP_NAME}"` (uppercased)
    pub fn app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Override the config file name (default: `"config.yaml"`).
    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }

    /// Replace the default search paths. The first existing file wins.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = Some(paths);
        self
    }

    /// Set the directory `save` writes to. Independent of the search paths.
    pub fn persist_path(mut self, path: SearchPath) -> Self {
        self.persist_path = Some(path);
        self
    }

    /// Override the environment variable prefix (default: uppercased `app_name`).
    pub fn env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Disable environment variable loading entirely.
    pub fn no_env(mut self) -> Self {
        self.env_enabled = false;
        self
    }

    /// Read these variables instead of the process environment.
    pub fn env_vars(mut self, vars: Vec<(String, String)>) -> Self {
        self.env_vars = Some(vars);
        self
    }

    /// Add a CLI override. `None` values are ignored (useful for optional clap args).
    pub fn cli_override<V: Into<Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.cli_overrides.push((key.to_string(), v.into()));
        }
        self
    }

    /// Resolve the effective app name, or error if not set.
    fn effective_app_name(&self) -> Result<&str, ConfigError> {
        self.app_name
            .as_deref()
            .ok_or(ConfigError::AppNameRequired)
    }

    fn effective_file_name(&self) -> String {
        self.file_name
            .clone()
            .unwrap_or_else(|| "config.yaml".to_string())
    }

    fn home_dir_name(&self) -> Result<String, ConfigError> {
        Ok(format!(".{}", self.effective_app_name()?))
    }

    fn effective_search_paths(&self) -> Result<Vec<SearchPath>, ConfigError> {
        if let Some(paths) = &self.search_paths {
            return Ok(paths.clone());
        }
        Ok(vec![
            SearchPath::Home(self.home_dir_name()?),
            SearchPath::Cwd,
            SearchPath::Path("config".into()),
        ])
    }

    fn effective_persist_path(&self) -> Result<SearchPath, ConfigError> {
        match &self.persist_path {
            Some(path) => Ok(path.clone()),
            None => Ok(SearchPath::Home(self.home_dir_name()?)),
        }
    }

    /// Resolve the effective env prefix (None if env disabled).
    fn effective_env_prefix(&self) -> Result<Option<String>, ConfigError> {
        if !self.env_enabled {
            return Ok(None);
        }
        if let Some(prefix) = &self.env_prefix {
            return Ok(Some(prefix.clone()));
        }
        let app = self.effective_app_name()?;
        Ok(Some(app.to_uppercase()))
    }

    fn options(&self) -> Result<StoreOptions, ConfigError> {
        Ok(StoreOptions {
            app_name: self.effective_app_name()?.to_string(),
            file_name: self.effective_file_name(),
            search_paths: self.effective_search_paths()?,
            persist_path: self.effective_persist_path()?,
            env_prefix: self.effective_env_prefix()?,
            env_vars: self.env_vars.clone(),
        })
    }

    /// Build the store without touching the filesystem or environment.
    pub fn build(self) -> Result<ConfigStore<C>, ConfigError> {
        let options = self.options()?;
        let overrides = overrides::overrides_to_mapping(&self.cli_overrides);
        ConfigStore::new(options, default_table::<C>()?, overrides)
    }

    /// Build the store and run `init` with the search paths.
    pub fn load(self) -> Result<ConfigStore<C>, ConfigError> {
        let mut store = self.build()?;
        store.init(None)?;
        Ok(store)
    }
}
