//! Layered configuration and commands for `bast`, a small command-line toolbox.
//!
//! The heart of the crate is [`ConfigStore`]: it discovers a YAML config file,
//! layers it over compiled defaults, applies `BAST_*` environment variables and
//! explicit overrides, and decodes a typed [`BastConfig`](settings::BastConfig)
//! snapshot.
//!
//! ```ignore
//! let mut store = ConfigStore::<BastConfig>::builder()
//!     .app_name("bast")
//!     .build()?;
//! store.init(None)?;
//! let port = store.get().server.default_port;
//! ```
//!
//! # Layer precedence
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! Config file           first of ~/.bast/config.yaml, ./config.yaml, ./config/config.yaml
//!        ↑ overridden by
//! Environment vars      BAST_SERVER_DEFAULT_PORT=9000
//!        ↑ overridden by
//! Overrides             .cli_override() and ConfigStore::set()
//! ```
//!
//! Every layer is **sparse**: it holds only the keys it sets, and everything
//! else falls through to the layer below. Keys are dotted paths
//! (`server.default_port`) and are matched case-insensitively.
//!
//! # The struct is the default table
//!
//! [`BastConfig`](settings::BastConfig) derives confique's `Config`. Its
//! `#[config(default = ...)]` attributes are the lowest layer, and its `///`
//! doc comments become the comments of the template printed by `config gen`.
//!
//! # Environment variables
//!
//! The variable for a key is the prefix, an underscore, and the key with dots
//! replaced by underscores, uppercased. Only keys the defaults or the file
//! already know are looked up. Values are coerced to the type of the value
//! they replace, so `BAST_SERVER_TIMEOUT=90` is an integer.
//!
//! # Reading values
//!
//! [`ConfigStore::get`] returns the typed snapshot. The untyped getters
//! ([`get_string`](ConfigStore::get_string), [`get_int`](ConfigStore::get_int),
//! [`get_bool`](ConfigStore::get_bool)) read the merged view and fall back to
//! the zero value; [`lookup`](ConfigStore::lookup) tells absent apart.
//!
//! Keys the snapshot does not know are kept in the merged view and written
//! back by [`save`](ConfigStore::save). They are only logged, never rejected.
//!
//! # Persistence
//!
//! `save` writes the entire merged view to `~/.bast/config.yaml`. The write
//! goes through a temp file and a rename, and the directory is created with
//! owner-only permissions on unix.
//!
//! # Clap adapter
//!
//! The [`cli`] module (behind the `clap` feature, on by default) defines the
//! `bast` command line. The rest of the crate does not depend on clap:
//! [`ConfigAction`] is the framework-free form of a `config` subcommand.
//!
//! # Error handling
//!
//! All fallible operations return [`ConfigError`]. Messages are user-facing
//! and carry the offending path or key.

pub mod error;
pub mod settings;
pub mod types;

mod builder;
#[cfg(feature = "clap")]
pub mod cli;
mod coerce;
pub mod commands;
mod defaults;
mod env;
mod file;
mod flatten;
pub mod logging;
pub(crate) mod merge;
mod ops;
mod overrides;
mod persist;
mod resolve;
mod store;
mod validate;

#[cfg(test)]
mod fixtures;

pub use builder::StoreBuilder;
#[cfg(feature = "clap")]
pub use cli::{ConfigArgs, ConfigSubcommand};
pub use error::ConfigError;
pub use ops::ConfigResult;
pub use resolve::Layers;
pub use store::{ConfigStore, StoreOptions};
pub use types::{ConfigAction, SearchPath};
