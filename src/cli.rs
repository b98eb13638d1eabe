//! Clap front end for the `bast` binary.
//!
//! Compiled only with the `clap` Cargo feature (on by default). The store and
//! everything under it stay framework-free: [`ConfigArgs::into_action()`] is
//! the only bridge, turning parsed arguments into a
//! [`ConfigAction`](crate::ConfigAction) for
//! [`ConfigStore::handle()`](crate::ConfigStore::handle).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::types::ConfigAction;

/// A modern command-line toolbox.
#[derive(Debug, Parser)]
#[command(name = "bast", version, about)]
pub struct Cli {
    /// Config file (default: ~/.bast/config.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print a greeting
    Greet {
        /// Who to greet
        #[arg(short, long)]
        name: Option<String>,
        /// Custom greeting
        #[arg(short, long)]
        greeting: Option<String>,
    },
    /// Show version information
    Version,
    /// Show system information
    Info {
        /// Only operating system details
        #[arg(long)]
        os: bool,
        /// Only build details
        #[arg(long)]
        build: bool,
        /// Only selected environment variables
        #[arg(long)]
        env: bool,
    },
    /// Manage the configuration
    Config(ConfigArgs),
}

/// Args for the `config` subcommand group.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: Option<ConfigSubcommand>,
}

/// Available config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show the current configuration
    List,
    /// Generate a commented sample configuration file
    Gen {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the value of a config key
    Get {
        /// Dotted key path (e.g. "server.default_port")
        key: String,
    },
    /// Set a value and save the configuration
    Set {
        /// Dotted key path (e.g. "server.default_port")
        key: String,
        /// Value to set
        value: String,
    },
    /// Restore the defaults and save
    Reset,
    /// Create the config file if it does not exist
    Init,
}

impl ConfigArgs {
    /// Convert clap-parsed args into a framework-agnostic `ConfigAction`.
    ///
    /// Bare `config` and explicit `config list` both map to `ConfigAction::List`.
    pub fn into_action(self) -> ConfigAction {
        match self.action {
            None | Some(ConfigSubcommand::List) => ConfigAction::List,
            Some(ConfigSubcommand::Gen { output }) => ConfigAction::Gen { output },
            Some(ConfigSubcommand::Get { key }) => ConfigAction::Get { key },
            Some(ConfigSubcommand::Set { key, value }) => ConfigAction::Set { key, value },
            Some(ConfigSubcommand::Reset) => ConfigAction::Reset,
            Some(ConfigSubcommand::Init) => ConfigAction::Init,
        }
    }
}
