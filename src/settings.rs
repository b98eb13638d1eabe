//! The typed configuration snapshot for bast.
//!
//! Every field carries a `#[config(default = ...)]`, so the struct doubles as
//! the default value table: loading it with no sources yields a fully
//! populated snapshot.
//!
//! | Dotted key              | Env var                     | Default    |
//! |-------------------------|-----------------------------|------------|
//! | `app.name`              | `BAST_APP_NAME`             | `bast`     |
//! | `app.version`           | `BAST_APP_VERSION`          | `1.0.0`    |
//! | `logging.level`         | `BAST_LOGGING_LEVEL`        | `info`     |
//! | `logging.format`        | `BAST_LOGGING_FORMAT`       | `text`     |
//! | `server.default_port`   | `BAST_SERVER_DEFAULT_PORT`  | `8080`     |
//! | `server.default_host`   | `BAST_SERVER_DEFAULT_HOST`  | `0.0.0.0`  |
//! | `server.timeout`        | `BAST_SERVER_TIMEOUT`       | `30`       |
//! | `features.auto_update`  | `BAST_FEATURES_AUTO_UPDATE` | `false`    |
//! | `features.verbose`      | `BAST_FEATURES_VERBOSE`     | `false`    |

use std::fmt;
use std::str::FromStr;

use confique::Config;
use serde::{Deserialize, Deserializer, Serialize, de};

/// Name used for the config directory, env prefix and store.
pub const APP_NAME: &str = "bast";

/// Root configuration for bast.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BastConfig {
    /// General application metadata.
    #[config(nested)]
    pub app: AppConfig,

    /// Log output settings.
    #[config(nested)]
    pub logging: LoggingConfig,

    /// Defaults used by network-facing commands.
    #[config(nested)]
    pub server: ServerConfig,

    /// Feature toggles.
    #[config(nested)]
    pub features: FeaturesConfig,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Application name, used in banners and hints.
    #[config(default = "bast")]
    pub name: String,

    /// Application version.
    #[config(default = "1.0.0")]
    pub version: String,

    /// One-line description.
    #[config(default = "A modern command-line toolbox")]
    pub description: String,

    /// Author shown by `bast version`.
    #[config(default = "CristianSsousa")]
    pub author: String,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Minimum log level: debug, info, warn or error.
    #[config(default = "info")]
    pub level: LogLevel,

    /// Log line format: text or json.
    #[config(default = "text")]
    pub format: LogFormat,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Default TCP port. Not range-checked.
    #[config(default = 8080)]
    pub default_port: i64,

    /// Default bind host.
    #[config(default = "0.0.0.0")]
    pub default_host: String,

    /// Timeout in seconds.
    #[config(default = 30)]
    pub timeout: u64,
}

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeaturesConfig {
    /// Check for updates automatically.
    #[config(default = false)]
    pub auto_update: bool,

    /// Verbose output. Also set by the `--verbose` flag.
    #[config(default = false)]
    pub verbose: bool,
}

/// Parsed case-insensitively, so `DEBUG` and `Info` are accepted; written lowercase.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(format!(
                "unknown log level `{s}`, expected debug, info, warn or error"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed case-insensitively; written lowercase.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            LogFormat::Text => "text",
            LogFormat::Json => "json",
        }
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("unknown log format `{s}`, expected text or json")),
        }
    }
}

impl<'de> Deserialize<'de> for LogFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
