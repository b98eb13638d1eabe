//! Log output for the `bast` binary.
//!
//! Everything goes to stderr so command output on stdout stays clean.
//! `RUST_LOG` wins over the configured level when set.

use std::io::IsTerminal;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::settings::{LogFormat, LogLevel};

/// The filter directive used when `RUST_LOG` is not set.
pub fn filter_directive(level: LogLevel, verbose: bool) -> String {
    let level = if verbose { LogLevel::Debug } else { level };
    format!("bast={level}")
}

/// Install the global subscriber. Returns `false` if one was already installed.
pub fn init_logging(level: LogLevel, format: LogFormat, verbose: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(level, verbose)));

    match format {
        LogFormat::Text => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal());
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .is_ok()
        }
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .is_ok(),
    }
}
