//! Output of the small, non-config commands.
//!
//! Each function returns the text to print, so the binary stays a thin
//! dispatcher and the wording can be tested.

use crate::settings::BastConfig;

pub const DEFAULT_NAME: &str = "World";
pub const DEFAULT_GREETING: &str = "Hello";

/// Environment variables shown by `bast info --env`, in display order.
pub const INFO_ENV_VARS: &[&str] = &[
    "HOME",
    "USER",
    "USERNAME",
    "PATH",
    "SHELL",
    "CARGO_HOME",
    "RUSTUP_HOME",
    "EDITOR",
    "LANG",
    "TZ",
];

const PATH_DISPLAY_LIMIT: usize = 100;

/// Printed when `bast` runs without a subcommand.
pub fn welcome(config: &BastConfig) -> String {
    let name = &config.app.name;
    format!("Welcome to {name}!\nUse '{name} --help' to see the available commands.")
}

/// `"{greeting}, {name}!"`. Missing or empty arguments fall back to the defaults.
pub fn greeting(name: Option<&str>, greeting: Option<&str>) -> String {
    let name = name.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_NAME);
    let greeting = greeting.filter(|s| !s.is_empty()).unwrap_or(DEFAULT_GREETING);
    format!("{greeting}, {name}!")
}

pub fn version_text(config: &BastConfig) -> String {
    format!(
        "{} v{}\nBuilt with Rust and clap\nAuthor: {}",
        config.app.name, config.app.version, config.app.author
    )
}

/// Which sections `bast info` prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfoSections {
    pub os: bool,
    pub build: bool,
    pub env: bool,
}

impl InfoSections {
    /// No flag given means every section.
    pub fn from_flags(os: bool, build: bool, env: bool) -> Self {
        if !os && !build && !env {
            Self {
                os: true,
                build: true,
                env: true,
            }
        } else {
            Self { os, build, env }
        }
    }
}

/// Render `bast info`. `lookup` reads one environment variable.
pub fn info_text(sections: InfoSections, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut blocks = Vec::new();

    if sections.os {
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let mut lines = vec![
            "System:".to_string(),
            format!("  OS: {}", std::env::consts::OS),
            format!("  Architecture: {}", std::env::consts::ARCH),
            format!("  CPUs: {cpus}"),
        ];
        match std::env::current_dir() {
            Ok(dir) => lines.push(format!("  Current directory: {}", dir.display())),
            Err(e) => tracing::debug!(error = %e, "Could not read the current directory"),
        }
        blocks.push(lines.join("\n"));
    }

    if sections.build {
        let profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        };
        blocks.push(
            [
                "Build:".to_string(),
                format!("  Package: {} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                format!("  Profile: {profile}"),
                format!("  Target: {}-{}", std::env::consts::ARCH, std::env::consts::OS),
            ]
            .join("\n"),
        );
    }

    if sections.env {
        let mut lines = vec!["Environment:".to_string()];
        for var in INFO_ENV_VARS {
            match lookup(var).filter(|v| !v.is_empty()) {
                Some(value) => lines.push(format!("  {var}: {}", display_env_value(var, &value))),
                None => tracing::debug!(var = %var, "Environment variable not set"),
            }
        }
        blocks.push(lines.join("\n"));
    }

    blocks.join("\n\n")
}

fn display_env_value(var: &str, value: &str) -> String {
    if var == "PATH" && value.chars().count() > PATH_DISPLAY_LIMIT {
        let head: String = value.chars().take(PATH_DISPLAY_LIMIT).collect();
        format!("{head}...")
    } else {
        value.to_string()
    }
}
