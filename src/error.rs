use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("Expected a mapping at the top of {}", .path.display())]
    NotAMapping { path: PathBuf },

    #[error("Could not resolve the user's home directory")]
    HomeDirUnresolvable,

    #[error("Failed to write {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize configuration: {0}")]
    SerializeError(#[source] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    DecodeError(#[from] confique::Error),

    #[error("Configuration does not match the expected types: {0}")]
    TypeMismatch(#[source] serde_yaml::Error),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("App name is required: call .app_name() on the builder")]
    AppNameRequired,
}

impl ConfigError {
    /// True for the one error `init` treats as "no file layer" rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::FileNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_error_formats_path() {
        let err = ConfigError::ReadError {
            path: "/home/user/.bast/config.yaml".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        let msg = err.to_string();
        assert!(msg.contains("config.yaml"));
        assert!(msg.starts_with("Failed to read"));
    }

    #[test]
    fn parse_error_formats_path() {
        let source = serde_yaml::from_str::<serde_yaml::Value>("a: [").unwrap_err();
        let err = ConfigError::ParseError {
            path: "bad.yaml".into(),
            source,
        };
        assert!(err.to_string().contains("bad.yaml"));
    }

    #[test]
    fn key_not_found_formats() {
        let err = ConfigError::KeyNotFound("server.nope".into());
        assert!(err.to_string().contains("server.nope"));
    }

    #[test]
    fn type_mismatch_formats() {
        let source = serde_yaml::from_str::<u64>("soon").unwrap_err();
        let err = ConfigError::TypeMismatch(source);
        assert!(err.to_string().starts_with("Configuration does not match"));
    }

    #[test]
    fn only_file_not_found_is_not_found() {
        assert!(ConfigError::FileNotFound { path: "x".into() }.is_not_found());
        assert!(!ConfigError::HomeDirUnresolvable.is_not_found());
    }

    #[test]
    fn app_name_required_formats() {
        let err = ConfigError::AppNameRequired;
        assert!(err.to_string().contains("app_name"));
    }
}
