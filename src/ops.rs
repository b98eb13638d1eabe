//! Config operations: template generation, key lookup, listing, and result types.
//!
//! Provides the logic behind `config list`, `config gen` and `config get`, and
//! the `ConfigResult` enum that callers use to display results.

use std::fmt;
use std::path::PathBuf;

use confique::Config;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;
use crate::flatten::flatten_serialize;
use crate::overrides::{get_nested, normalize_key};

/// One titled block of a listing, e.g. `app` with its four keys.
pub type Section = (String, Vec<(String, String)>);

/// Result of a config operation. Returned to the caller for display.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigResult {
    /// A generated YAML template string.
    Template(String),
    /// Confirmation that a template was written to a file.
    TemplateWritten { path: PathBuf },
    /// A key's resolved value.
    KeyValue { key: String, value: String },
    /// Confirmation that a value was set and saved.
    ValueSet {
        key: String,
        value: String,
        path: PathBuf,
    },
    /// Confirmation that every layer but the defaults was dropped and saved.
    Reset { path: PathBuf },
    /// `config init` wrote a new file.
    Created { path: PathBuf, app_name: String },
    /// `config init` found a file already in place.
    AlreadyExists { path: PathBuf, app_name: String },
    /// The snapshot grouped by top-level section.
    Listing {
        sections: Vec<Section>,
        path: Option<PathBuf>,
    },
}

impl fmt::Display for ConfigResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigResult::Template(t) => write!(f, "{}", t.trim_end()),
            ConfigResult::TemplateWritten { path } => {
                write!(f, "Config template written to {}", path.display())
            }
            ConfigResult::KeyValue { key, value } => write!(f, "{key} = {value}"),
            ConfigResult::ValueSet { key, value, path } => {
                writeln!(f, "Set '{key}' to '{value}'")?;
                write!(f, "Configuration saved to {}", path.display())
            }
            ConfigResult::Reset { path } => {
                writeln!(f, "Configuration reset to defaults")?;
                write!(f, "Configuration saved to {}", path.display())
            }
            ConfigResult::Created { path, app_name } => {
                writeln!(f, "Config file created: {}", path.display())?;
                write!(
                    f,
                    "Edit this file or use '{app_name} config set' to change values"
                )
            }
            ConfigResult::AlreadyExists { path, app_name } => {
                writeln!(f, "Config file already exists: {}", path.display())?;
                write!(f, "Use '{app_name} config reset' to restore the defaults")
            }
            ConfigResult::Listing { sections, path } => {
                write!(f, "Configuration:")?;
                for (title, entries) in sections {
                    writeln!(f)?;
                    writeln!(f)?;
                    write!(f, "  {title}:")?;
                    for (key, value) in entries {
                        writeln!(f)?;
                        write!(f, "    {key} = {value}")?;
                    }
                }
                if let Some(path) = path {
                    writeln!(f)?;
                    writeln!(f)?;
                    write!(f, "Config file: {}", path.display())?;
                }
                Ok(())
            }
        }
    }
}

/// Generate a commented YAML template from the config struct's doc comments.
pub fn generate_template<C: Config>() -> String {
    confique::yaml::template::<C>(confique::yaml::FormatOptions::default())
}

/// Get a value from the merged view by dotted key.
pub fn get_value(merged: &Mapping, key: &str) -> Result<ConfigResult, ConfigError> {
    let value = get_nested(merged, key).ok_or_else(|| ConfigError::KeyNotFound(key.into()))?;
    Ok(ConfigResult::KeyValue {
        key: normalize_key(key),
        value: format_value(value),
    })
}

/// List the snapshot, grouped by its top-level sections.
pub fn list_values<C: Serialize>(
    config: &C,
    path: Option<PathBuf>,
) -> Result<ConfigResult, ConfigError> {
    let pairs = flatten_serialize(config).map_err(ConfigError::SerializeError)?;

    let mut sections: Vec<Section> = Vec::new();
    for (dotted, value) in pairs {
        let (title, leaf) = match dotted.split_once('.') {
            Some((title, leaf)) => (title.to_string(), leaf.to_string()),
            None => (String::new(), dotted),
        };
        let display = match value {
            Some(v) => format_value(&v),
            None => "<not set>".to_string(),
        };
        match sections.last_mut() {
            Some((last, entries)) if *last == title => entries.push((leaf, display)),
            _ => sections.push((title, vec![(leaf, display)])),
        }
    }

    Ok(ConfigResult::Listing { sections, path })
}

/// Format a YAML value for display. Scalars print bare; collections as inline YAML.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "~".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::defaults;
    use crate::settings::BastConfig;

    fn test_config() -> BastConfig {
        BastConfig::builder().load().unwrap()
    }

    #[test]
    fn generate_template_contains_keys() {
        let template = generate_template::<BastConfig>();
        for key in ["app", "name", "logging", "default_port", "auto_update"] {
            assert!(template.contains(key), "missing {key}");
        }
    }

    #[test]
    fn generate_template_contains_doc_comments() {
        let template = generate_template::<BastConfig>();
        assert!(template.contains("Default TCP port"));
        assert!(template.contains("Timeout in seconds"));
    }

    #[test]
    fn get_flat_section_key() {
        let result = get_value(&defaults(), "server.default_port").unwrap();
        assert_eq!(
            result,
            ConfigResult::KeyValue {
                key: "server.default_port".into(),
                value: "8080".into()
            }
        );
    }

    #[test]
    fn get_is_case_insensitive() {
        let result = get_value(&defaults(), "App.Name").unwrap();
        assert_eq!(result.to_string(), "app.name = bast");
    }

    #[test]
    fn get_section_prints_yaml() {
        let result = get_value(&defaults(), "features").unwrap();
        let text = result.to_string();
        assert!(text.contains("auto_update: false"));
    }

    #[test]
    fn get_nonexistent_key() {
        let result = get_value(&defaults(), "server.nope");
        assert!(matches!(result, Err(ConfigError::KeyNotFound(_))));
    }

    #[test]
    fn list_groups_by_section() {
        let result = list_values(&test_config(), None).unwrap();
        let ConfigResult::Listing { sections, .. } = result else {
            panic!("Expected Listing");
        };
        let titles: Vec<&str> = sections.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(titles, vec!["app", "logging", "server", "features"]);
        let server = &sections[2].1;
        assert!(server.contains(&("default_port".into(), "8080".into())));
        assert_eq!(sections.iter().map(|(_, e)| e.len()).sum::<usize>(), 11);
    }

    #[test]
    fn listing_display_format() {
        let result = ConfigResult::Listing {
            sections: vec![
                ("app".into(), vec![("name".into(), "bast".into())]),
                ("server".into(), vec![("default_port".into(), "8080".into())]),
            ],
            path: Some("/home/u/.bast/config.yaml".into()),
        };
        assert_eq!(
            result.to_string(),
            "Configuration:\n\n  app:\n    name = bast\n\n  server:\n    default_port = 8080\n\nConfig file: /home/u/.bast/config.yaml"
        );
    }

    #[test]
    fn already_exists_suggests_reset() {
        let result = ConfigResult::AlreadyExists {
            path: "/tmp/config.yaml".into(),
            app_name: "bast".into(),
        };
        let text = result.to_string();
        assert!(text.contains("/tmp/config.yaml"));
        assert!(text.contains("bast config reset"));
    }

    #[test]
    fn format_scalars() {
        assert_eq!(format_value(&Value::from(42)), "42");
        assert_eq!(format_value(&Value::from(true)), "true");
        assert_eq!(format_value(&Value::from("x")), "x");
    }
}
