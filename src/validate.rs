//! Unknown-key reporting for config files.
//!
//! Uses `serde_ignored` to deserialize a file layer into `C::Layer` (all-optional
//! fields) and capture the keys the layer doesn't consume. Unknown keys are
//! not an error: they stay in the merged view and are written back on save.
//! They are only logged, so typos are visible with `--verbose`.

use std::path::Path;

use confique::Config;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};

/// Dotted paths in `mapping` that config type `C` does not recognise.
///
/// Returns an empty list if the layer fails to deserialize at all; the typed
/// decode reports that failure with better context.
pub fn unknown_keys<C: Config>(mapping: &Mapping) -> Vec<String>
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let mut unknown: Vec<String> = Vec::new();
    let result: Result<C::Layer, _> =
        serde_ignored::deserialize(Value::Mapping(mapping.clone()), |ignored_path| {
            unknown.push(ignored_path.to_string());
        });
    match result {
        Ok(_) => unknown,
        Err(_) => Vec::new(),
    }
}

/// Log each unknown key found in the file at `path`.
pub fn report_unknown_keys<C: Config>(mapping: &Mapping, path: &Path) -> usize
where
    C::Layer: for<'de> Deserialize<'de>,
{
    let keys = unknown_keys::<C>(mapping);
    for key in &keys {
        tracing::warn!(key = %key, path = %path.display(), "Ignoring unknown config key");
    }
    keys.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{EXTRA_KEYS_YAML, FULL_YAML};
    use crate::settings::BastConfig;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn known_keys_pass() {
        assert!(unknown_keys::<BastConfig>(&mapping(FULL_YAML)).is_empty());
    }

    #[test]
    fn unknown_top_level_and_nested_keys_are_reported() {
        let keys = unknown_keys::<BastConfig>(&mapping(EXTRA_KEYS_YAML));
        assert_eq!(keys.len(), 2);
        assert!(keys.iter().any(|k| k.contains("proxy")));
        assert!(keys.iter().any(|k| k.contains("plugins")));
    }

    #[test]
    fn type_mismatch_is_left_to_decode() {
        let keys = unknown_keys::<BastConfig>(&mapping("server:\n  timeout: [1, 2]\n"));
        assert!(keys.is_empty());
    }

    #[test]
    fn report_counts_keys() {
        let n = report_unknown_keys::<BastConfig>(
            &mapping("typo: 1\n"),
            Path::new("/tmp/config.yaml"),
        );
        assert_eq!(n, 1);
    }
}
