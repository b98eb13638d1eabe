use serde_yaml::{Mapping, Value};

/// Deep-merge `overlay` on top of `base`.
/// If both sides have a Mapping for the same key, recurse.
/// Otherwise, `overlay`'s value wins.
pub fn deep_merge(mut base: Mapping, overlay: Mapping) -> Mapping {
    for (key, overlay_val) in overlay {
        if let Value::Mapping(overlay_map) = overlay_val {
            if let Some(Value::Mapping(base_map)) = base.get_mut(&key) {
                let merged = deep_merge(std::mem::take(base_map), overlay_map);
                *base_map = merged;
                continue;
            }
            base.insert(key, Value::Mapping(overlay_map));
        } else {
            base.insert(key, overlay_val);
        }
    }
    base
}

/// Merge layers in precedence order: first = lowest, last = highest.
pub fn merge_layers<'a>(layers: impl IntoIterator<Item = &'a Mapping>) -> Mapping {
    layers
        .into_iter()
        .fold(Mapping::new(), |acc, layer| deep_merge(acc, layer.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn disjoint_keys_merge() {
        let base = mapping("host: localhost");
        let overlay = mapping("port: 3000");
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["host"].as_str().unwrap(), "localhost");
        assert_eq!(merged["port"].as_i64().unwrap(), 3000);
    }

    #[test]
    fn same_scalar_key_overlay_wins() {
        let base = mapping("port: 8080");
        let overlay = mapping("port: 3000");
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["port"].as_i64().unwrap(), 3000);
    }

    #[test]
    fn nested_mappings_recurse() {
        let base = mapping(
            r#"
            server:
              default_host: 0.0.0.0
              default_port: 8080
            "#,
        );
        let overlay = mapping(
            r#"
            server:
              default_port: 9000
            "#,
        );
        let merged = deep_merge(base, overlay);
        let server = merged["server"].as_mapping().unwrap();
        assert_eq!(server["default_host"].as_str().unwrap(), "0.0.0.0");
        assert_eq!(server["default_port"].as_i64().unwrap(), 9000);
    }

    #[test]
    fn overlay_scalar_replaces_mapping() {
        let base = mapping("server:\n  default_port: 1\n");
        let overlay = mapping("server: flat_string");
        let merged = deep_merge(base, overlay);
        assert_eq!(merged["server"].as_str().unwrap(), "flat_string");
    }

    #[test]
    fn empty_overlay_returns_base() {
        let base = mapping("port: 8080");
        let merged = deep_merge(base.clone(), Mapping::new());
        assert_eq!(merged, base);
    }

    #[test]
    fn empty_base_returns_overlay() {
        let overlay = mapping("port: 3000");
        let merged = deep_merge(Mapping::new(), overlay.clone());
        assert_eq!(merged, overlay);
    }

    #[test]
    fn merge_layers_last_wins() {
        let defaults = mapping("app:\n  name: bast\n  version: 1.0.0\n");
        let file = mapping("app:\n  name: from-file\n");
        let env = mapping("app:\n  name: from-env\n");
        let merged = merge_layers([&defaults, &file, &env]);
        assert_eq!(merged["app"]["name"].as_str().unwrap(), "from-env");
        assert_eq!(merged["app"]["version"].as_str().unwrap(), "1.0.0");
    }
}
