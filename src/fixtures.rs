#[cfg(test)]
pub mod test {
    use serde_yaml::Mapping;

    use crate::defaults::default_table;
    use crate::settings::BastConfig;

    /// A complete config file with every section overridden.
    pub const FULL_YAML: &str = r#"
app:
  name: from-file
  version: 2.0.0
  description: file description
  author: someone
logging:
  level: debug
  format: json
server:
  default_port: 3000
  default_host: 127.0.0.1
  timeout: 10
features:
  auto_update: true
  verbose: true
"#;

    /// A sparse file touching two keys.
    pub const SPARSE_YAML: &str = "server:\n  default_port: 3000\napp:\n  name: sparse\n";

    /// A file carrying keys the snapshot does not know.
    pub const EXTRA_KEYS_YAML: &str =
        "server:\n  default_port: 4000\n  proxy: squid\nplugins:\n  path: /opt/bast\n";

    pub const INVALID_YAML: &str = "server:\n  default_port: [3000\n";

    pub fn defaults() -> Mapping {
        default_table::<BastConfig>().unwrap()
    }

    pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn fixtures_parse() {
        for doc in [FULL_YAML, SPARSE_YAML, EXTRA_KEYS_YAML] {
            let parsed: Mapping = serde_yaml::from_str(doc).unwrap();
            assert!(!parsed.is_empty());
        }
        assert!(serde_yaml::from_str::<Mapping>(INVALID_YAML).is_err());
    }
}
