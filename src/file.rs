//! File discovery and loading for config files.
//!
//! # Discovery
//!
//! Each [`SearchPath`] resolves to one directory. The candidates are
//! `{dir}/{file_name}` in the order the search paths are listed, and the
//! **first existing file wins**. For bast the default order is:
//!
//! 1. `~/.bast/config.yaml`
//! 2. `./config.yaml`
//! 3. `./config/config.yaml`
//!
//! An explicit path (the `--config` flag) replaces the search entirely.
//!
//! Missing files are not an error: the reader reports
//! [`ConfigError::FileNotFound`] and discovery moves on, ending with no file
//! layer at all. Only actual I/O errors (permissions, a directory where a
//! file should be) are propagated.
//!
//! # Persistence
//!
//! [`resolve_persist_path`] resolves the [`SearchPath`] that `save` writes to.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::types::SearchPath;

/// The user's home directory, if the platform can tell us.
pub fn home_dir() -> Option<PathBuf> {
    directories::UserDirs::new().map(|user| user.home_dir().to_path_buf())
}

/// Resolve a [`SearchPath`] to a concrete directory.
///
/// Returns `None` if the path cannot be resolved (e.g. no home directory found).
pub fn resolve_search_path(sp: &SearchPath) -> Option<PathBuf> {
    match sp {
        SearchPath::Home(subdir) => home_dir().map(|home| home.join(subdir)),
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Candidate file paths in search order. Unresolvable search paths are skipped.
pub fn candidate_files(search_paths: &[SearchPath], file_name: &str) -> Vec<PathBuf> {
    search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp).map(|dir| dir.join(file_name)))
        .collect()
}

/// Read a config file. A missing file is reported as [`ConfigError::FileNotFound`].
pub fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Locate and read the config file.
///
/// With `explicit`, only that path is tried. Otherwise the candidates from
/// `search_paths` are tried in order and the first existing one is returned.
pub fn locate_config_file(
    explicit: Option<&Path>,
    search_paths: &[SearchPath],
    file_name: &str,
) -> Result<Option<(PathBuf, String)>, ConfigError> {
    let candidates = match explicit {
        Some(path) => vec![path.to_path_buf()],
        None => candidate_files(search_paths, file_name),
    };
    load_first_match(&candidates)
}

fn load_first_match(candidates: &[PathBuf]) -> Result<Option<(PathBuf, String)>, ConfigError> {
    for path in candidates {
        match read_config_file(path) {
            Ok(content) => return Ok(Some((path.clone(), content))),
            Err(e) if e.is_not_found() => {
                tracing::debug!(path = %path.display(), "No config file here");
                continue;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(None)
}

/// Resolve the file `save` writes to.
pub fn resolve_persist_path(persist: &SearchPath, file_name: &str) -> Result<PathBuf, ConfigError> {
    match persist {
        SearchPath::Home(_) => resolve_search_path(persist)
            .map(|dir| dir.join(file_name))
            .ok_or(ConfigError::HomeDirUnresolvable),
        SearchPath::Cwd => std::env::current_dir()
            .map(|dir| dir.join(file_name))
            .map_err(|e| ConfigError::WriteError {
                path: PathBuf::from("."),
                source: e,
            }),
        SearchPath::Path(p) => Ok(p.join(file_name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn resolve_explicit_path() {
        let p = PathBuf::from("/tmp/bast");
        assert_eq!(resolve_search_path(&SearchPath::Path(p.clone())), Some(p));
    }

    #[test]
    fn candidates_follow_search_order() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        let paths = vec![
            SearchPath::Path(a.path().to_path_buf()),
            SearchPath::Path(b.path().to_path_buf()),
        ];
        let files = candidate_files(&paths, "config.yaml");
        assert_eq!(
            files,
            vec![a.path().join("config.yaml"), b.path().join("config.yaml")]
        );
    }

    #[test]
    fn read_missing_is_file_not_found() {
        let dir = TempDir::new().unwrap();
        let result = read_config_file(&dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
    }

    #[test]
    fn read_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let result = read_config_file(dir.path());
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn locate_no_files_exist() {
        let dir = TempDir::new().unwrap();
        let paths = vec![SearchPath::Path(dir.path().to_path_buf())];
        let found = locate_config_file(None, &paths, "config.yaml").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn locate_first_existing_wins() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(first.path().join("config.yaml"), "app:\n  name: first\n").unwrap();
        fs::write(second.path().join("config.yaml"), "app:\n  name: second\n").unwrap();

        let paths = vec![
            SearchPath::Path(first.path().to_path_buf()),
            SearchPath::Path(second.path().to_path_buf()),
        ];
        let (path, content) = locate_config_file(None, &paths, "config.yaml")
            .unwrap()
            .unwrap();
        assert_eq!(path, first.path().join("config.yaml"));
        assert!(content.contains("first"));
    }

    #[test]
    fn locate_falls_through_missing_candidates() {
        let empty = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("config.yaml"), "app:\n  name: second\n").unwrap();

        let paths = vec![
            SearchPath::Path(empty.path().to_path_buf()),
            SearchPath::Path(second.path().to_path_buf()),
        ];
        let (_, content) = locate_config_file(None, &paths, "config.yaml")
            .unwrap()
            .unwrap();
        assert!(content.contains("second"));
    }

    #[test]
    fn explicit_path_skips_search() {
        let searched = TempDir::new().unwrap();
        fs::write(searched.path().join("config.yaml"), "app:\n  name: searched\n").unwrap();
        let other = TempDir::new().unwrap();
        let explicit = other.path().join("custom.yaml");
        fs::write(&explicit, "app:\n  name: explicit\n").unwrap();

        let paths = vec![SearchPath::Path(searched.path().to_path_buf())];
        let (path, content) = locate_config_file(Some(&explicit), &paths, "config.yaml")
            .unwrap()
            .unwrap();
        assert_eq!(path, explicit);
        assert!(content.contains("explicit"));
    }

    #[test]
    fn explicit_missing_path_is_none() {
        let searched = TempDir::new().unwrap();
        fs::write(searched.path().join("config.yaml"), "app:\n  name: searched\n").unwrap();
        let paths = vec![SearchPath::Path(searched.path().to_path_buf())];
        let missing = PathBuf::from("/tmp/nonexistent-bast-config-12345.yaml");
        let found = locate_config_file(Some(&missing), &paths, "config.yaml").unwrap();
        assert!(found.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_file_returns_read_error() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("config.yaml");
        fs::write(&file_path, "app:\n  name: x\n").unwrap();
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o000)).unwrap();

        let paths = vec![SearchPath::Path(dir.path().to_path_buf())];
        let result = locate_config_file(None, &paths, "config.yaml");

        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o644)).unwrap();

        // Root can read anything; only assert when the permission bit was honoured.
        if let Err(e) = result {
            assert!(matches!(e, ConfigError::ReadError { .. }));
        }
    }

    #[test]
    fn persist_path_explicit() {
        let p = PathBuf::from("/tmp/configs");
        let result = resolve_persist_path(&SearchPath::Path(p.clone()), "config.yaml");
        assert_eq!(result.unwrap(), p.join("config.yaml"));
    }

    #[test]
    fn persist_path_home_ends_with_dir_and_file() {
        if home_dir().is_none() {
            return;
        }
        let path = resolve_persist_path(&SearchPath::Home(".bast".into()), "config.yaml").unwrap();
        assert!(path.ends_with(".bast/config.yaml"));
    }
}
