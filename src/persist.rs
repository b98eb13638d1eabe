//! Config persistence: write the merged view back as YAML.
//!
//! The whole view is written, unknown keys included, so a later `init` from the
//! same file reproduces it. Writes go to a temp file in the target directory and
//! are renamed into place, so a crash never leaves a truncated config behind.
//! Parent directories are created as needed (mode 0700 on unix).

use std::fs::DirBuilder;
use std::io::Write;
use std::path::Path;

use serde_yaml::{Mapping, Value};
use tempfile::NamedTempFile;

use crate::error::ConfigError;

/// Pure function: render a mapping as a YAML document.
pub fn render(mapping: &Mapping) -> Result<String, ConfigError> {
    serde_yaml::to_string(&Value::Mapping(mapping.clone())).map_err(ConfigError::SerializeError)
}

/// Create `dir` and any missing parents.
pub fn create_dir(dir: &Path) -> Result<(), ConfigError> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }
    builder.create(dir).map_err(|e| ConfigError::WriteError {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Atomically replace `path` with `content`.
pub fn write_atomic(path: &Path, content: &str) -> Result<(), ConfigError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    create_dir(dir)?;

    let write_err = |source: std::io::Error| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(content.as_bytes()).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Render `mapping` and write it to `path`.
pub fn save_mapping(path: &Path, mapping: &Mapping) -> Result<(), ConfigError> {
    let content = render(mapping)?;
    write_atomic(path, &content)?;
    tracing::debug!(path = %path.display(), "Saved configuration");
    Ok(())
}
