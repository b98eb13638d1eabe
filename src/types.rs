use std::path::PathBuf;

/// Where to search for config files.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// A subdirectory under the user's home directory, e.g. `Home(".bast")`.
    Home(String),
    /// Current working directory.
    Cwd,
    /// An explicit path. Relative paths resolve against the working directory.
    Path(PathBuf),
}

/// A config operation, independent of any CLI framework.
/// The CLI layer converts parsed clap args into this.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigAction {
    List,
    Gen { output: Option<PathBuf> },
    Get { key: String },
    Set { key: String, value: String },
    Reset,
    Init,
}
