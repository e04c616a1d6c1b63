//! Unified path management for Streamfront files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/streamfront/       # Config directory (platform specific)
//! ├── config.toml              # Client configuration
//! └── session.json             # Persisted session (token + user)
//! ```

use std::path::PathBuf;

const APP_DIR_NAME: &str = "streamfront";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Config directory could not be determined.
    ConfigDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::ConfigDirNotFound => write!(f, "Cannot find config directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Path resolution for Streamfront.
///
/// With `base_dir = None` the platform config directory is used
/// (`~/.config/streamfront` on Linux, `~/Library/Application Support/streamfront`
/// on macOS, `%APPDATA%\streamfront` on Windows). Passing a base directory
/// roots every path there instead, which is how tests isolate themselves.
#[derive(Debug, Clone, Default)]
pub struct StreamfrontPaths {
    base_dir: Option<PathBuf>,
}

impl StreamfrontPaths {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Returns the Streamfront configuration directory.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_dir {
            Some(base) => Ok(base.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join(APP_DIR_NAME))
                .ok_or(PathError::ConfigDirNotFound),
        }
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the default path of the persisted session.
    ///
    /// # Security Note
    ///
    /// The file holds a bearer credential; it is created with mode 600 on Unix.
    pub fn session_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("session.json"))
    }
}
