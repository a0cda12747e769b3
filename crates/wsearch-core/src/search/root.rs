use std::path::{Path, PathBuf};

use crate::error::{Result, WsearchError};

/// A directory validated once at startup; the only scope a search may scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRoot {
    path: PathBuf,
}

impl WorkspaceRoot {
    /// Canonicalize `path` and require it to be an existing directory
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let canonical = std::fs::canonicalize(path).map_err(|e| WsearchError::InvalidRoot {
            path: path.to_path_buf(),
            reason: format!("cannot be resolved: {}", e),
        })?;

        if !canonical.is_dir() {
            return Err(WsearchError::InvalidRoot {
                path: path.to_path_buf(),
                reason: "is not a directory".to_string(),
            });
        }

        Ok(Self { path: canonical })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of `entry` relative to the root, always `/`-separated
    pub fn relative(&self, entry: &Path) -> String {
        entry
            .strip_prefix(&self.path)
            .unwrap_or(entry)
            .to_string_lossy()
            .replace('\\', "/")
    }
}
