use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::consts;
use crate::error::{Result, WsearchError};

/// wsearch.toml schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub search: SearchLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Workspace root; the current directory when unset
    #[serde(default)]
    pub root: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            root: None,
        }
    }
}

/// Bounds applied to every search
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    #[serde(default = "default_max_matches")]
    pub max_matches: usize,
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Directory names never descended into (e.g. "node_modules")
    #[serde(default)]
    pub exclude_dirs: Vec<String>,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_matches: default_max_matches(),
            max_files: default_max_files(),
            max_file_bytes: default_max_file_bytes(),
            max_depth: default_max_depth(),
            timeout_ms: default_timeout_ms(),
            exclude_dirs: Vec::new(),
        }
    }
}

impl SearchLimits {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Reject limits that would make every search return nothing
    pub fn validate(&self) -> Result<()> {
        let zero = |field: &str| WsearchError::ConfigInvalidValue {
            field: field.to_string(),
            reason: "must be greater than zero".to_string(),
        };
        if self.max_matches == 0 {
            return Err(zero("search.max_matches"));
        }
        if self.max_files == 0 {
            return Err(zero("search.max_files"));
        }
        if self.max_depth == 0 {
            return Err(zero("search.max_depth"));
        }
        if self.timeout_ms == 0 {
            return Err(zero("search.timeout_ms"));
        }
        Ok(())
    }
}

fn default_bind() -> String {
    consts::server::DEFAULT_BIND.to_string()
}

fn default_max_matches() -> usize {
    consts::search::MAX_MATCHES
}

fn default_max_files() -> usize {
    consts::search::MAX_SCAN_FILES
}

fn default_max_file_bytes() -> u64 {
    consts::search::MAX_FILE_BYTES
}

fn default_max_depth() -> usize {
    consts::search::MAX_DEPTH
}

fn default_timeout_ms() -> u64 {
    consts::search::TIMEOUT_MS
}

impl Config {
    /// Read wsearch.toml
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| WsearchError::ConfigParseError(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| WsearchError::ConfigParseError(e.to_string()))?;
        config.search.validate()?;
        Ok(config)
    }

    /// Read the file when it exists, otherwise fall back to defaults
    pub fn load_or_default(path: impl AsRef<std::path::Path>) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}
