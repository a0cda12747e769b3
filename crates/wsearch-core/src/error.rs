use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsearchError {
    // Workspace errors
    #[error("INVALID_ROOT: workspace root '{path}' {reason}")]
    InvalidRoot { path: PathBuf, reason: String },

    // Search errors
    #[error("SEARCH_TIMEOUT: search did not finish within {elapsed_ms} ms")]
    SearchTimedOut { elapsed_ms: u128 },

    #[error("SEARCH_CANCELLED: search was superseded or the session closed")]
    Cancelled,

    // Config errors
    #[error("CONFIG_PARSE_ERROR: {0}")]
    ConfigParseError(String),

    #[error("CONFIG_INVALID_VALUE: {field}: {reason}")]
    ConfigInvalidValue { field: String, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WsearchError>;
