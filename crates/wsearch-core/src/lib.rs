// Core modules
pub mod config;
pub mod error;
pub mod protocol;
pub mod search;

// Re-export commonly used types
pub use error::{Result, WsearchError};
pub use search::{Match, SearchOutcome, WorkspaceRoot, search_workspace};
