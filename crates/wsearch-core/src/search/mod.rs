//! Workspace full-text search
//!
//! The engine walks a validated [`WorkspaceRoot`] depth-first with entries
//! sorted by file name, reads every regular text file and reports each line
//! containing the query as a case-insensitive substring.

mod engine;
mod matcher;
mod root;
mod types;

pub use engine::search_workspace;
pub use matcher::{LineMatcher, classify_content};
pub use root::WorkspaceRoot;
pub use types::{Match, SearchOutcome, SkipReason, SkippedFile};
