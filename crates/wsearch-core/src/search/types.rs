use serde::{Deserialize, Serialize};

/// One line in one file that contains the query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Path relative to the workspace root
    pub file: String,
    /// 1-based line number
    pub line: usize,
    /// Line text with surrounding whitespace trimmed
    pub preview: String,
}

/// Why a file was left out of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    TooLarge,
    Binary,
    Unreadable,
    Symlink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: SkipReason,
}

/// Result of one walk over the workspace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub matches: Vec<Match>,
    /// A scan or match cap stopped the walk early
    pub truncated: bool,
    pub scanned_files: usize,
    /// Files skipped by the read policy; soft warnings only
    pub skipped: Vec<SkippedFile>,
}
