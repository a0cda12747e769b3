//! Default values shared by the server, the client and the CLI

/// Transport defaults
pub mod server {
    /// Address the listener binds to when nothing else is configured
    pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

    /// Config file looked up in the current directory
    pub const CONFIG_FILE: &str = "wsearch.toml";
}

/// Limits applied to a single search
pub mod search {
    /// Maximum number of matches returned by one search
    pub const MAX_MATCHES: usize = 5_000;

    /// Maximum number of files scanned by one search
    pub const MAX_SCAN_FILES: usize = 20_000;

    /// Files larger than this are skipped (1 MiB)
    pub const MAX_FILE_BYTES: u64 = 1024 * 1024;

    /// Deepest directory level the walk descends into
    pub const MAX_DEPTH: usize = 64;

    /// Wall-clock budget for one walk
    pub const TIMEOUT_MS: u64 = 10_000;

    /// Bytes inspected for NUL when sniffing binary content
    pub const BINARY_SNIFF_BYTES: usize = 8 * 1024;
}
