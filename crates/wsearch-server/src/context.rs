use wsearch_core::WorkspaceRoot;
use wsearch_core::config::SearchLimits;

/// Read-only state shared by every session
#[derive(Clone, Debug)]
pub struct ServerContext {
    pub root: WorkspaceRoot,
    pub limits: SearchLimits,
}

impl ServerContext {
    pub fn new(root: WorkspaceRoot, limits: SearchLimits) -> Self {
        Self { root, limits }
    }
}
