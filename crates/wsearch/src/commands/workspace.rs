//! Config and workspace resolution shared by `serve` and `grep`

use anyhow::{Context, Result};
use std::path::PathBuf;
use wsearch_core::WorkspaceRoot;
use wsearch_core::config::{Config, consts};

use crate::cli::WorkspaceArgs;

pub struct Resolved {
    pub config: Config,
    pub root: WorkspaceRoot,
}

/// Flags win over the config file, the config file over defaults.
///
/// # Errors
///
/// Returns an error if:
/// - An explicit config file cannot be read or parsed
/// - The workspace root is missing or not a directory
pub fn resolve(args: &WorkspaceArgs) -> Result<Resolved> {
    let config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_or_default(consts::server::CONFIG_FILE)?,
    };

    let root = match args.root.clone().or_else(|| config.server.root.clone()) {
        Some(root) => root,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let root = open_root(root)?;

    Ok(Resolved { config, root })
}

fn open_root(path: PathBuf) -> Result<WorkspaceRoot> {
    WorkspaceRoot::open(&path).with_context(|| format!("Cannot search {}", path.display()))
}
