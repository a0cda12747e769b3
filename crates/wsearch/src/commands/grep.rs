use anyhow::Result;
use tokio_util::sync::CancellationToken;
use wsearch_core::protocol::ServerMessage;
use wsearch_core::search_workspace;

use super::workspace::resolve;
use crate::cli::WorkspaceArgs;
use crate::output;

/// Search the workspace in-process and print matches
pub fn run(query: &str, workspace: WorkspaceArgs, json: bool) -> Result<()> {
    let resolved = resolve(&workspace)?;
    let outcome = search_workspace(
        &resolved.root,
        query,
        &resolved.config.search,
        &CancellationToken::new(),
    )?;

    for skipped in &outcome.skipped {
        log::debug!("Skipped {} ({:?})", skipped.file, skipped.reason);
    }
    if outcome.truncated {
        log::warn!("Search stopped early; results are incomplete");
    }

    if json {
        let message = ServerMessage::Results {
            id: None,
            results: outcome.matches,
            truncated: outcome.truncated,
        };
        output::print_json(&message.to_json())?;
    } else {
        output::print_matches(&outcome.matches)?;
    }

    Ok(())
}
