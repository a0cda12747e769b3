use anyhow::{Context, Result, bail};
use wsearch_client::{SearchClient, SearchStatus, render};

use crate::output;

/// Submit one query to a running server and print the outcome
pub fn run(query: &str, url: &str, json: bool) -> Result<()> {
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    let view = rt.block_on(async {
        let mut client = SearchClient::new(url);
        client.submit(query);
        client.settled().await
    });

    if let SearchStatus::Failed(_) = view.status {
        bail!("{}", render(&view));
    }

    if json {
        output::print_json(&serde_json::to_string(&view.results)?)?;
    } else {
        output::print_text(&render(&view))?;
    }

    Ok(())
}
