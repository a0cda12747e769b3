use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use wsearch_server::{SearchServer, ServerContext};

use super::workspace::resolve;
use crate::cli::ServeArgs;

/// Run the search server until Ctrl-C
pub fn run(args: ServeArgs) -> Result<()> {
    // An invalid root is fatal here, before any connection is accepted
    let resolved = resolve(&args.workspace)?;
    let bind = args
        .bind
        .unwrap_or_else(|| resolved.config.server.bind.clone());
    let context = ServerContext::new(resolved.root, resolved.config.search);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?;

    rt.block_on(async move {
        let server = SearchServer::bind(&bind, context)
            .await
            .with_context(|| format!("Failed to bind {}", bind))?;

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    log::info!("Shutting down");
                    signal.cancel();
                }
                Err(e) => log::warn!("Cannot listen for Ctrl-C: {}", e),
            }
        });

        server.run(shutdown).await?;
        Ok(())
    })
}
