use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use wsearch_core::Result;

use crate::context::ServerContext;
use crate::session::run_session;

/// Accepts WebSocket connections and spawns one session per connection
pub struct SearchServer {
    listener: TcpListener,
    context: Arc<ServerContext>,
}

impl SearchServer {
    /// Bind the listener; use port 0 to let the OS pick one
    pub async fn bind(addr: &str, context: ServerContext) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            context: Arc::new(context),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until `shutdown` is cancelled; open sessions are closed with it
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        tracing::info!(
            "Serving {} on ws://{}",
            self.context.root.path().display(),
            self.local_addr()?
        );

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = self.listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        let context = self.context.clone();
                        let token = shutdown.child_token();
                        tokio::spawn(handle_connection(stream, peer, context, token));
                    }
                    Err(e) => {
                        tracing::warn!("Failed to accept connection: {}", e);
                    }
                },
            }
        }

        tracing::info!("Search server stopped");
        Ok(())
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    context: Arc<ServerContext>,
    shutdown: CancellationToken,
) {
    match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => run_session(ws, context, peer, shutdown).await,
        Err(e) => tracing::debug!("WebSocket handshake with {} failed: {}", peer, e),
    }
}
