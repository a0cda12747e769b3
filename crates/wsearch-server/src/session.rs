use std::net::SocketAddr;
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use wsearch_core::protocol::{self, Frame, ServerMessage};
use wsearch_core::{SearchOutcome, WsearchError, search_workspace};

use crate::context::ServerContext;

/// What the session does with one incoming transport message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Ignore,
    Reply(ServerMessage),
    Search { query: String, id: Option<u64> },
    Close,
}

/// Classify a text payload
pub fn handle_text(text: &str) -> Action {
    match protocol::decode_frame(text) {
        Frame::Search { query, id } => Action::Search { query, id },
        Frame::Other(kind) => {
            tracing::trace!("Ignoring message of type {:?}", kind);
            Action::Ignore
        }
        Frame::Malformed(reason) => Action::Reply(ServerMessage::malformed(reason)),
    }
}

pub fn handle_message(message: Message) -> Action {
    match message {
        Message::Text(text) => handle_text(text.as_str()),
        Message::Binary(bytes) => match std::str::from_utf8(&bytes) {
            Ok(text) => handle_text(text),
            Err(_) => Action::Reply(ServerMessage::malformed("Invalid message type")),
        },
        Message::Close(_) => Action::Close,
        // Ping/Pong are answered by the transport
        _ => Action::Ignore,
    }
}

/// Map a finished walk to the reply sent to the client.
///
/// Cancelled walks were superseded and produce no reply.
pub fn reply_for(
    id: Option<u64>,
    result: Result<wsearch_core::Result<SearchOutcome>, tokio::task::JoinError>,
) -> Option<ServerMessage> {
    match result {
        Ok(Ok(outcome)) => {
            if !outcome.skipped.is_empty() {
                tracing::debug!("{} files skipped during search", outcome.skipped.len());
            }
            Some(ServerMessage::Results {
                id,
                results: outcome.matches,
                truncated: outcome.truncated,
            })
        }
        Ok(Err(WsearchError::Cancelled)) => None,
        Ok(Err(e @ WsearchError::SearchTimedOut { .. })) => {
            tracing::warn!("{}", e);
            Some(ServerMessage::error(id, protocol::SEARCH_TIMEOUT, e.to_string()))
        }
        Ok(Err(e)) => {
            tracing::warn!("Search failed: {}", e);
            Some(ServerMessage::error(id, protocol::INTERNAL_ERROR, e.to_string()))
        }
        Err(e) => Some(ServerMessage::error(
            id,
            protocol::INTERNAL_ERROR,
            format!("Search task panicked: {}", e),
        )),
    }
}

struct Completed {
    generation: u64,
    reply: Option<ServerMessage>,
}

/// Drive one connection until the peer leaves or `shutdown` fires.
///
/// A new `search` cancels the walk still running for this session; only the
/// latest search is answered.
pub async fn run_session<S>(
    ws: WebSocketStream<S>,
    ctx: Arc<ServerContext>,
    peer: SocketAddr,
    shutdown: CancellationToken,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (mut sink, mut stream) = ws.split();
    let (done_tx, mut done_rx) = mpsc::channel::<Completed>(4);
    let mut generation = 0u64;
    let mut active: Option<CancellationToken> = None;

    tracing::debug!("Session opened for {}", peer);

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            frame = stream.next() => {
                let message = match frame {
                    Some(Ok(m)) => m,
                    Some(Err(e)) => {
                        tracing::debug!("Connection error from {}: {}", peer, e);
                        break;
                    }
                    None => break,
                };

                match handle_message(message) {
                    Action::Ignore => {}
                    Action::Close => break,
                    Action::Reply(reply) => {
                        if sink.send(Message::text(reply.to_json())).await.is_err() {
                            break;
                        }
                    }
                    Action::Search { query, id } => {
                        if let Some(previous) = active.take() {
                            previous.cancel();
                        }
                        generation += 1;
                        let token = shutdown.child_token();
                        active = Some(token.clone());
                        tracing::debug!("Search #{} from {}: {:?}", generation, peer, query);
                        spawn_search(ctx.clone(), query, id, generation, token, done_tx.clone());
                    }
                }
            }
            Some(done) = done_rx.recv() => {
                if done.generation != generation {
                    continue;
                }
                active = None;
                if let Some(reply) = done.reply
                    && sink.send(Message::text(reply.to_json())).await.is_err()
                {
                    break;
                }
            }
        }
    }

    if let Some(token) = active {
        token.cancel();
    }
    let _ = sink.close().await;
    tracing::debug!("Session closed for {}", peer);
}

fn spawn_search(
    ctx: Arc<ServerContext>,
    query: String,
    id: Option<u64>,
    generation: u64,
    token: CancellationToken,
    done_tx: mpsc::Sender<Completed>,
) {
    tokio::spawn(async move {
        let result = tokio::task::spawn_blocking(move || {
            search_workspace(&ctx.root, &query, &ctx.limits, &token)
        })
        .await;
        let reply = reply_for(id, result);
        let _ = done_tx.send(Completed { generation, reply }).await;
    });
}
