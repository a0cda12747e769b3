use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;
use wsearch_core::protocol::{ClientMessage, ServerMessage};

use crate::view::{SearchView, ViewEvent};

const CLOSED_EARLY: &str = "connection closed before results arrived";

/// Owns one outstanding query against a search server.
///
/// Every [`submit`](Self::submit) opens a fresh connection and closes the
/// previous one; the last submission wins. Must be used inside a tokio
/// runtime.
pub struct SearchClient {
    url: String,
    view: Arc<watch::Sender<SearchView>>,
    generation: u64,
    active: Option<CancellationToken>,
}

impl SearchClient {
    pub fn new(url: impl Into<String>) -> Self {
        let (view, _) = watch::channel(SearchView::default());
        Self {
            url: url.into(),
            view: Arc::new(view),
            generation: 0,
            active: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchView> {
        self.view.subscribe()
    }

    pub fn view(&self) -> SearchView {
        self.view.borrow().clone()
    }

    /// Supersede any pending search and start a new one; returns its generation
    pub fn submit(&mut self, query: &str) -> u64 {
        if let Some(previous) = self.active.take() {
            previous.cancel();
        }

        self.generation += 1;
        let generation = self.generation;
        self.view.send_modify(|view| view.begin(generation, query));

        let token = CancellationToken::new();
        self.active = Some(token.clone());
        tokio::spawn(run_submission(
            self.url.clone(),
            query.to_string(),
            generation,
            token,
            self.view.clone(),
        ));

        generation
    }

    /// Wait until the current submission is no longer loading
    pub async fn settled(&self) -> SearchView {
        let mut rx = self.view.subscribe();
        match rx.wait_for(|view| !view.is_loading()).await {
            Ok(view) => view.clone(),
            Err(_) => self.view(),
        }
    }
}

impl Drop for SearchClient {
    fn drop(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }
}

async fn run_submission(
    url: String,
    query: String,
    generation: u64,
    token: CancellationToken,
    view: Arc<watch::Sender<SearchView>>,
) {
    if let Some(event) = exchange(&url, query, generation, &token).await {
        view.send_modify(|view| {
            if !view.apply(generation, event) {
                tracing::debug!("Dropped outcome of superseded search #{}", generation);
            }
        });
    }
}

/// Run one request/response exchange; `None` when superseded
async fn exchange(
    url: &str,
    query: String,
    generation: u64,
    token: &CancellationToken,
) -> Option<ViewEvent> {
    let connected = tokio::select! {
        _ = token.cancelled() => return None,
        connected = connect_async(url) => connected,
    };
    let mut ws = match connected {
        Ok((ws, _)) => ws,
        Err(e) => {
            tracing::debug!("Failed to connect to {}: {}", url, e);
            return Some(ViewEvent::ConnectionLost(e.to_string()));
        }
    };

    let request = ClientMessage::Search {
        query,
        id: Some(generation),
    };
    let payload = match serde_json::to_string(&request) {
        Ok(p) => p,
        Err(e) => return Some(ViewEvent::ConnectionLost(e.to_string())),
    };
    if let Err(e) = ws.send(Message::text(payload)).await {
        return Some(ViewEvent::ConnectionLost(e.to_string()));
    }

    loop {
        tokio::select! {
            _ = token.cancelled() => {
                let _ = ws.close(None).await;
                return None;
            }
            frame = ws.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(event) = interpret(text.as_str(), generation) {
                        let _ = ws.close(None).await;
                        return Some(event);
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    return Some(ViewEvent::ConnectionLost(CLOSED_EARLY.to_string()));
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Some(ViewEvent::ConnectionLost(e.to_string())),
            },
        }
    }
}

/// Turn a text frame into a view event; unknown or foreign frames are ignored
pub(crate) fn interpret(text: &str, generation: u64) -> Option<ViewEvent> {
    let message: ServerMessage = serde_json::from_str(text).ok()?;
    if message.id().is_some_and(|id| id != generation) {
        return None;
    }
    match message {
        ServerMessage::Results {
            results, truncated, ..
        } => Some(ViewEvent::Results { results, truncated }),
        ServerMessage::Error { code, error, .. } => Some(ViewEvent::ServerError {
            code,
            message: error,
        }),
    }
}
