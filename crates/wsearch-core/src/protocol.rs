//! Wire messages for the `search` / `results` exchange.
//!
//! Frames are JSON text. The same connection may carry messages owned by
//! other features, so [`decode_frame`] classifies instead of failing: only
//! payloads that are not JSON at all, or that claim to be a `search` without
//! a string `query`, are reported as malformed.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::search::Match;

pub const MALFORMED_MESSAGE: &str = "MALFORMED_MESSAGE";
pub const SEARCH_TIMEOUT: &str = "SEARCH_TIMEOUT";
pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";

/// Client → server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Search {
        query: String,
        /// Request tag; anything other than an unsigned integer is dropped
        #[serde(
            default,
            deserialize_with = "lenient_id",
            skip_serializing_if = "Option::is_none"
        )]
        id: Option<u64>,
    },
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_u64())
}

/// Server → client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Results {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
        results: Vec<Match>,
        #[serde(default, skip_serializing_if = "is_false")]
        truncated: bool,
    },
    Error {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        id: Option<u64>,
        code: String,
        error: String,
    },
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl ServerMessage {
    pub fn error(id: Option<u64>, code: &str, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            id,
            code: code.to_string(),
            error: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::error(None, MALFORMED_MESSAGE, message)
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            ServerMessage::Results { id, .. } | ServerMessage::Error { id, .. } => *id,
        }
    }

    pub fn to_json(&self) -> String {
        // Serializing these variants cannot fail: all keys are strings
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }
}

/// A text frame as seen by the search handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Search { query: String, id: Option<u64> },
    /// Valid JSON owned by some other handler (or untyped)
    Other(Option<String>),
    Malformed(String),
}

pub fn decode_frame(text: &str) -> Frame {
    let value: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(_) => return Frame::Malformed("Invalid JSON".to_string()),
    };

    let kind = value.get("type").and_then(Value::as_str).map(str::to_string);
    if kind.as_deref() != Some("search") {
        return Frame::Other(kind);
    }

    match serde_json::from_value::<ClientMessage>(value) {
        Ok(ClientMessage::Search { query, id }) => Frame::Search { query, id },
        Err(e) => Frame::Malformed(format!("Invalid search message: {}", e)),
    }
}
