//! WebSocket front end for the workspace search engine.
//!
//! [`SearchServer`] accepts connections and runs one [`session`] per
//! connection. Each session answers `search` messages with a single
//! `results` message and ignores message types owned by other features.

pub mod context;
pub mod server;
pub mod session;

pub use context::ServerContext;
pub use server::SearchServer;
