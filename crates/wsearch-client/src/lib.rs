//! Client side of workspace search: one outstanding query per
//! [`SearchClient`], a fresh connection per submission, and a
//! [`SearchView`] that only ever shows the latest submission's outcome.

mod client;
mod render;
mod view;

pub use client::SearchClient;
pub use render::render;
pub use view::{SearchFailure, SearchStatus, SearchView, ViewEvent};
