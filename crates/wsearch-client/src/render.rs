use crate::view::{SearchFailure, SearchStatus, SearchView};

/// Text rendering of the search panel
pub fn render(view: &SearchView) -> String {
    match &view.status {
        SearchStatus::Idle => String::new(),
        SearchStatus::Loading => "Searching...".to_string(),
        SearchStatus::Ready if view.results.is_empty() => "No results".to_string(),
        SearchStatus::Ready => {
            let mut out = String::new();
            for m in &view.results {
                out.push_str(&format!("{}:{}\n    {}\n", m.file, m.line, m.preview));
            }
            if view.truncated {
                out.push_str("(results truncated)\n");
            }
            out.trim_end().to_string()
        }
        SearchStatus::Failed(SearchFailure::ConnectionLost(reason)) => {
            format!("Search did not complete: {}", reason)
        }
        SearchStatus::Failed(SearchFailure::Server { code, message }) => {
            format!("Search failed ({}): {}", code, message)
        }
    }
}
