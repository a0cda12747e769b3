use wsearch_core::Match;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchFailure {
    /// Transport closed or failed before results arrived
    ConnectionLost(String),
    /// The server answered with an error message
    Server { code: String, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(SearchFailure),
}

/// Something that happened on the connection of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Results { results: Vec<Match>, truncated: bool },
    ServerError { code: String, message: String },
    ConnectionLost(String),
}

/// What the search panel displays
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchView {
    /// Submission the view belongs to; 0 before the first submit
    pub generation: u64,
    pub query: String,
    pub status: SearchStatus,
    pub results: Vec<Match>,
    pub truncated: bool,
}

impl SearchView {
    pub fn is_loading(&self) -> bool {
        self.status == SearchStatus::Loading
    }

    /// Results or a failure are showing
    pub fn is_settled(&self) -> bool {
        matches!(self.status, SearchStatus::Ready | SearchStatus::Failed(_))
    }

    /// Start a new submission; stale results are cleared immediately
    pub fn begin(&mut self, generation: u64, query: &str) {
        self.generation = generation;
        self.query = query.to_string();
        self.status = SearchStatus::Loading;
        self.results.clear();
        self.truncated = false;
    }

    /// Apply an event from submission `generation`.
    ///
    /// Events from superseded submissions, or arriving after the current one
    /// settled, are dropped. Returns whether the view changed.
    pub fn apply(&mut self, generation: u64, event: ViewEvent) -> bool {
        if generation != self.generation || !self.is_loading() {
            return false;
        }
        match event {
            ViewEvent::Results { results, truncated } => {
                self.results = results;
                self.truncated = truncated;
                self.status = SearchStatus::Ready;
            }
            ViewEvent::ServerError { code, message } => {
                self.results.clear();
                self.status = SearchStatus::Failed(SearchFailure::Server { code, message });
            }
            ViewEvent::ConnectionLost(reason) => {
                self.results.clear();
                self.status = SearchStatus::Failed(SearchFailure::ConnectionLost(reason));
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(file: &str, line: usize) -> Match {
        Match {
            file: file.to_string(),
            line,
            preview: String::from("x"),
        }
    }

    #[test]
    fn test_begin_clears_previous_results() {
        let mut view = SearchView::default();
        view.begin(1, "a");
        view.apply(
            1,
            ViewEvent::Results {
                results: vec![hit("a.txt", 1)],
                truncated: false,
            },
        );
        assert_eq!(view.results.len(), 1);

        view.begin(2, "b");
        assert!(view.is_loading());
        assert!(view.results.is_empty());
        assert_eq!(view.query, "b");
    }

    #[test]
    fn test_results_replace_verbatim() {
        let mut view = SearchView::default();
        view.begin(1, "q");
        let results = vec![hit("z.txt", 9), hit("a.txt", 1)];
        assert!(view.apply(
            1,
            ViewEvent::Results {
                results: results.clone(),
                truncated: true,
            }
        ));
        assert_eq!(view.results, results);
        assert!(view.truncated);
        assert_eq!(view.status, SearchStatus::Ready);
    }

    #[test]
    fn test_stale_generation_discarded() {
        let mut view = SearchView::default();
        view.begin(1, "A");
        view.begin(2, "B");

        let late = ViewEvent::Results {
            results: vec![hit("a.txt", 1)],
            truncated: false,
        };
        assert!(!view.apply(1, late));
        assert!(view.is_loading());
        assert!(view.results.is_empty());

        assert!(view.apply(
            2,
            ViewEvent::Results {
                results: vec![hit("b.txt", 2)],
                truncated: false,
            }
        ));
        assert_eq!(view.results[0].file, "b.txt");
    }

    #[test]
    fn test_close_after_results_keeps_results() {
        let mut view = SearchView::default();
        view.begin(1, "q");
        view.apply(
            1,
            ViewEvent::Results {
                results: vec![hit("a.txt", 1)],
                truncated: false,
            },
        );
        assert!(!view.apply(1, ViewEvent::ConnectionLost("closed".to_string())));
        assert_eq!(view.status, SearchStatus::Ready);
        assert_eq!(view.results.len(), 1);
    }

    #[test]
    fn test_connection_lost_is_terminal_failure() {
        let mut view = SearchView::default();
        view.begin(1, "q");
        view.apply(1, ViewEvent::ConnectionLost("refused".to_string()));
        assert!(view.is_settled());
        assert!(view.results.is_empty());
        assert_eq!(
            view.status,
            SearchStatus::Failed(SearchFailure::ConnectionLost("refused".to_string()))
        );
    }
}
