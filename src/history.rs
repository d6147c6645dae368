//! Navigable-location stand-in.
//!
//! Plays the role of the browser URL bar and history stack: the initial
//! querystring is read once at page construction (it seeds the filter
//! state), and every successful results fetch pushes the freshly serialized
//! form state, without any reload semantics.

use std::cell::RefCell;
use std::rc::Rc;

/// A cheaply clonable handle on the page's location history.
///
/// Cloning aliases the same history; the search form holds one handle, the
/// page another.
#[derive(Debug, Clone)]
pub struct History {
    inner: Rc<RefCell<HistoryData>>,
}

#[derive(Debug)]
struct HistoryData {
    path: String,
    initial_query: String,
    entries: Vec<String>,
}

impl History {
    /// Create a history positioned at `path` with the load-time
    /// querystring.
    pub fn new(path: impl Into<String>, initial_query: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(HistoryData {
                path: path.into(),
                initial_query: initial_query.into(),
                entries: Vec::new(),
            })),
        }
    }

    /// The page path (the fallback form target).
    pub fn path(&self) -> String {
        self.inner.borrow().path.clone()
    }

    /// The current querystring: the most recently pushed state, or the
    /// load-time querystring when nothing has been pushed yet.
    pub fn current_query(&self) -> String {
        let data = self.inner.borrow();
        data.entries
            .last()
            .cloned()
            .unwrap_or_else(|| data.initial_query.clone())
    }

    /// Push a serialized state (the `pushState` stand-in).
    pub fn push(&self, query: impl Into<String>) {
        let query = query.into();
        tracing::debug!(query = %query, "push history state");
        self.inner.borrow_mut().entries.push(query);
    }

    /// Every pushed state, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.inner.borrow().entries.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_query_starts_at_load_time_state() {
        let history = History::new("/books/", "query=balzac");
        assert_eq!(history.current_query(), "query=balzac");
    }

    #[test]
    fn pushes_become_current_in_order() {
        let history = History::new("/books/", "");
        history.push("query=balzac");
        history.push("query=balzac&page=2");

        assert_eq!(history.current_query(), "query=balzac&page=2");
        assert_eq!(
            history.entries(),
            vec!["query=balzac".to_string(), "query=balzac&page=2".to_string()]
        );
    }

    #[test]
    fn clones_alias_the_same_history() {
        let history = History::new("/books/", "");
        let alias = history.clone();
        alias.push("page=2");
        assert_eq!(history.current_query(), "page=2");
    }
}
