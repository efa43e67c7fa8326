//! Which test case is on screen

use crate::index::HistoryIndex;
use chrono::{DateTime, Utc};
use tracing::debug;

/// Current test case and the feed's last update time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionState {
    current: Option<String>,
    last_updated: Option<DateTime<Utc>>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the first indexed test case and record the feed's update time
    pub fn initialize(&mut self, index: &HistoryIndex) {
        self.current = index.first_key().map(str::to_string);
        self.last_updated = Some(index.last_update());
    }

    /// Switch to `key` if the index knows it.
    ///
    /// Returns `true` when the current key changed. Unknown keys leave the
    /// state untouched.
    pub fn select(&mut self, index: &HistoryIndex, key: &str) -> bool {
        if !index.contains(key) {
            debug!("Ignoring selection of unknown test case {:?}", key);
            return false;
        }

        if self.current.as_deref() == Some(key) {
            return false;
        }

        self.current = Some(key.to_string());
        true
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Whether [`initialize`](Self::initialize) has run
    pub fn is_initialized(&self) -> bool {
        self.last_updated.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::tests::{bench, entry, feed};

    fn index() -> HistoryIndex {
        HistoryIndex::build(&feed(vec![
            entry("a1", 1, vec![bench("parse", 1.0), bench("minify", 2.0)]),
            entry("b2", 2, vec![bench("parse", 3.0)]),
        ]))
    }

    #[test]
    fn test_initialize_picks_first_key() {
        let index = index();
        let mut state = SelectionState::new();
        assert!(!state.is_initialized());

        state.initialize(&index);

        assert!(state.is_initialized());
        assert_eq!(state.current(), Some("parse"));
        assert_eq!(state.last_updated(), Some(index.last_update()));
    }

    #[test]
    fn test_select_known_key() {
        let index = index();
        let mut state = SelectionState::new();
        state.initialize(&index);

        assert!(state.select(&index, "minify"));
        assert_eq!(state.current(), Some("minify"));

        // same key again is not a change
        assert!(!state.select(&index, "minify"));
    }

    #[test]
    fn test_select_unknown_key_is_noop() {
        let index = index();
        let mut state = SelectionState::new();
        state.initialize(&index);
        let before = state.clone();

        assert!(!state.select(&index, "codegen"));
        assert!(!state.select(&index, ""));
        assert_eq!(state, before);
    }

    #[test]
    fn test_initialize_empty_index() {
        let index = HistoryIndex::build(&feed(Vec::new()));
        let mut state = SelectionState::new();
        state.initialize(&index);

        assert!(state.is_initialized());
        assert_eq!(state.current(), None);
    }
}
