//! Keyboard and pointer navigation over a live result list.

use std::sync::Arc;

use crate::search::engine::{SearchEngine, SearchOutcome, SearchQuery, SearchResult};
use crate::search::index::SearchIndex;

/// Receives the result the user activated, typically to select its class and
/// scroll to the member row.
pub trait ResultNavigator {
    fn activate(&mut self, result: &SearchResult);
}

impl<F> ResultNavigator for F
where
    F: FnMut(&SearchResult),
{
    fn activate(&mut self, result: &SearchResult) {
        self(result)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Down,
    Up,
    Enter,
    Escape,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NavOutcome {
    /// Nothing happened
    Ignored,
    /// Focus moved; `None` means nothing is focused
    Moved(Option<usize>),
    /// A result was handed to the navigator and the surface closed
    Activated(SearchResult),
    /// The surface closed without activating anything
    Closed,
}

/// Focus position within a result list. `None` means nothing is focused;
/// otherwise the index is always below the list length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResultCursor {
    focused: Option<usize>,
    len: usize,
}

impl ResultCursor {
    pub fn new(len: usize) -> Self {
        Self { focused: None, len }
    }

    /// Clear the focus for a new list of `len` results
    pub fn reset(&mut self, len: usize) {
        self.focused = None;
        self.len = len;
    }

    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Move down one row, stopping at the last result
    pub fn down(&mut self) -> Option<usize> {
        if self.len > 0 {
            self.focused = Some(match self.focused {
                None => 0,
                Some(i) => (i + 1).min(self.len - 1),
            });
        }
        self.focused
    }

    /// Move up one row; moving up from the first result clears the focus
    pub fn up(&mut self) -> Option<usize> {
        self.focused = self.focused.and_then(|i| i.checked_sub(1));
        self.focused
    }

    /// Focus `index` if it is in range
    pub fn focus(&mut self, index: usize) -> bool {
        if index < self.len {
            self.focused = Some(index);
            true
        } else {
            false
        }
    }
}

/// State of one advanced-search surface: the query, its filters, the current
/// results and the focus cursor.
#[derive(Debug)]
pub struct SearchSession {
    engine: SearchEngine,
    index: Arc<SearchIndex>,
    query: SearchQuery,
    outcome: SearchOutcome,
    cursor: ResultCursor,
    open: bool,
}

impl SearchSession {
    pub fn new(index: Arc<SearchIndex>) -> Self {
        Self::with_engine(index, SearchEngine::default())
    }

    pub fn with_engine(index: Arc<SearchIndex>, engine: SearchEngine) -> Self {
        Self {
            engine,
            index,
            query: SearchQuery::default(),
            outcome: SearchOutcome::default(),
            cursor: ResultCursor::default(),
            open: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.outcome.results
    }

    pub fn focused(&self) -> Option<usize> {
        self.cursor.focused()
    }

    pub fn focused_result(&self) -> Option<&SearchResult> {
        self.cursor.focused().and_then(|i| self.outcome.results.get(i))
    }

    /// Show the surface and rerun the current query with nothing focused
    pub fn open(&mut self) -> &SearchOutcome {
        self.open = true;
        self.refresh()
    }

    /// Hide the surface, clearing the query text and results
    pub fn close(&mut self) {
        self.open = false;
        self.query.text.clear();
        self.outcome = SearchOutcome::default();
        self.cursor.reset(0);
    }

    pub fn set_query(&mut self, text: impl Into<String>) -> &SearchOutcome {
        self.query.text = text.into();
        self.refresh()
    }

    pub fn set_filters(
        &mut self,
        include_classes: bool,
        include_members: bool,
        type_mode: bool,
    ) -> &SearchOutcome {
        self.query.include_classes = include_classes;
        self.query.include_members = include_members;
        self.query.type_mode = type_mode;
        self.refresh()
    }

    /// Swap in a rebuilt index and rerun the query against it
    pub fn set_index(&mut self, index: Arc<SearchIndex>) {
        self.index = index;
        if self.open {
            self.refresh();
        }
    }

    /// Rerun the query. Every new result list starts unfocused.
    pub fn refresh(&mut self) -> &SearchOutcome {
        self.outcome = self.engine.search(&self.index, &self.query);
        self.cursor.reset(self.outcome.results.len());
        &self.outcome
    }

    pub fn handle_key(&mut self, key: NavKey, navigator: &mut impl ResultNavigator) -> NavOutcome {
        if !self.open {
            return NavOutcome::Ignored;
        }
        if key == NavKey::Escape {
            self.close();
            return NavOutcome::Closed;
        }
        if self.cursor.is_empty() {
            return NavOutcome::Ignored;
        }

        match key {
            NavKey::Down => NavOutcome::Moved(self.cursor.down()),
            NavKey::Up => NavOutcome::Moved(self.cursor.up()),
            NavKey::Enter => match self.cursor.focused() {
                Some(index) => self.activate(index, navigator),
                None => NavOutcome::Ignored,
            },
            NavKey::Escape => NavOutcome::Ignored,
        }
    }

    /// Focus and activate the result at `index`
    pub fn click(&mut self, index: usize, navigator: &mut impl ResultNavigator) -> NavOutcome {
        if !self.open || !self.cursor.focus(index) {
            return NavOutcome::Ignored;
        }
        self.activate(index, navigator)
    }

    fn activate(&mut self, index: usize, navigator: &mut impl ResultNavigator) -> NavOutcome {
        let Some(result) = self.outcome.results.get(index).cloned() else {
            return NavOutcome::Ignored;
        };
        tracing::debug!("Activating result {} ({})", index, result.class_name());
        navigator.activate(&result);
        self.close();
        NavOutcome::Activated(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdk::{ClassRecord, MemberRecord, SdkDataset};

    fn index() -> Arc<SearchIndex> {
        let dataset: SdkDataset = [
            ClassRecord::new("Pawn").with_member(MemberRecord::new("Health", "int", "0x40", "4")),
            ClassRecord::new("PawnMovement"),
            ClassRecord::new("Character").with_parent("Pawn"),
        ]
        .into_iter()
        .collect();
        Arc::new(SearchIndex::build(&dataset))
    }

    #[test]
    fn test_cursor_clamps_without_wrapping() {
        let mut cursor = ResultCursor::new(2);
        assert_eq!(cursor.up(), None);
        assert_eq!(cursor.down(), Some(0));
        assert_eq!(cursor.down(), Some(1));
        assert_eq!(cursor.down(), Some(1));
        assert_eq!(cursor.up(), Some(0));
        assert_eq!(cursor.up(), None);
        assert_eq!(cursor.up(), None);
    }

    #[test]
    fn test_cursor_empty_list() {
        let mut cursor = ResultCursor::new(0);
        assert_eq!(cursor.down(), None);
        assert!(!cursor.focus(0));
    }

    #[test]
    fn test_enter_activates_focused_and_closes() {
        let mut session = SearchSession::new(index());
        session.open();
        assert_eq!(session.set_query("pawn").results.len(), 2);

        let mut activated = Vec::new();
        let mut navigator = |r: &SearchResult| activated.push(r.class_name().to_string());

        assert_eq!(session.handle_key(NavKey::Enter, &mut navigator), NavOutcome::Ignored);
        assert_eq!(session.handle_key(NavKey::Down, &mut navigator), NavOutcome::Moved(Some(0)));
        assert_eq!(session.handle_key(NavKey::Down, &mut navigator), NavOutcome::Moved(Some(1)));
        assert_eq!(
            session.focused_result().map(|r| r.class_name()),
            Some("PawnMovement")
        );

        let outcome = session.handle_key(NavKey::Enter, &mut navigator);
        assert!(matches!(outcome, NavOutcome::Activated(_)));
        assert!(!session.is_open());
        assert!(session.results().is_empty());
        assert!(session.query().text.is_empty());
        assert_eq!(activated, vec!["PawnMovement".to_string()]);
    }

    #[test]
    fn test_escape_closes_without_activation() {
        let mut session = SearchSession::new(index());
        session.open();
        session.set_query("health");

        let mut calls = 0;
        let mut navigator = |_: &SearchResult| calls += 1;
        session.handle_key(NavKey::Down, &mut navigator);
        assert_eq!(session.handle_key(NavKey::Escape, &mut navigator), NavOutcome::Closed);
        assert_eq!(session.handle_key(NavKey::Escape, &mut navigator), NavOutcome::Ignored);
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_click_focuses_and_activates() {
        let mut session = SearchSession::new(index());
        session.open();
        session.set_query("health");

        let mut seen = None;
        let mut navigator = |r: &SearchResult| seen = Some(r.clone());
        assert_eq!(session.click(5, &mut navigator), NavOutcome::Ignored);
        assert!(matches!(session.click(0, &mut navigator), NavOutcome::Activated(_)));

        match seen {
            Some(SearchResult::Member(m)) => {
                assert_eq!(m.class_name, "Pawn");
                assert_eq!(m.name, "Health");
            }
            other => panic!("expected member activation, got {other:?}"),
        }
    }

    #[test]
    fn test_new_results_reset_focus() {
        let mut session = SearchSession::new(index());
        session.open();
        session.set_query("pawn");
        session.handle_key(NavKey::Down, &mut |_: &SearchResult| {});
        assert_eq!(session.focused(), Some(0));

        session.set_filters(true, false, false);
        assert_eq!(session.focused(), None);
    }

    #[test]
    fn test_set_index_reruns_open_query() {
        let mut session = SearchSession::new(Arc::new(SearchIndex::default()));
        session.open();
        assert!(session.set_query("pawn").results.is_empty());

        session.set_index(index());
        assert_eq!(session.results().len(), 2);
    }
}
