//! Viewer state for one document
//!
//! A `Session` owns everything the display depends on and applies
//! [`Action`]s to it. It never touches the terminal.

use std::borrow::Cow;
use std::rc::Rc;

use crate::input::Action;
use crate::markdown::Renderer;
use crate::render::{Document, HighlightStyle, RenderPipeline};
use crate::search::SearchState;
use crate::view::Viewport;

/// Terminal rows taken by the status bar
pub const STATUS_ROWS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

pub struct Session<R> {
    document: Document,
    viewport: Viewport,
    search: SearchState,
    pipeline: RenderPipeline<R>,
    /// Search text being typed, while the prompt is open
    entry: Option<String>,
    help_visible: bool,
}

impl<R: Renderer> Session<R> {
    pub fn new(renderer: R, style: HighlightStyle) -> Self {
        Self {
            document: Document::default(),
            viewport: Viewport::new(0, 0),
            search: SearchState::new(),
            pipeline: RenderPipeline::new(renderer, style),
            entry: None,
            help_visible: false,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Replace the document. Matches recorded against the old text are
    /// dropped along with the term.
    pub fn load_document(&mut self, text: impl Into<Rc<str>>) {
        self.document = Document::new(text);
        self.search.clear();
        self.sync();
    }

    /// Adopt a new terminal size; one row is kept for the status bar
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.viewport.set_size(cols, rows.saturating_sub(STATUS_ROWS));
        self.sync();
    }

    /// Bring the render cache, line count and matches up to date
    fn sync(&mut self) {
        if !self.pipeline.refresh(&self.document, self.viewport.width()) {
            return;
        }
        if let Some(view) = self.pipeline.view() {
            self.viewport.set_line_count(view.line_count);
            if self.search.is_active() {
                self.search.rescan(&view.text);
                tracing::debug!(
                    term = self.search.term(),
                    matches = self.search.match_count(),
                    "search rescanned after re-render"
                );
            }
        }
    }

    /// Full display text for the current state, highlights included
    pub fn display_bytes(&mut self) -> Cow<'_, str> {
        self.sync();
        self.pipeline
            .display_bytes(&self.document, self.viewport.width(), &self.search)
    }

    pub fn dispatch(&mut self, action: Action) -> Outcome {
        self.sync();
        match action {
            Action::ScrollUp => self.viewport.scroll_by(-1, 0),
            Action::ScrollDown => self.viewport.scroll_by(1, 0),
            Action::ScrollLeft => self.viewport.scroll_by(0, -1),
            Action::ScrollRight => self.viewport.scroll_by(0, 1),
            Action::PageUp => self.viewport.page_up(),
            Action::PageDown => self.viewport.page_down(),
            Action::GoToTop => self.viewport.go_to_top(),
            Action::GoToBottom => self.viewport.go_to_bottom(),
            Action::StartSearch => self.begin_search_entry(),
            Action::SearchNext => self.advance_match(1),
            Action::SearchPrev => self.advance_match(-1),
            Action::ClearSearch => self.search.clear(),
            Action::ToggleCaseSensitive => self.toggle_case_sensitive(),
            Action::ShowHelp => self.help_visible = true,
            Action::Quit => return Outcome::Quit,
        }
        Outcome::Continue
    }

    pub fn is_entering_search(&self) -> bool {
        self.entry.is_some()
    }

    /// Text typed into the search prompt so far
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    pub fn begin_search_entry(&mut self) {
        self.entry = Some(String::new());
    }

    pub fn push_search_char(&mut self, c: char) {
        if let Some(entry) = self.entry.as_mut() {
            entry.push(c);
        }
    }

    pub fn pop_search_char(&mut self) {
        if let Some(entry) = self.entry.as_mut() {
            entry.pop();
        }
    }

    /// Close the prompt without touching the current search
    pub fn cancel_search_entry(&mut self) {
        self.entry = None;
    }

    /// Close the prompt and search for what was typed
    pub fn commit_search_entry(&mut self) {
        if let Some(typed) = self.entry.take() {
            self.search_for(&typed);
        }
    }

    /// Search the rendered text and jump to the first match.
    /// Blank input cancels the active search instead.
    pub fn search_for(&mut self, typed: &str) {
        let term = typed.trim();
        if term.is_empty() {
            self.search.clear();
            return;
        }

        self.sync();
        let text = self.pipeline.view().map_or("", |view| view.text.as_str());
        self.search.set_term(term, text);
        tracing::info!(term, matches = self.search.match_count(), "search");
        self.center_on_current();
    }

    /// Step to the next (`delta > 0`) or previous match and bring it into view
    pub fn advance_match(&mut self, delta: isize) {
        if !self.search.is_active() {
            return;
        }
        let found = if delta >= 0 {
            self.search.next()
        } else {
            self.search.prev()
        };
        if let Some(m) = found {
            self.viewport.center_on(m.line);
        }
    }

    fn toggle_case_sensitive(&mut self) {
        self.search.toggle_case_sensitive();
        if self.search.is_active() {
            let term = self.search.term().to_string();
            let text = self.pipeline.view().map_or("", |view| view.text.as_str());
            self.search.set_term(&term, text);
            self.center_on_current();
        }
    }

    fn center_on_current(&mut self) {
        if let Some(m) = self.search.current() {
            self.viewport.center_on(m.line);
        }
    }

    pub fn help_visible(&self) -> bool {
        self.help_visible
    }

    pub fn close_help(&mut self) {
        self.help_visible = false;
    }

    pub fn status_text(&self) -> String {
        self.search.status_text()
    }

    /// Topmost visible line out of the total, e.g. `12/80`
    pub fn position_text(&self) -> String {
        let total = self.viewport.line_count();
        let line = (self.viewport.y_offset() + 1).min(total);
        format!("{}/{}", line, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// One hundred lines; "foo" twice on line 3 and once on line 50
    struct FixedRenderer {
        calls: Cell<usize>,
    }

    impl Renderer for FixedRenderer {
        fn render(&self, _source: &str, _width: usize) -> String {
            self.calls.set(self.calls.get() + 1);
            (0..100)
                .map(|i| match i {
                    3 => "foo and foo\n".to_string(),
                    50 => "a foo\n".to_string(),
                    _ => format!("line {}\n", i),
                })
                .collect()
        }
    }

    /// Echoes the source, so loading a document changes the output
    struct EchoRenderer;

    impl Renderer for EchoRenderer {
        fn render(&self, source: &str, _width: usize) -> String {
            source.to_string()
        }
    }

    fn style() -> HighlightStyle {
        HighlightStyle {
            current: "<C>".to_string(),
            other: "<O>".to_string(),
        }
    }

    fn fixed_session() -> Session<FixedRenderer> {
        let mut session = Session::new(
            FixedRenderer {
                calls: Cell::new(0),
            },
            style(),
        );
        session.load_document("anything");
        session.resize(80, 20);
        session.pipeline.renderer().calls.set(0);
        session
    }

    #[test]
    fn test_search_scenario() {
        let mut session = fixed_session();
        assert_eq!(session.viewport().line_count(), 100);
        assert_eq!(session.viewport().height(), 19);

        session.search_for("foo");
        assert_eq!(session.search().match_count(), 3);
        assert_eq!(session.search().current().map(|m| (m.line, m.column)), Some((3, 0)));
        assert_eq!(session.viewport().y_offset(), 0);

        session.advance_match(1);
        session.advance_match(1);
        assert_eq!(session.search().current().map(|m| m.line), Some(50));
        assert_eq!(session.viewport().y_offset(), 41);
        assert_eq!(session.status_text(), "Match 3 of 3: foo");
    }

    #[test]
    fn test_prev_wraps_to_last() {
        let mut session = fixed_session();
        session.search_for("foo");
        session.advance_match(-1);
        assert_eq!(session.search().current_index(), Some(2));
        assert_eq!(session.viewport().y_offset(), 41);
    }

    #[test]
    fn test_advance_without_search_is_noop() {
        let mut session = fixed_session();
        session.dispatch(Action::PageDown);
        let y = session.viewport().y_offset();
        session.dispatch(Action::SearchNext);
        assert_eq!(session.viewport().y_offset(), y);
        assert_eq!(session.status_text(), "");
    }

    #[test]
    fn test_blank_entry_cancels_search() {
        let mut session = fixed_session();
        session.search_for("foo");
        session.search_for("   ");
        assert!(!session.search().is_active());
        assert_eq!(session.search().match_count(), 0);
    }

    #[test]
    fn test_entry_trims_and_commits() {
        let mut session = fixed_session();
        session.dispatch(Action::StartSearch);
        assert!(session.is_entering_search());
        for c in " fooo ".chars() {
            session.push_search_char(c);
        }
        session.pop_search_char();
        session.pop_search_char();
        assert_eq!(session.entry(), Some(" foo"));

        session.commit_search_entry();
        assert!(!session.is_entering_search());
        assert_eq!(session.search().term(), "foo");
        assert_eq!(session.search().match_count(), 3);
    }

    #[test]
    fn test_cancel_entry_keeps_search() {
        let mut session = fixed_session();
        session.search_for("foo");
        session.begin_search_entry();
        session.push_search_char('x');
        session.cancel_search_entry();
        assert!(!session.is_entering_search());
        assert_eq!(session.search().term(), "foo");
    }

    #[test]
    fn test_display_highlights_from_cached_render() {
        let mut session = fixed_session();
        session.search_for("foo");

        let first = session.display_bytes().into_owned();
        let second = session.display_bytes().into_owned();
        assert_eq!(first, second);
        assert!(first.contains("<C>foo\x1b[0m and <O>foo\x1b[0m\n"));
        assert_eq!(session.pipeline.renderer().calls.get(), 0);
    }

    #[test]
    fn test_width_change_rerenders_and_keeps_search() {
        let mut session = fixed_session();
        session.search_for("foo");
        session.advance_match(1);

        session.resize(60, 20);
        assert_eq!(session.pipeline.renderer().calls.get(), 1);
        assert_eq!(session.search().match_count(), 3);
        assert_eq!(session.search().current_index(), Some(1));
    }

    #[test]
    fn test_height_change_reclamps() {
        let mut session = fixed_session();
        session.dispatch(Action::GoToBottom);
        assert_eq!(session.viewport().y_offset(), 82);

        session.resize(80, 40);
        assert_eq!(session.viewport().y_offset(), 62);
        assert_eq!(session.pipeline.renderer().calls.get(), 0);
    }

    #[test]
    fn test_reload_clears_search() {
        let mut session = Session::new(EchoRenderer, style());
        session.resize(80, 10);
        session.load_document("foo\nbar\n");
        session.search_for("foo");
        assert_eq!(session.search().match_count(), 1);

        session.load_document("bar\n");
        assert!(!session.search().is_active());
        assert_eq!(session.display_bytes(), "bar\n");
    }

    #[test]
    fn test_toggle_case_reruns_search() {
        let mut session = Session::new(EchoRenderer, style());
        session.resize(80, 10);
        session.load_document("Foo foo\n");
        session.search_for("foo");
        assert_eq!(session.search().match_count(), 2);

        session.dispatch(Action::ToggleCaseSensitive);
        assert!(session.search().case_sensitive());
        assert_eq!(session.search().match_count(), 1);
        assert_eq!(session.search().current().map(|m| m.column), Some(4));
    }

    #[test]
    fn test_dispatch_navigation() {
        let mut session = fixed_session();
        assert_eq!(session.dispatch(Action::ScrollDown), Outcome::Continue);
        assert_eq!(session.viewport().y_offset(), 1);
        session.dispatch(Action::PageDown);
        assert_eq!(session.viewport().y_offset(), 10);
        session.dispatch(Action::ScrollRight);
        session.dispatch(Action::ScrollLeft);
        session.dispatch(Action::ScrollLeft);
        assert_eq!(session.viewport().x_offset(), 0);
        session.dispatch(Action::GoToTop);
        assert_eq!(session.viewport().y_offset(), 0);
        assert_eq!(session.position_text(), "1/100");
    }

    #[test]
    fn test_help_and_quit() {
        let mut session = fixed_session();
        session.dispatch(Action::ShowHelp);
        assert!(session.help_visible());
        session.close_help();
        assert!(!session.help_visible());
        assert_eq!(session.dispatch(Action::Quit), Outcome::Quit);
    }
}
