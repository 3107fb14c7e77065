//! Search term, its matches, and the current-match cursor

use super::matches::{find_all, SearchMatch};
use crate::color::{escape_ranges, overlaps_escape};

/// Active search over the rendered document
///
/// `current` is `None` exactly when there are no matches; otherwise it
/// always indexes into `matches`.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    term: String,
    case_sensitive: bool,
    matches: Vec<SearchMatch>,
    current: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// A search is active while it has a term, even with zero matches
    pub fn is_active(&self) -> bool {
        !self.term.is_empty()
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    #[allow(dead_code)]
    pub fn set_case_sensitive(&mut self, case_sensitive: bool) {
        self.case_sensitive = case_sensitive;
    }

    pub fn toggle_case_sensitive(&mut self) {
        self.case_sensitive = !self.case_sensitive;
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    #[allow(dead_code)]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Replace the term and search `text` for it; the first match becomes current
    pub fn set_term(&mut self, term: &str, text: &str) {
        self.term = term.to_string();
        self.matches = self.scan(text);
        self.current = if self.matches.is_empty() { None } else { Some(0) };
    }

    /// Re-run the current term against new text, keeping the cursor where
    /// it still fits.
    pub fn rescan(&mut self, text: &str) {
        let previous = self.current;
        self.matches = self.scan(text);
        self.current = match (previous, self.matches.len()) {
            (_, 0) => None,
            (Some(idx), count) => Some(idx.min(count - 1)),
            (None, _) => Some(0),
        };
    }

    /// Occurrences of the term that are visible text. Hits inside escape
    /// sequences can never be drawn, so they are not navigable.
    fn scan(&self, text: &str) -> Vec<SearchMatch> {
        let mut matches = find_all(text, &self.term, self.case_sensitive);
        let lines: Vec<&str> = text.split('\n').collect();
        let mut scanned_line = None;
        let mut escapes = Vec::new();

        matches.retain(|m| {
            let line = lines.get(m.line).copied().unwrap_or_default();
            if !line.contains('\x1b') {
                return true;
            }
            if scanned_line != Some(m.line) {
                escapes = escape_ranges(line);
                scanned_line = Some(m.line);
            }
            !overlaps_escape(&escapes, m.column..m.end())
        });
        matches
    }

    /// Advance to the next match, wrapping from last to first
    pub fn next(&mut self) -> Option<SearchMatch> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        let idx = self.current.map_or(0, |i| (i + 1) % count);
        self.current = Some(idx);
        Some(self.matches[idx])
    }

    /// Retreat to the previous match, wrapping from first to last
    pub fn prev(&mut self) -> Option<SearchMatch> {
        let count = self.matches.len();
        if count == 0 {
            return None;
        }
        let idx = match self.current {
            Some(0) | None => count - 1,
            Some(i) => i - 1,
        };
        self.current = Some(idx);
        Some(self.matches[idx])
    }

    pub fn current(&self) -> Option<SearchMatch> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Drop the term and every match; case sensitivity is a preference and survives
    pub fn clear(&mut self) {
        self.term.clear();
        self.matches.clear();
        self.current = None;
    }

    /// One-line summary for the status bar; empty when no search is active
    pub fn status_text(&self) -> String {
        if self.term.is_empty() {
            return String::new();
        }
        match self.current {
            Some(idx) if !self.matches.is_empty() => format!(
                "Match {} of {}: {}",
                idx + 1,
                self.matches.len(),
                self.term
            ),
            _ => format!("No matches for: {}", self.term),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "foo one\ntwo foo foo\nthree\nfoo";

    fn searched(term: &str) -> SearchState {
        let mut search = SearchState::new();
        search.set_term(term, TEXT);
        search
    }

    #[test]
    fn test_set_term_selects_first() {
        let search = searched("foo");
        assert_eq!(search.match_count(), 4);
        assert_eq!(search.current_index(), Some(0));
        assert_eq!(search.current().map(|m| m.line), Some(0));
    }

    #[test]
    fn test_set_term_without_matches() {
        let mut search = searched("zzz");
        assert!(search.is_active());
        assert_eq!(search.current_index(), None);
        assert_eq!(search.next(), None);
        assert_eq!(search.prev(), None);
        assert_eq!(search.current_index(), None);
        assert_eq!(search.status_text(), "No matches for: zzz");
    }

    #[test]
    fn test_next_cycles_back() {
        let mut search = searched("foo");
        let start = search.current();
        for _ in 0..search.match_count() {
            search.next();
        }
        assert_eq!(search.current(), start);
    }

    #[test]
    fn test_prev_wraps_to_last() {
        let mut search = searched("foo");
        let last = search.prev();
        assert_eq!(search.current_index(), Some(3));
        assert_eq!(last.map(|m| m.line), Some(3));
        search.next();
        assert_eq!(search.current_index(), Some(0));
    }

    #[test]
    fn test_status_text() {
        let mut search = SearchState::new();
        assert_eq!(search.status_text(), "");
        search.set_term("foo", TEXT);
        assert_eq!(search.status_text(), "Match 1 of 4: foo");
        search.prev();
        assert_eq!(search.status_text(), "Match 4 of 4: foo");
    }

    #[test]
    fn test_clear_keeps_case_preference() {
        let mut search = searched("foo");
        search.set_case_sensitive(true);
        search.clear();
        assert!(!search.is_active());
        assert!(search.matches().is_empty());
        assert_eq!(search.current_index(), None);
        assert!(search.case_sensitive());
    }

    #[test]
    fn test_rescan_clamps_cursor() {
        let mut search = searched("foo");
        search.prev();
        search.rescan("foo\nfoo");
        assert_eq!(search.match_count(), 2);
        assert_eq!(search.current_index(), Some(1));
        search.rescan("nothing here");
        assert_eq!(search.current_index(), None);
    }

    #[test]
    fn test_case_sensitive_search() {
        let mut search = SearchState::new();
        search.set_case_sensitive(true);
        search.set_term("Foo", "foo Foo FOO");
        assert_eq!(search.match_count(), 1);
        search.toggle_case_sensitive();
        search.set_term("Foo", "foo Foo FOO");
        assert_eq!(search.match_count(), 3);
    }

    #[test]
    fn test_hits_inside_escapes_not_navigable() {
        // 'm' also terminates both SGR sequences
        let text = "plain\n\x1b[31mterm\x1b[0m m";
        let mut search = SearchState::new();
        search.set_term("m", text);
        let columns: Vec<_> = search.matches().iter().map(|m| (m.line, m.column)).collect();
        assert_eq!(columns, vec![(1, 8), (1, 14)]);
        assert_eq!(search.status_text(), "Match 1 of 2: m");

        search.next();
        search.rescan(text);
        assert_eq!(search.match_count(), 2);
        assert_eq!(search.current().map(|m| m.column), Some(14));
    }
}
