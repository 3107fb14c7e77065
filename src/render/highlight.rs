//! Search highlighting over already-styled output
//!
//! Matches are byte ranges recorded against the unhighlighted render. Each
//! affected line is rebuilt left to right, wrapping every usable match in
//! the highlight escapes and restoring the line's own styling afterwards.

use std::borrow::Cow;
use std::ops::Range;

use crate::color::{escape_ranges, hex_escape, overlaps_escape, RESET};
use crate::config::ColorTable;
use crate::search::{SearchMatch, SearchState};

/// Foreground for the current match, drawn over the highlight background
const CURRENT_FG: &str = "\x1b[30m";

/// Escape sequences used to mark matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightStyle {
    /// Background plus foreground for the current match
    pub current: String,
    /// Foreground only for every other match
    pub other: String,
}

impl HighlightStyle {
    pub fn from_colors(colors: &ColorTable) -> Self {
        Self {
            current: format!("{}{}", hex_escape(&colors.search_current, true), CURRENT_FG),
            other: hex_escape(&colors.search_match, false),
        }
    }
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self::from_colors(&ColorTable::default())
    }
}

/// Highlight every match of `search` inside `rendered`.
///
/// Returns the input untouched when no search is active or nothing matched.
pub fn apply<'a>(rendered: &'a str, search: &SearchState, style: &HighlightStyle) -> Cow<'a, str> {
    let matches = search.matches();
    if !search.is_active() || matches.is_empty() {
        return Cow::Borrowed(rendered);
    }

    let current = search.current_index();
    let mut out = String::with_capacity(rendered.len() + matches.len() * 24);
    let mut next = 0;

    for (line_idx, line) in rendered.split('\n').enumerate() {
        if line_idx > 0 {
            out.push('\n');
        }

        // Matches are ordered by line; anything left behind belongs to a
        // line that no longer exists in this render.
        let start = next;
        while next < matches.len() && matches[next].line == line_idx {
            next += 1;
        }

        if start == next {
            out.push_str(line);
        } else {
            rebuild_line(&mut out, line, &matches[start..next], start, current, style);
        }
    }

    if next < matches.len() {
        tracing::debug!(
            skipped = matches.len() - next,
            "matches past the end of the rendered text"
        );
    }

    Cow::Owned(out)
}

fn rebuild_line(
    out: &mut String,
    line: &str,
    line_matches: &[SearchMatch],
    first_index: usize,
    current: Option<usize>,
    style: &HighlightStyle,
) {
    let escapes = escape_ranges(line);
    let mut active: Vec<&str> = Vec::new();
    let mut pos = 0;
    let mut esc_idx = 0;

    for (offset, m) in line_matches.iter().enumerate() {
        if !fits(line, m, pos, &escapes) {
            tracing::debug!(line = m.line, column = m.column, "skipping stale match");
            continue;
        }

        // Track the SGR state in force where the match begins
        while esc_idx < escapes.len() && escapes[esc_idx].start < m.column {
            let seq = &line[escapes[esc_idx].clone()];
            if is_reset(seq) {
                active.clear();
            } else if seq.ends_with('m') {
                active.push(seq);
            }
            esc_idx += 1;
        }

        let color = if current == Some(first_index + offset) {
            &style.current
        } else {
            &style.other
        };

        out.push_str(&line[pos..m.column]);
        out.push_str(color);
        out.push_str(&line[m.column..m.end()]);
        out.push_str(RESET);
        for seq in &active {
            out.push_str(seq);
        }
        pos = m.end();
    }

    out.push_str(&line[pos..]);
}

/// Whether a match can still be sliced out of `line` intact
fn fits(line: &str, m: &SearchMatch, pos: usize, escapes: &[Range<usize>]) -> bool {
    m.len > 0
        && m.column >= pos
        && m.end() <= line.len()
        && line.is_char_boundary(m.column)
        && line.is_char_boundary(m.end())
        && !overlaps_escape(escapes, m.column..m.end())
}

fn is_reset(seq: &str) -> bool {
    seq == "\x1b[0m" || seq == "\x1b[m"
}
