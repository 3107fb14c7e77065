//! Locating search terms inside rendered text

/// One occurrence of the search term
///
/// Offsets are bytes into a rendered line (escape sequences included), so
/// the highlighter can slice the line directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchMatch {
    /// Rendered line, 0-based
    pub line: usize,
    /// Byte offset of the match within the line
    pub column: usize,
    /// Byte length of the matched text
    pub len: usize,
}

impl SearchMatch {
    /// Byte offset just past the match
    pub fn end(&self) -> usize {
        self.column + self.len
    }
}

/// Find every non-overlapping occurrence of `term`, line by line, left to right.
///
/// An empty term matches nothing. Without `case_sensitive` both sides are
/// lowercased before comparing, but offsets still refer to the original line.
pub fn find_all(text: &str, term: &str, case_sensitive: bool) -> Vec<SearchMatch> {
    let mut matches = Vec::new();
    if term.is_empty() {
        return matches;
    }

    let needle = if case_sensitive {
        term.to_string()
    } else {
        fold(term)
    };

    for (line_idx, line) in text.split('\n').enumerate() {
        if case_sensitive {
            find_in_line(line_idx, line, &needle, None, &mut matches);
        } else {
            let folded = FoldedLine::new(line);
            find_in_line(line_idx, &folded.text, &needle, Some(&folded), &mut matches);
        }
    }

    matches
}

fn find_in_line(
    line_idx: usize,
    haystack: &str,
    needle: &str,
    folded: Option<&FoldedLine>,
    matches: &mut Vec<SearchMatch>,
) {
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(needle) {
        let start = from + pos;
        let end = start + needle.len();

        let span = match folded {
            None => Some((start, end)),
            Some(folded) => folded.original_span(start, end),
        };

        match span {
            Some((column, stop)) => {
                matches.push(SearchMatch {
                    line: line_idx,
                    column,
                    len: stop - column,
                });
                from = end;
            }
            None => {
                // Lands inside the expansion of a single character; retry one char later
                from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }
}

/// Lowercase character by character, exactly as [`FoldedLine`] folds lines.
///
/// `str::to_lowercase` is context sensitive (a word-final `Σ` becomes `ς`)
/// and would disagree with the per-character fold of the line.
fn fold(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// A lowercased line plus a map from each folded byte back to the byte
/// offset of the character it came from.
struct FoldedLine {
    text: String,
    origin: Vec<usize>,
}

impl FoldedLine {
    fn new(line: &str) -> Self {
        let mut text = String::with_capacity(line.len());
        let mut origin = Vec::with_capacity(line.len() + 1);
        for (offset, ch) in line.char_indices() {
            for lower in ch.to_lowercase() {
                text.push(lower);
                origin.resize(text.len(), offset);
            }
        }
        origin.push(line.len());
        Self { text, origin }
    }

    /// Whether a folded offset starts a new original character
    fn is_boundary(&self, folded: usize) -> bool {
        folded == 0 || self.origin[folded] != self.origin[folded - 1]
    }

    fn original_span(&self, start: usize, end: usize) -> Option<(usize, usize)> {
        if self.is_boundary(start) && self.is_boundary(end) {
            Some((self.origin[start], self.origin[end]))
        } else {
            None
        }
    }
}
