//! Word wrapping for styled inline text

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::color::RESET;

/// A run of inline text sharing one set of escape sequences
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub style: String,
}

impl Span {
    pub fn new(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: style.into(),
        }
    }

    #[allow(dead_code)]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, String::new())
    }
}

/// Display width of unstyled text
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Wrap spans into lines no wider than `width` columns.
///
/// Whitespace collapses to single spaces between words. Each produced line
/// is self-contained: every styled piece is followed by a reset.
pub fn wrap_spans(spans: &[Span], width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in split_words(spans) {
        for chunk in word.chunks(width) {
            let needed = if line_width == 0 { chunk.width } else { chunk.width + 1 };
            if line_width > 0 && line_width + needed > width {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if line_width > 0 {
                line.push(' ');
                line_width += 1;
            }
            chunk.write_to(&mut line);
            line_width += chunk.width;
        }
    }

    if line_width > 0 {
        lines.push(line);
    }
    lines
}

/// One whitespace-delimited word, possibly crossing style changes
#[derive(Debug, Default)]
struct Word {
    pieces: Vec<(String, String)>,
    width: usize,
}

impl Word {
    fn push(&mut self, style: &str, ch: char) {
        match self.pieces.last_mut() {
            Some((s, text)) if s == style => text.push(ch),
            _ => self.pieces.push((style.to_string(), ch.to_string())),
        }
        self.width += ch.width().unwrap_or(0);
    }

    fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Break a word that cannot fit on any line
    fn chunks(self, width: usize) -> Vec<Word> {
        if self.width <= width {
            return vec![self];
        }

        let mut chunks = Vec::new();
        let mut current = Word::default();
        for (style, text) in &self.pieces {
            for ch in text.chars() {
                let w = ch.width().unwrap_or(0);
                if current.width + w > width && !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                current.push(style, ch);
            }
        }
        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    fn write_to(&self, out: &mut String) {
        for (style, text) in &self.pieces {
            if style.is_empty() {
                out.push_str(text);
            } else {
                out.push_str(style);
                out.push_str(text);
                out.push_str(RESET);
            }
        }
    }
}

fn split_words(spans: &[Span]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current = Word::default();

    for span in spans {
        for ch in span.text.chars() {
            if ch.is_whitespace() {
                if !current.is_empty() {
                    words.push(std::mem::take(&mut current));
                }
            } else {
                current.push(&span.style, ch);
            }
        }
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_plain() {
        let spans = [Span::plain("the quick brown fox jumps")];
        assert_eq!(
            wrap_spans(&spans, 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_whitespace_collapses() {
        let spans = [Span::plain("  a \n  b  ")];
        assert_eq!(wrap_spans(&spans, 80), vec!["a b"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(wrap_spans(&[], 10).is_empty());
        assert!(wrap_spans(&[Span::plain("   ")], 10).is_empty());
    }

    #[test]
    fn test_styles_reset_per_piece() {
        let spans = [
            Span::plain("a "),
            Span::new("bold", "\x1b[1m"),
            Span::plain("er c"),
        ];
        assert_eq!(wrap_spans(&spans, 80), vec!["a \x1b[1mbold\x1b[0mer c"]);
    }

    #[test]
    fn test_long_word_is_broken() {
        let spans = [Span::plain("abcdefgh xy")];
        assert_eq!(wrap_spans(&spans, 3), vec!["abc", "def", "gh", "xy"]);
    }

    #[test]
    fn test_wide_characters_measured_by_columns() {
        let spans = [Span::plain("日本 語")];
        assert_eq!(wrap_spans(&spans, 4), vec!["日本", "語"]);
        assert_eq!(display_width("日本"), 4);
    }
}
