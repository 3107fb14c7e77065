//! Escape sequence boundaries in styled text
//!
//! Search offsets are bytes into rendered lines, so anything that slices
//! those lines needs to know which bytes belong to escape sequences.

use std::ops::Range;
use vte::{Params, Parser, Perform};

/// Records where each escape sequence starts and ends while VTE walks a line
#[derive(Default)]
struct EscapeScanner {
    ranges: Vec<Range<usize>>,
    start: Option<usize>,
    end: usize,
}

impl EscapeScanner {
    fn close(&mut self) {
        if let Some(start) = self.start.take() {
            self.ranges.push(start..self.end);
        }
    }
}

impl Perform for EscapeScanner {
    fn print(&mut self, _c: char) {}

    fn execute(&mut self, _byte: u8) {}

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn put(&mut self, _byte: u8) {}

    // String terminators arrive as ESC \ and close in esc_dispatch
    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], bell_terminated: bool) {
        if bell_terminated {
            self.close();
        }
    }

    fn csi_dispatch(
        &mut self,
        _params: &Params,
        _intermediates: &[u8],
        _ignore: bool,
        _action: char,
    ) {
        self.close();
    }

    fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {
        self.close();
    }
}

/// Byte ranges of the escape sequences in a line.
///
/// An unterminated sequence runs to the end of the line.
pub fn escape_ranges(line: &str) -> Vec<Range<usize>> {
    let mut scanner = EscapeScanner::default();
    let mut parser = Parser::new();
    for (i, byte) in line.bytes().enumerate() {
        if byte == 0x1b && scanner.start.is_none() {
            scanner.start = Some(i);
        }
        scanner.end = i + 1;
        parser.advance(&mut scanner, byte);
    }
    scanner.end = line.len();
    scanner.close();
    scanner.ranges
}

/// Whether `span` touches any of `escapes`
pub fn overlaps_escape(escapes: &[Range<usize>], span: Range<usize>) -> bool {
    escapes
        .iter()
        .any(|esc| esc.start < span.end && span.start < esc.end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_ranges() {
        let line = "a\x1b[1;31mb\x1b]8;;url\x07c\x1b7d";
        let ranges = escape_ranges(line);
        assert_eq!(ranges, vec![1..8, 9..18, 19..21]);
    }

    #[test]
    fn test_escape_ranges_with_intermediates() {
        assert_eq!(escape_ranges("\x1b(B\x1b[mBig"), vec![0..3, 3..6]);
        assert_eq!(escape_ranges("\x1b]8;;u\x1b\\x"), vec![0..8]);
        assert_eq!(escape_ranges("ab\x1b[3"), vec![2..5]);
    }

    #[test]
    fn test_plain_line_has_no_escapes() {
        assert!(escape_ranges("plain text").is_empty());
        assert!(escape_ranges("").is_empty());
    }

    #[test]
    fn test_overlaps_escape() {
        let escapes = [2..5];
        assert!(overlaps_escape(&escapes, 4..6));
        assert!(overlaps_escape(&escapes, 0..3));
        assert!(!overlaps_escape(&escapes, 5..7));
        assert!(!overlaps_escape(&escapes, 0..2));
    }
}
