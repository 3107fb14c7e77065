//! Horizontal clipping of styled lines
//!
//! Uses VTE to walk a line so that escape sequences are carried through
//! untouched while only printable characters count toward columns.

use unicode_width::UnicodeWidthChar;
use vte::{Params, Parser, Perform};

/// Collects the visible window of a line
struct Clipper {
    out: String,
    col: usize,
    start: usize,
    end: usize,
}

impl Clipper {
    fn new(start: usize, width: usize) -> Self {
        Self {
            out: String::new(),
            col: 0,
            start,
            end: start.saturating_add(width),
        }
    }
}

impl Perform for Clipper {
    fn print(&mut self, c: char) {
        let w = c.width().unwrap_or(0);
        let from = self.col;
        self.col += w;

        if w == 0 {
            if from > self.start && from <= self.end {
                self.out.push(c);
            }
            return;
        }

        if from >= self.start && self.col <= self.end {
            self.out.push(c);
        } else if from < self.end && self.col > self.start {
            // Wide character cut by an edge
            let visible = self.col.min(self.end) - from.max(self.start);
            self.out.extend(std::iter::repeat(' ').take(visible));
        }
    }

    fn execute(&mut self, byte: u8) {
        if byte == b'\t' {
            self.print(' ');
        }
    }

    fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

    fn put(&mut self, _byte: u8) {}

    fn unhook(&mut self) {}

    fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], ignore: bool, action: char) {
        if ignore {
            return;
        }

        self.out.push_str("\x1b[");
        for &b in intermediates.iter().filter(|b| (0x3c..=0x3f).contains(*b)) {
            self.out.push(b as char);
        }
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.push(';');
            }
            for (j, value) in param.iter().enumerate() {
                if j > 0 {
                    self.out.push(':');
                }
                self.out.push_str(&value.to_string());
            }
        }
        for &b in intermediates.iter().filter(|b| !(0x3c..=0x3f).contains(*b)) {
            self.out.push(b as char);
        }
        self.out.push(action);
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], _ignore: bool, byte: u8) {
        self.out.push('\x1b');
        for &b in intermediates {
            self.out.push(b as char);
        }
        self.out.push(byte as char);
    }
}

/// Keep the columns `start..start + width` of a styled line.
///
/// Every CSI sequence is kept regardless of position so colors set before
/// the window still apply inside it.
pub fn clip_line(line: &str, start: usize, width: usize) -> String {
    let mut clipper = Clipper::new(start, width);
    let mut parser = Parser::new();
    for byte in line.bytes() {
        parser.advance(&mut clipper, byte);
    }
    clipper.out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_window() {
        assert_eq!(clip_line("hello world", 0, 5), "hello");
        assert_eq!(clip_line("hello world", 6, 20), "world");
        assert_eq!(clip_line("hello", 10, 5), "");
    }

    #[test]
    fn test_escapes_survive_clipping() {
        let line = "\x1b[1mbold\x1b[0m text";
        assert_eq!(clip_line(line, 2, 4), "\x1b[1mld\x1b[0m t");
    }

    #[test]
    fn test_color_params_preserved() {
        let line = "\x1b[38;5;208mabc";
        assert_eq!(clip_line(line, 1, 10), "\x1b[38;5;208mbc");
    }

    #[test]
    fn test_wide_characters() {
        // Each CJK character is two columns
        assert_eq!(clip_line("日本語", 0, 4), "日本");
        assert_eq!(clip_line("日本語", 1, 4), " 本 ");
    }

    #[test]
    fn test_tab_counts_as_column() {
        assert_eq!(clip_line("a\tb", 1, 2), " b");
    }
}
