//! Terminal renderer built on pulldown-cmark events
//!
//! Every `Start` event pushes exactly one frame and every `End` pops one,
//! so closing a block never needs to inspect the end tag itself.

use pulldown_cmark::{Alignment, Event, HeadingLevel, Options, Parser, Tag};

use super::wrap::{display_width, wrap_spans, Span};
use super::Renderer;
use crate::color::{hex_escape, RESET};
use crate::config::ColorTable;

/// Blank columns left of the content
const PADDING: usize = 4;

const BOLD: &str = "\x1b[1m";
const ITALIC: &str = "\x1b[3m";
const UNDERLINE: &str = "\x1b[4m";
const STRIKE: &str = "\x1b[9m";

const TAB_STOP: usize = 4;

/// Renders markdown with colors from a [`ColorTable`]
#[derive(Debug, Clone, Default)]
pub struct TermRenderer {
    colors: ColorTable,
}

impl TermRenderer {
    pub fn new(colors: ColorTable) -> Self {
        Self { colors }
    }
}

impl Renderer for TermRenderer {
    /// Wraps text at `width - 1 - PADDING` columns
    fn render(&self, source: &str, width: usize) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let mut writer = Writer::new(&self.colors, width.saturating_sub(1 + PADDING));
        for event in Parser::new_ext(source, options) {
            writer.event(event);
        }
        writer.finish()
    }
}

enum Frame {
    Block,
    Paragraph,
    Heading,
    Quote,
    List,
    Item,
    CodeBlock,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Style,
    Link { url: String, first_span: usize },
    Image { url: String },
}

struct TableBuilder {
    align: Vec<Alignment>,
    head: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

struct Writer<'a> {
    colors: &'a ColorTable,
    width: usize,
    out: String,
    last_blank: bool,

    frames: Vec<Frame>,
    styles: Vec<String>,
    spans: Vec<Span>,

    quote_depth: usize,
    /// Next number for ordered lists, `None` for bullets
    lists: Vec<Option<u64>>,
    /// Marker width of each open list item
    items: Vec<usize>,
    /// Marker waiting for the first line of the current item
    marker: Option<String>,

    code: Option<String>,
    table: Option<TableBuilder>,
}

fn paint(text: &str, color: &str) -> String {
    let esc = hex_escape(color, false);
    if esc.is_empty() {
        text.to_string()
    } else {
        format!("{}{}{}", esc, text, RESET)
    }
}

fn heading_level(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn expand_tabs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut col = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let n = TAB_STOP - col % TAB_STOP;
            out.extend(std::iter::repeat(' ').take(n));
            col += n;
        } else {
            out.push(ch);
            col += display_width(ch.encode_utf8(&mut [0; 4]));
        }
    }
    out
}

fn align_cell(cell: &str, width: usize, align: Alignment) -> String {
    let pad = width.saturating_sub(display_width(cell));
    match align {
        Alignment::Right => format!("{}{}", " ".repeat(pad), cell),
        Alignment::Center => {
            let left = pad / 2;
            format!("{}{}{}", " ".repeat(left), cell, " ".repeat(pad - left))
        }
        Alignment::Left | Alignment::None => format!("{}{}", cell, " ".repeat(pad)),
    }
}

impl<'a> Writer<'a> {
    fn new(colors: &'a ColorTable, width: usize) -> Self {
        Self {
            colors,
            width,
            out: String::new(),
            last_blank: false,
            frames: Vec::new(),
            styles: Vec::new(),
            spans: Vec::new(),
            quote_depth: 0,
            lists: Vec::new(),
            items: Vec::new(),
            marker: None,
            code: None,
            table: None,
        }
    }

    /// Configured color value by name, blank when unknown
    fn color(&self, name: &str) -> &'a str {
        self.colors.get(name).unwrap_or_default()
    }

    fn fg(&self, name: &str) -> String {
        hex_escape(self.color(name), false)
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::FootnoteReference(name) => self.text(&format!("[^{}]", name)),
            Event::SoftBreak => self.text(" "),
            Event::HardBreak => self.flush(),
            Event::Rule => self.rule(),
            Event::TaskListMarker(done) => self.task_marker(done),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => {
                self.flush();
                Frame::Paragraph
            }
            Tag::Heading { level, .. } => {
                self.flush();
                let level = heading_level(level);
                let style = format!("{}{}", hex_escape(self.colors.heading(level), false), BOLD);
                self.spans
                    .push(Span::new(format!("{} ", "#".repeat(level)), style.clone()));
                self.styles.push(style);
                Frame::Heading
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
                self.styles.push(self.fg("blockquote"));
                Frame::Quote
            }
            Tag::CodeBlock(_) => {
                self.flush();
                self.flush_marker();
                self.code = Some(String::new());
                Frame::CodeBlock
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
                Frame::List
            }
            Tag::Item => {
                self.flush();
                self.flush_marker();
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                self.items.push(display_width(&marker));
                self.marker = Some(paint(&marker, self.color("list_marker")));
                Frame::Item
            }
            Tag::Emphasis => {
                self.styles
                    .push(format!("{}{}", self.fg("italic"), ITALIC));
                Frame::Style
            }
            Tag::Strong => {
                self.styles
                    .push(format!("{}{}", self.fg("bold"), BOLD));
                Frame::Style
            }
            Tag::Strikethrough => {
                self.styles.push(format!(
                    "{}{}",
                    self.fg("strikethrough"),
                    STRIKE
                ));
                Frame::Style
            }
            Tag::Link { dest_url, .. } => {
                self.styles
                    .push(format!("{}{}", self.fg("link"), UNDERLINE));
                Frame::Link {
                    url: dest_url.to_string(),
                    first_span: self.spans.len(),
                }
            }
            Tag::Image { dest_url, .. } => {
                let style = self.fg("link");
                self.append("[image: ", style.clone());
                self.styles.push(style);
                Frame::Image {
                    url: dest_url.to_string(),
                }
            }
            Tag::Table(align) => {
                self.flush();
                self.flush_marker();
                self.table = Some(TableBuilder {
                    align,
                    head: Vec::new(),
                    rows: Vec::new(),
                    row: Vec::new(),
                    cell: String::new(),
                });
                Frame::Table
            }
            Tag::TableHead => Frame::TableHead,
            Tag::TableRow => Frame::TableRow,
            Tag::TableCell => Frame::TableCell,
            _ => Frame::Block,
        };
        self.frames.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };

        match frame {
            Frame::Paragraph => {
                self.flush();
                if self.items.is_empty() {
                    self.blank();
                }
            }
            Frame::Heading => {
                self.styles.pop();
                self.flush();
                self.blank();
            }
            Frame::Quote => {
                self.flush();
                self.styles.pop();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank();
            }
            Frame::CodeBlock => {
                let code = self.code.take().unwrap_or_default();
                self.code_block(&code);
                self.blank();
            }
            Frame::List => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Frame::Item => {
                self.flush();
                self.flush_marker();
                self.items.pop();
            }
            Frame::Style => {
                self.styles.pop();
            }
            Frame::Link { url, first_span } => {
                self.styles.pop();
                let text: String = self
                    .spans
                    .get(first_span..)
                    .unwrap_or_default()
                    .iter()
                    .map(|span| span.text.as_str())
                    .collect();
                if !url.is_empty() && text.trim() != url {
                    let style = self.fg("link_url");
                    self.append(&format!(" ({})", url), style);
                }
            }
            Frame::Image { url } => {
                let style = self.styles.pop().unwrap_or_default();
                self.append(&format!("] ({})", url), style);
            }
            Frame::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell.trim().to_string());
                }
            }
            Frame::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.head = std::mem::take(&mut table.row);
                }
            }
            Frame::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            Frame::Table => {
                if let Some(table) = self.table.take() {
                    self.table_lines(&table);
                }
                self.blank();
            }
            Frame::Block => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.push_str(text);
            return;
        }
        let style = self.styles.concat();
        self.append(text, style);
    }

    fn inline_code(&mut self, code: &str) {
        let style = format!("{}{}", self.styles.concat(), self.fg("code"));
        self.append(code, style);
    }

    fn task_marker(&mut self, done: bool) {
        let (text, color) = if done {
            ("[x] ", "task_checked")
        } else {
            ("[ ] ", "task_unchecked")
        };
        let style = self.fg(color);
        self.append(text, style);
    }

    /// Queue inline text, or collect it into the open table cell
    fn append(&mut self, text: &str, style: String) {
        match self.table.as_mut() {
            Some(table) => table.cell.push_str(text),
            None => self.spans.push(Span::new(text, style)),
        }
    }

    fn rule(&mut self) {
        self.flush();
        let rule = paint(&"─".repeat(self.available()), self.color("table_border"));
        self.emit("", &rule);
        self.blank();
    }

    fn indent(&self) -> usize {
        self.items.iter().sum()
    }

    fn available(&self) -> usize {
        self.width
            .saturating_sub(2 * self.quote_depth + self.indent())
            .max(1)
    }

    fn emit(&mut self, lead: &str, content: &str) {
        let bars = if self.quote_depth > 0 {
            paint(&"│ ".repeat(self.quote_depth), self.color("blockquote"))
        } else {
            String::new()
        };
        self.out.push_str(&" ".repeat(PADDING));
        self.out.push_str(&bars);
        self.out.push_str(lead);
        self.out.push_str(content);
        self.out.push('\n');
        self.last_blank = false;
    }

    fn blank(&mut self) {
        if self.last_blank || self.out.is_empty() {
            return;
        }
        self.out.push('\n');
        self.last_blank = true;
    }

    /// Lead for the next line of the current block: the pending item marker
    /// on an item's first line, plain indentation otherwise
    fn lead(&mut self) -> String {
        let indent = self.indent();
        match self.marker.take() {
            Some(marker) => {
                let before = indent.saturating_sub(self.items.last().copied().unwrap_or(0));
                format!("{}{}", " ".repeat(before), marker)
            }
            None => " ".repeat(indent),
        }
    }

    /// Wrap and write the queued inline text
    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let spans = std::mem::take(&mut self.spans);
        for line in wrap_spans(&spans, self.available()) {
            let lead = self.lead();
            self.emit(&lead, &line);
        }
    }

    /// Write a marker whose item had no text of its own
    fn flush_marker(&mut self) {
        if self.marker.is_some() {
            let lead = self.lead();
            self.emit(&lead, "");
        }
    }

    fn code_block(&mut self, code: &str) {
        let lines: Vec<String> = code
            .trim_end_matches('\n')
            .split('\n')
            .map(expand_tabs)
            .collect();
        let longest = lines.iter().map(|l| display_width(l)).max().unwrap_or(0);
        let box_width = (longest + 2).max(self.available());
        let style = format!(
            "{}{}",
            self.fg("code_block"),
            hex_escape(self.color("code_block_bg"), true)
        );
        let lead = " ".repeat(self.indent());

        for line in &lines {
            let pad = box_width - 1 - display_width(line);
            let content = format!("{} {}{}{}", style, line, " ".repeat(pad), RESET);
            self.emit(&lead, &content);
        }
    }

    fn table_lines(&mut self, table: &TableBuilder) {
        let cols = table
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(table.head.len()))
            .max()
            .unwrap_or(0);
        if cols == 0 {
            return;
        }

        let mut widths = vec![1; cols];
        for row in std::iter::once(&table.head).chain(&table.rows) {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(display_width(cell));
            }
        }

        let border_color = self.color("table_border").to_string();
        let border = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            paint(&format!("{}{}{}", left, segments.join(mid), right), &border_color)
        };
        let row_line = |row: &[String], color: &str| {
            let bar = paint("│", &border_color);
            let mut line = bar.clone();
            for (i, width) in widths.iter().enumerate() {
                let cell = row.get(i).map(String::as_str).unwrap_or("");
                let align = table.align.get(i).copied().unwrap_or(Alignment::None);
                line.push(' ');
                line.push_str(&paint(&align_cell(cell, *width, align), color));
                line.push(' ');
                line.push_str(&bar);
            }
            line
        };

        let lead = " ".repeat(self.indent());
        let mut lines = vec![border("┌", "┬", "┐")];
        lines.push(row_line(table.head.as_slice(), self.color("table_header")));
        if !table.rows.is_empty() {
            lines.push(border("├", "┼", "┤"));
        }
        for row in &table.rows {
            lines.push(row_line(row.as_slice(), self.color("table_row")));
        }
        lines.push(border("└", "┴", "┘"));

        for line in &lines {
            self.emit(&lead, line);
        }
    }

    fn finish(mut self) -> String {
        self.flush();
        self.flush_marker();
        while self.out.ends_with("\n\n") {
            self.out.pop();
        }
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use vte::{Params, Parser as VteParser, Perform};

    /// Collects only what a terminal would show
    struct Visible(String);

    impl Perform for Visible {
        fn print(&mut self, c: char) {
            self.0.push(c);
        }

        fn execute(&mut self, byte: u8) {
            if byte == b'\n' || byte == b'\t' {
                self.0.push(byte as char);
            }
        }

        fn hook(&mut self, _params: &Params, _intermediates: &[u8], _ignore: bool, _action: char) {}

        fn put(&mut self, _byte: u8) {}

        fn unhook(&mut self) {}

        fn osc_dispatch(&mut self, _params: &[&[u8]], _bell_terminated: bool) {}

        fn csi_dispatch(
            &mut self,
            _params: &Params,
            _intermediates: &[u8],
            _ignore: bool,
            _action: char,
        ) {
        }

        fn esc_dispatch(&mut self, _intermediates: &[u8], _ignore: bool, _byte: u8) {}
    }

    fn strip(text: &str) -> String {
        let mut visible = Visible(String::new());
        let mut parser = VteParser::new();
        for byte in text.bytes() {
            parser.advance(&mut visible, byte);
        }
        visible.0
    }

    fn render(source: &str, width: usize) -> String {
        TermRenderer::default().render(source, width)
    }

    #[test]
    fn test_heading_and_paragraph() {
        let out = render("# Title\n\nBody text", 80);
        assert_eq!(strip(&out), "    # Title\n\n    Body text\n");
        assert!(out.contains(BOLD));
    }

    #[test]
    fn test_wraps_at_width_minus_padding() {
        // 13 columns leave 8 for text
        let out = render("aaa bbb ccc", 13);
        assert_eq!(strip(&out), "    aaa bbb\n    ccc\n");
    }

    #[test]
    fn test_nested_bullets() {
        let out = render("- one\n- two\n  - nested", 80);
        assert_eq!(strip(&out), "    • one\n    • two\n      • nested\n");
    }

    #[test]
    fn test_ordered_list_numbers() {
        let out = render("3. a\n4. b", 80);
        assert_eq!(strip(&out), "    3. a\n    4. b\n");
    }

    #[test]
    fn test_task_items() {
        let out = render("- [x] done\n- [ ] todo", 80);
        assert_eq!(strip(&out), "    • [x] done\n    • [ ] todo\n");
    }

    #[test]
    fn test_code_block_box() {
        let out = render("```\nlet x = 1;\n```", 20);
        assert_eq!(strip(&out), "     let x = 1;    \n");
        assert!(out.contains("\x1b[48;5;235m"));
    }

    #[test]
    fn test_code_block_tabs_expanded() {
        let out = render("```\n\tx\n```", 20);
        assert_eq!(strip(&out), "         x         \n");
    }

    #[test]
    fn test_links_show_url() {
        assert_eq!(strip(&render("[site](http://x.io)", 80)), "    site (http://x.io)\n");
        assert_eq!(strip(&render("<http://x.io>", 80)), "    http://x.io\n");
    }

    #[test]
    fn test_table() {
        let out = render("| a | bb |\n|---|--:|\n| 1 | 2 |", 80);
        assert_eq!(
            strip(&out),
            "    ┌───┬────┐\n    │ a │ bb │\n    ├───┼────┤\n    │ 1 │  2 │\n    └───┴────┘\n"
        );
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(strip(&render("> quoted", 80)), "    │ quoted\n");
    }

    #[test]
    fn test_rule_spans_text_width() {
        let out = render("a\n\n---\n\nb", 10);
        assert_eq!(strip(&out), "    a\n\n    ─────\n\n    b\n");
    }

    #[test]
    fn test_inline_styles() {
        let out = render("*it* **b** ~~s~~ `c`", 80);
        assert_eq!(strip(&out), "    it b s c\n");
        assert!(out.contains(ITALIC));
        assert!(out.contains(BOLD));
        assert!(out.contains(STRIKE));
        assert!(out.contains("\x1b[38;5;226mc"));
    }

    #[test]
    fn test_every_line_ends_with_newline() {
        let out = render("# A\n\ntext\n\n- x\n- y\n\n```\ncode\n```", 40);
        assert!(out.ends_with('\n'));
        assert!(!out.ends_with("\n\n"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render("", 80), "");
    }
}
