use serde::{Deserialize, Serialize};

/// Colors for rendered markdown elements and search highlights, as `#rrggbb`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorTable {
    pub heading1: String,
    pub heading2: String,
    pub heading3: String,
    pub heading4: String,
    pub heading5: String,
    pub heading6: String,

    pub bold: String,
    pub italic: String,
    pub strikethrough: String,
    pub link: String,
    pub link_url: String,

    pub code: String,
    pub code_block: String,
    pub code_block_bg: String,

    pub list_marker: String,
    pub task_checked: String,
    pub task_unchecked: String,

    pub blockquote: String,
    pub table_header: String,
    pub table_row: String,
    pub table_border: String,

    pub search_current: String,
    pub search_match: String,
}

impl Default for ColorTable {
    fn default() -> Self {
        let hex = |s: &str| s.to_string();
        Self {
            // Blue shades, brightest first
            heading1: hex("#00d7ff"),
            heading2: hex("#00afff"),
            heading3: hex("#0087ff"),
            heading4: hex("#005fff"),
            heading5: hex("#0037ff"),
            heading6: hex("#001fff"),

            bold: hex("#ffffff"),
            italic: hex("#87ff00"),
            strikethrough: hex("#808080"),
            link: hex("#00ffff"),
            link_url: hex("#0087af"),

            code: hex("#ffff00"),
            code_block: hex("#d7ff00"),
            code_block_bg: hex("#262626"),

            list_marker: hex("#ff8700"),
            task_checked: hex("#00ff00"),
            task_unchecked: hex("#ff0000"),

            blockquote: hex("#808080"),
            table_header: hex("#ffff00"),
            table_row: hex("#ffffff"),
            table_border: hex("#808080"),

            search_current: hex("#ffff00"),
            search_match: hex("#ff8700"),
        }
    }
}

impl ColorTable {
    /// Look a color up by its configuration key
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "heading1" => &self.heading1,
            "heading2" => &self.heading2,
            "heading3" => &self.heading3,
            "heading4" => &self.heading4,
            "heading5" => &self.heading5,
            "heading6" => &self.heading6,
            "bold" => &self.bold,
            "italic" => &self.italic,
            "strikethrough" => &self.strikethrough,
            "link" => &self.link,
            "link_url" => &self.link_url,
            "code" => &self.code,
            "code_block" => &self.code_block,
            "code_block_bg" => &self.code_block_bg,
            "list_marker" => &self.list_marker,
            "task_checked" => &self.task_checked,
            "task_unchecked" => &self.task_unchecked,
            "blockquote" => &self.blockquote,
            "table_header" => &self.table_header,
            "table_row" => &self.table_row,
            "table_border" => &self.table_border,
            "search_current" => &self.search_current,
            "search_match" => &self.search_match,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Replace blank entries with their defaults
    pub fn fill_blanks(&mut self) {
        let mut defaults = Self::default();
        for (value, default) in self.fields_mut().into_iter().zip(defaults.fields_mut()) {
            if value.trim().is_empty() {
                *value = std::mem::take(default);
            }
        }
    }

    fn fields_mut(&mut self) -> [&mut String; 23] {
        [
            &mut self.heading1,
            &mut self.heading2,
            &mut self.heading3,
            &mut self.heading4,
            &mut self.heading5,
            &mut self.heading6,
            &mut self.bold,
            &mut self.italic,
            &mut self.strikethrough,
            &mut self.link,
            &mut self.link_url,
            &mut self.code,
            &mut self.code_block,
            &mut self.code_block_bg,
            &mut self.list_marker,
            &mut self.task_checked,
            &mut self.task_unchecked,
            &mut self.blockquote,
            &mut self.table_header,
            &mut self.table_row,
            &mut self.table_border,
            &mut self.search_current,
            &mut self.search_match,
        ]
    }

    /// Heading color for levels 1-6; deeper levels reuse level 6
    pub fn heading(&self, level: usize) -> &str {
        match level {
            0 | 1 => &self.heading1,
            2 => &self.heading2,
            3 => &self.heading3,
            4 => &self.heading4,
            5 => &self.heading5,
            _ => &self.heading6,
        }
    }
}
