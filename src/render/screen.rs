use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{stdout, Stdout, Write};
use unicode_width::UnicodeWidthStr;

use super::clip::clip_line;
use crate::color::RESET;
use crate::view::Viewport;

const STATUS_BG: Color = Color::DarkGrey;
const STATUS_FG: Color = Color::White;
const POPUP_BG: Color = Color::AnsiValue(236);
const POPUP_BORDER: Color = Color::AnsiValue(243);

// Largest help popup, before shrinking to fit the terminal
const POPUP_WIDTH: usize = 60;
const POPUP_HEIGHT: usize = 30;

/// What the bottom row shows
pub enum BottomRow<'a> {
    Status { left: &'a str, right: &'a str },
    Prompt { label: &'a str, input: &'a str },
}

/// Help popup contents
pub struct Popup<'a> {
    pub title: &'a str,
    pub lines: &'a [String],
}

/// Terminal screen renderer
pub struct Screen {
    stdout: Stdout,
    pub rows: u16,
    pub cols: u16,
    keyboard_enhanced: bool,
}

impl Screen {
    pub fn new() -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            stdout: stdout(),
            rows,
            cols,
            keyboard_enhanced: false,
        })
    }

    pub fn enter_raw_mode(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, EnterAlternateScreen, Hide)?;

        // Kitty keyboard protocol, where supported, reports Ctrl chords unambiguously
        if execute!(
            self.stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )
        .is_ok()
        {
            self.keyboard_enhanced = true;
        }

        Ok(())
    }

    pub fn leave_raw_mode(&mut self) -> Result<()> {
        if self.keyboard_enhanced {
            let _ = execute!(self.stdout, PopKeyboardEnhancementFlags);
        }
        execute!(self.stdout, Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn refresh_size(&mut self) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        self.cols = cols;
        self.rows = rows;
        Ok(())
    }

    /// Rows available for document text; the last row is the status bar
    pub fn text_rows(&self) -> usize {
        self.rows.saturating_sub(1) as usize
    }

    /// Draw one frame: the visible part of `display`, the bottom row and
    /// optionally the help popup on top
    pub fn render(
        &mut self,
        display: &str,
        viewport: &Viewport,
        bottom: &BottomRow<'_>,
        popup: Option<&Popup<'_>>,
    ) -> Result<()> {
        execute!(self.stdout, Hide)?;

        let lines: Vec<&str> = display.split('\n').collect();
        let cols = self.cols as usize;

        for row in 0..self.text_rows() {
            execute!(self.stdout, MoveTo(0, row as u16))?;
            if let Some(line) = lines.get(viewport.y_offset() + row) {
                let visible = clip_line(line, viewport.x_offset(), cols);
                execute!(self.stdout, Print(visible), Print(RESET))?;
            }
            execute!(self.stdout, Clear(ClearType::UntilNewLine))?;
        }

        if let Some(popup) = popup {
            self.render_popup(popup)?;
        }

        let cursor_col = self.render_bottom_row(bottom)?;
        match cursor_col {
            Some(col) => execute!(self.stdout, MoveTo(col, self.rows.saturating_sub(1)), Show)?,
            None => execute!(self.stdout, Hide)?,
        }

        self.stdout.flush()?;
        Ok(())
    }

    /// Returns the cursor column when the row is an input prompt
    fn render_bottom_row(&mut self, bottom: &BottomRow<'_>) -> Result<Option<u16>> {
        let row = self.rows.saturating_sub(1);
        let cols = self.cols as usize;
        execute!(self.stdout, MoveTo(0, row))?;

        match bottom {
            BottomRow::Status { left, right } => {
                let left = format!(" {}", left);
                let right = format!("{} ", right);
                let padding = cols.saturating_sub(left.width() + right.width());
                let line = format!("{}{}{}", left, " ".repeat(padding), right);
                execute!(
                    self.stdout,
                    SetBackgroundColor(STATUS_BG),
                    SetForegroundColor(STATUS_FG),
                    Print(clip_line(&line, 0, cols)),
                    Clear(ClearType::UntilNewLine),
                    ResetColor
                )?;
                Ok(None)
            }
            BottomRow::Prompt { label, input } => {
                let text = format!("{}{}", label, input);
                // Keep the end of long input visible
                let start = (text.width() + 1).saturating_sub(cols);
                execute!(
                    self.stdout,
                    ResetColor,
                    Print(clip_line(&text, start, cols)),
                    Clear(ClearType::UntilNewLine)
                )?;
                let col = text.width().saturating_sub(start).min(cols.saturating_sub(1));
                Ok(Some(col as u16))
            }
        }
    }

    fn render_popup(&mut self, popup: &Popup<'_>) -> Result<()> {
        let cols = self.cols as usize;
        let rows = self.rows as usize;
        let width = POPUP_WIDTH.min(cols.saturating_sub(4));
        let height = POPUP_HEIGHT.min(rows.saturating_sub(4));
        if width < 4 || height < 3 {
            return Ok(());
        }

        let x0 = ((cols - width) / 2) as u16;
        let y0 = ((rows - height) / 2) as u16;
        let inner = width - 2;

        let title = clip_line(popup.title, 0, inner);
        let top_fill = inner.saturating_sub(title.width());
        let top = format!("┌{}{}┐", title, "─".repeat(top_fill));
        let bottom = format!("└{}┘", "─".repeat(inner));

        execute!(
            self.stdout,
            SetBackgroundColor(POPUP_BG),
            SetForegroundColor(POPUP_BORDER),
            MoveTo(x0, y0),
            Print(top)
        )?;

        for i in 0..height - 2 {
            let text = popup.lines.get(i).map(String::as_str).unwrap_or("");
            let body = clip_line(text, 0, inner);
            let fill = inner.saturating_sub(body.width());
            execute!(
                self.stdout,
                MoveTo(x0, y0 + 1 + i as u16),
                SetForegroundColor(POPUP_BORDER),
                Print("│"),
                SetForegroundColor(Color::White),
                Print(body),
                Print(" ".repeat(fill)),
                SetForegroundColor(POPUP_BORDER),
                Print("│")
            )?;
        }

        execute!(
            self.stdout,
            MoveTo(x0, y0 + height as u16 - 1),
            Print(bottom),
            ResetColor
        )?;
        Ok(())
    }
}
