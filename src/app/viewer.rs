use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use std::time::Duration;

use super::help::{help_lines, HELP_TITLE};
use super::session::{Outcome, Session};
use crate::config::Config;
use crate::input::{ActionMap, Key, KeyChord};
use crate::markdown::TermRenderer;
use crate::render::{BottomRow, HighlightStyle, Popup, Screen};

const SEARCH_LABEL: &str = "/";

/// Interactive terminal viewer for one document
pub struct Viewer {
    screen: Screen,
    session: Session<TermRenderer>,
    actions: ActionMap,
    help: Vec<String>,
    name: String,
    running: bool,
}

impl Viewer {
    pub fn new(config: &Config, name: &str, text: String) -> Result<Self> {
        let renderer = TermRenderer::new(config.colors.clone());
        let mut session = Session::new(renderer, HighlightStyle::from_colors(&config.colors));
        session.load_document(text);

        let actions = ActionMap::from_bindings(&config.keybindings);
        tracing::debug!(bindings = actions.len(), "resolved key bindings");

        Ok(Self {
            screen: Screen::new()?,
            session,
            actions,
            help: help_lines(&config.keybindings),
            name: name.to_string(),
            running: true,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.screen.enter_raw_mode()?;
        let result = self.event_loop();
        self.screen.leave_raw_mode()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        self.screen.refresh_size()?;
        self.render()?;

        while self.running {
            if event::poll(Duration::from_millis(250))? {
                self.process_event(event::read()?);

                // Drain queued events before drawing
                while self.running && event::poll(Duration::from_millis(0))? {
                    self.process_event(event::read()?);
                }

                if self.running {
                    self.render()?;
                }
            }
        }

        Ok(())
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Key(key_event) => self.process_key(key_event),
            Event::Resize(cols, rows) => {
                self.screen.cols = cols;
                self.screen.rows = rows;
            }
            _ => {}
        }
    }

    fn process_key(&mut self, key_event: KeyEvent) {
        if key_event.kind != KeyEventKind::Press {
            return;
        }
        let (key, mods) = Key::from_crossterm(key_event);

        if self.session.is_entering_search() {
            match key {
                Key::Enter => self.session.commit_search_entry(),
                Key::Escape => self.session.cancel_search_entry(),
                Key::Char('c') | Key::Char('g') if mods.ctrl => self.session.cancel_search_entry(),
                Key::Backspace => self.session.pop_search_char(),
                Key::Char(c) if !mods.ctrl && !mods.alt => self.session.push_search_char(c),
                _ => {}
            }
            return;
        }

        if self.session.help_visible() {
            if matches!(
                key,
                Key::Escape | Key::Enter | Key::Char(' ') | Key::Char('q') | Key::Char('?')
            ) {
                self.session.close_help();
            }
            return;
        }

        let chord = KeyChord::from_key(key, mods);
        if let Some(action) = self.actions.lookup(&chord) {
            tracing::trace!(?action, "dispatch");
            if self.session.dispatch(action) == Outcome::Quit {
                self.running = false;
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        self.screen.refresh_size()?;
        self.session
            .resize(self.screen.cols as usize, self.screen.rows as usize);

        let entry = self.session.entry().map(str::to_string);
        let status = self.session.status_text();
        let right = if status.is_empty() {
            self.session.position_text()
        } else {
            format!("{}  {}", status, self.session.position_text())
        };
        let viewport = self.session.viewport().clone();
        let show_help = self.session.help_visible();

        let bottom = match &entry {
            Some(input) => BottomRow::Prompt {
                label: SEARCH_LABEL,
                input,
            },
            None => BottomRow::Status {
                left: &self.name,
                right: &right,
            },
        };
        let popup = Popup {
            title: HELP_TITLE,
            lines: &self.help,
        };

        let display = self.session.display_bytes();
        self.screen
            .render(&display, &viewport, &bottom, show_help.then_some(&popup))
    }
}
