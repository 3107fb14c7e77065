use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

/// Key modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    #[allow(dead_code)]
    pub shift: bool,
}

impl From<KeyModifiers> for Modifiers {
    fn from(m: KeyModifiers) -> Self {
        Self {
            ctrl: m.contains(KeyModifiers::CONTROL),
            alt: m.contains(KeyModifiers::ALT),
            shift: m.contains(KeyModifiers::SHIFT),
        }
    }
}

/// Abstracted key input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Null,
}

impl Key {
    pub fn from_crossterm(event: KeyEvent) -> (Self, Modifiers) {
        let modifiers = Modifiers::from(event.modifiers);
        let key = match event.code {
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Delete => Key::Delete,
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Esc => Key::Escape,
            KeyCode::Up => Key::Up,
            KeyCode::Down => Key::Down,
            KeyCode::Left => Key::Left,
            KeyCode::Right => Key::Right,
            KeyCode::Home => Key::Home,
            KeyCode::End => Key::End,
            KeyCode::PageUp => Key::PageUp,
            KeyCode::PageDown => Key::PageDown,
            _ => Key::Null,
        };
        (key, modifiers)
    }
}

/// A key as it appears in a binding: the key itself plus whether Ctrl is held.
///
/// Shift is folded into the character (`G` rather than shift+`g`) and Alt
/// is not bindable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyChord {
    pub const fn plain(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    pub const fn ctrl(key: Key) -> Self {
        Self { key, ctrl: true }
    }

    pub fn from_key(key: Key, mods: Modifiers) -> Self {
        let key = match key {
            Key::Char(c) if mods.ctrl => Key::Char(c.to_ascii_lowercase()),
            other => other,
        };
        Self {
            key,
            ctrl: mods.ctrl,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyParseError {
    #[error("empty key name")]
    Empty,
    #[error("unknown key name {0:?}")]
    Unknown(String),
}

/// Parse a configured key name.
///
/// `C-x` and `Ctrl-x` bind Ctrl with a letter; named keys such as `Up`,
/// `PgDn` or `Esc` are matched case-sensitively; any other single character
/// binds that character.
pub fn parse_key(name: &str) -> Result<KeyChord, KeyParseError> {
    if name.is_empty() {
        return Err(KeyParseError::Empty);
    }

    if let Some(rest) = name
        .strip_prefix("C-")
        .or_else(|| name.strip_prefix("Ctrl-"))
    {
        let mut chars = rest.chars();
        return match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                Ok(KeyChord::ctrl(Key::Char(c.to_ascii_lowercase())))
            }
            _ => Err(KeyParseError::Unknown(name.to_string())),
        };
    }

    let key = match name {
        "Up" | "ArrowUp" => Key::Up,
        "Down" | "ArrowDown" => Key::Down,
        "Left" | "ArrowLeft" => Key::Left,
        "Right" | "ArrowRight" => Key::Right,
        "PageUp" | "PgUp" => Key::PageUp,
        "PageDown" | "PgDn" | "PageDn" => Key::PageDown,
        "Space" | " " => Key::Char(' '),
        "Enter" | "Return" => Key::Enter,
        "Escape" | "Esc" => Key::Escape,
        "Tab" => Key::Tab,
        "Backspace" => Key::Backspace,
        "Delete" | "Del" => Key::Delete,
        "Home" => Key::Home,
        "End" => Key::End,
        _ => {
            let mut chars = name.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return Err(KeyParseError::Unknown(name.to_string())),
            }
        }
    };
    Ok(KeyChord::plain(key))
}
