use std::collections::HashMap;

use super::key::{parse_key, KeyChord};
use crate::config::KeyBindings;

/// Everything a key press can ask the viewer to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    ScrollLeft,
    ScrollRight,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    StartSearch,
    SearchNext,
    SearchPrev,
    ClearSearch,
    ToggleCaseSensitive,
    ShowHelp,
    Quit,
}

impl Action {
    /// Short description for the help popup
    pub fn description(&self) -> &'static str {
        match self {
            Action::ScrollUp => "Move up",
            Action::ScrollDown => "Move down",
            Action::ScrollLeft => "Move left",
            Action::ScrollRight => "Move right",
            Action::PageUp => "Page up",
            Action::PageDown => "Page down",
            Action::GoToTop => "Go to top",
            Action::GoToBottom => "Go to bottom",
            Action::StartSearch => "Start search",
            Action::SearchNext => "Next match",
            Action::SearchPrev => "Previous match",
            Action::ClearSearch => "Clear search",
            Action::ToggleCaseSensitive => "Toggle case sensitivity",
            Action::ShowHelp => "Show this help",
            Action::Quit => "Quit",
        }
    }
}

/// Resolved key bindings
#[derive(Debug, Clone, Default)]
pub struct ActionMap {
    bindings: HashMap<KeyChord, Action>,
}

impl ActionMap {
    /// Resolve configured key names. Names that do not parse are skipped
    /// with a warning; when two actions claim the same key the first one
    /// listed wins.
    pub fn from_bindings(bindings: &KeyBindings) -> Self {
        let mut map = HashMap::new();
        for (action, names) in bindings.entries() {
            for name in names {
                match parse_key(name) {
                    Ok(chord) => {
                        map.entry(chord).or_insert(action);
                    }
                    Err(e) => tracing::warn!("ignoring binding for {:?}: {}", action, e),
                }
            }
        }
        Self { bindings: map }
    }

    pub fn lookup(&self, chord: &KeyChord) -> Option<Action> {
        self.bindings.get(chord).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    #[test]
    fn test_default_bindings_resolve() {
        let map = ActionMap::from_bindings(&KeyBindings::default());
        assert_eq!(map.lookup(&KeyChord::plain(Key::Char('j'))), Some(Action::ScrollDown));
        assert_eq!(map.lookup(&KeyChord::plain(Key::Up)), Some(Action::ScrollUp));
        assert_eq!(map.lookup(&KeyChord::plain(Key::Char(' '))), Some(Action::PageDown));
        assert_eq!(map.lookup(&KeyChord::plain(Key::Char('G'))), Some(Action::GoToBottom));
        assert_eq!(map.lookup(&KeyChord::plain(Key::Char('N'))), Some(Action::SearchPrev));
        assert_eq!(map.lookup(&KeyChord::ctrl(Key::Char('c'))), Some(Action::Quit));
        assert_eq!(map.lookup(&KeyChord::plain(Key::Char('z'))), None);
    }

    #[test]
    fn test_bad_names_are_skipped() {
        let bindings = KeyBindings {
            quit: vec!["Bogus".to_string(), "x".to_string()],
            ..KeyBindings::default()
        };
        let map = ActionMap::from_bindings(&bindings);
        assert_eq!(map.lookup(&KeyChord::plain(Key::Char('x'))), Some(Action::Quit));
        assert_eq!(map.lookup(&KeyChord::plain(Key::Char('q'))), None);
    }

    #[test]
    fn test_first_binding_wins() {
        let bindings = KeyBindings {
            scroll_up: vec!["n".to_string()],
            ..KeyBindings::default()
        };
        let map = ActionMap::from_bindings(&bindings);
        assert_eq!(map.lookup(&KeyChord::plain(Key::Char('n'))), Some(Action::ScrollUp));
    }
}
