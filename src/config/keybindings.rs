use serde::{Deserialize, Serialize};

use crate::input::Action;

/// Key names bound to each action, e.g. `"j"`, `"PgDn"` or `"C-f"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub scroll_up: Vec<String>,
    pub scroll_down: Vec<String>,
    pub scroll_left: Vec<String>,
    pub scroll_right: Vec<String>,
    pub page_up: Vec<String>,
    pub page_down: Vec<String>,
    pub go_to_top: Vec<String>,
    pub go_to_bottom: Vec<String>,

    pub start_search: Vec<String>,
    pub next_match: Vec<String>,
    pub prev_match: Vec<String>,
    pub clear_search: Vec<String>,
    pub toggle_case: Vec<String>,

    pub show_help: Vec<String>,
    pub quit: Vec<String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for KeyBindings {
    fn default() -> Self {
        // Vim keys plus the Colemak-DH equivalents (i=up, e=down, o=right)
        Self {
            scroll_up: keys(&["k", "i", "Up"]),
            scroll_down: keys(&["j", "e", "Down"]),
            scroll_left: keys(&["h", "Left"]),
            scroll_right: keys(&["l", "o", "Right"]),
            page_up: keys(&["PageUp", "C-b"]),
            page_down: keys(&["PageDown", "Space", "C-f"]),
            go_to_top: keys(&["g", "Home"]),
            go_to_bottom: keys(&["G", "End"]),

            start_search: keys(&["/", "C-s"]),
            next_match: keys(&["n"]),
            prev_match: keys(&["N"]),
            clear_search: keys(&["c"]),
            toggle_case: keys(&["C-t"]),

            show_help: keys(&["?"]),
            quit: keys(&["q", "C-c"]),
        }
    }
}

impl KeyBindings {
    /// Every action paired with its configured key names
    pub fn entries(&self) -> Vec<(Action, &[String])> {
        vec![
            (Action::ScrollUp, self.scroll_up.as_slice()),
            (Action::ScrollDown, self.scroll_down.as_slice()),
            (Action::ScrollLeft, self.scroll_left.as_slice()),
            (Action::ScrollRight, self.scroll_right.as_slice()),
            (Action::PageUp, self.page_up.as_slice()),
            (Action::PageDown, self.page_down.as_slice()),
            (Action::GoToTop, self.go_to_top.as_slice()),
            (Action::GoToBottom, self.go_to_bottom.as_slice()),
            (Action::StartSearch, self.start_search.as_slice()),
            (Action::SearchNext, self.next_match.as_slice()),
            (Action::SearchPrev, self.prev_match.as_slice()),
            (Action::ClearSearch, self.clear_search.as_slice()),
            (Action::ToggleCaseSensitive, self.toggle_case.as_slice()),
            (Action::ShowHelp, self.show_help.as_slice()),
            (Action::Quit, self.quit.as_slice()),
        ]
    }

    /// Key names for one action
    pub fn keys_for(&self, action: Action) -> &[String] {
        self.entries()
            .into_iter()
            .find(|(a, _)| *a == action)
            .map(|(_, keys)| keys)
            .unwrap_or_default()
    }
}
