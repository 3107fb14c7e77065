use crate::config::KeyBindings;
use crate::input::Action;

/// Title of the help popup
pub const HELP_TITLE: &str = " Keybindings (Esc to close) ";

const RULE: &str = " ═══════════════════════════════════════════════";

const SECTIONS: &[(&str, &[Action])] = &[
    (
        "NAVIGATION",
        &[
            Action::ScrollUp,
            Action::ScrollDown,
            Action::ScrollLeft,
            Action::ScrollRight,
            Action::PageUp,
            Action::PageDown,
            Action::GoToTop,
            Action::GoToBottom,
        ],
    ),
    (
        "SEARCH",
        &[
            Action::StartSearch,
            Action::SearchNext,
            Action::SearchPrev,
            Action::ClearSearch,
            Action::ToggleCaseSensitive,
        ],
    ),
    ("GENERAL", &[Action::ShowHelp, Action::Quit]),
];

const NOTES: &[&str] = &[
    "  • Vim navigation keys are supported",
    "  • Colemak-DH layout is also supported",
    "    (i=up, e=down, o=right)",
    "  • Search is case-insensitive unless toggled",
    "  • While searching:",
    "    - Enter to execute search",
    "    - Esc, Ctrl+C or Ctrl+G to cancel",
];

/// Help popup body listing every action with its configured keys
pub fn help_lines(bindings: &KeyBindings) -> Vec<String> {
    let mut lines = Vec::new();

    for (title, actions) in SECTIONS {
        lines.push(format!(" {}", title));
        lines.push(RULE.to_string());
        for action in actions.iter() {
            let keys = bindings.keys_for(*action).join(", ");
            lines.push(format!("  {:<20} {}", keys, action.description()));
        }
        lines.push(String::new());
    }

    lines.push(" NOTES".to_string());
    lines.push(RULE.to_string());
    lines.extend(NOTES.iter().map(|s| s.to_string()));
    lines
}
