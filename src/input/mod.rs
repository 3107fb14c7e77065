mod action;
mod key;

pub use action::{Action, ActionMap};
pub use key::{Key, KeyChord};
