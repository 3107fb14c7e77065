//! In-document search
//!
//! Matches are located in the rendered output, not the markdown source,
//! so line numbers line up with what the viewport scrolls through.

mod matches;
mod state;

pub use matches::SearchMatch;
pub use state::SearchState;
