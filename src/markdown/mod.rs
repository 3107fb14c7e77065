//! Markdown to styled terminal text

mod renderer;
mod wrap;

pub use renderer::TermRenderer;

/// Turns document source into styled lines for a given screen width.
///
/// The output is a sequence of `\n`-terminated lines which may contain SGR
/// escape sequences; each line resets its own styling.
pub trait Renderer {
    fn render(&self, source: &str, width: usize) -> String;
}
