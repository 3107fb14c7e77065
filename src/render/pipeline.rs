use std::borrow::Cow;
use std::rc::Rc;

use super::highlight::{self, HighlightStyle};
use crate::markdown::Renderer;
use crate::search::SearchState;

/// Raw document text. Cloning shares the text; a reload creates a new one.
#[derive(Debug, Clone)]
pub struct Document {
    text: Rc<str>,
}

impl Document {
    pub fn new(text: impl Into<Rc<str>>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether both handles refer to the same loaded text
    pub fn same_as(&self, other: &Document) -> bool {
        Rc::ptr_eq(&self.text, &other.text)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

/// Rendered output for one document at one width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub text: String,
    /// Number of line breaks in `text`
    pub line_count: usize,
    /// Screen width `text` was rendered for
    pub width: usize,
}

impl RenderedView {
    pub fn new(text: String, width: usize) -> Self {
        let line_count = text.bytes().filter(|&b| b == b'\n').count();
        Self {
            text,
            line_count,
            width,
        }
    }
}

/// Renders documents on demand and highlights search matches per frame
pub struct RenderPipeline<R> {
    renderer: R,
    style: HighlightStyle,
    cache: Option<(Document, RenderedView)>,
}

impl<R: Renderer> RenderPipeline<R> {
    pub fn new(renderer: R, style: HighlightStyle) -> Self {
        Self {
            renderer,
            style,
            cache: None,
        }
    }

    /// Re-render if the document or width changed since the last call.
    /// Returns whether a render happened.
    pub fn refresh(&mut self, doc: &Document, width: usize) -> bool {
        if let Some((cached_doc, view)) = &self.cache {
            if cached_doc.same_as(doc) && view.width == width {
                return false;
            }
        }

        let view = RenderedView::new(self.renderer.render(doc.as_str(), width), width);
        tracing::debug!(width, lines = view.line_count, "rendered document");
        self.cache = Some((doc.clone(), view));
        true
    }

    /// The last rendered output, without highlighting
    pub fn view(&self) -> Option<&RenderedView> {
        self.cache.as_ref().map(|(_, view)| view)
    }

    #[cfg(test)]
    pub(crate) fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Bytes to display for `doc` at `width`.
    ///
    /// Highlighting always starts from the cached unhighlighted render.
    pub fn display_bytes(
        &mut self,
        doc: &Document,
        width: usize,
        search: &SearchState,
    ) -> Cow<'_, str> {
        self.refresh(doc, width);
        match &self.cache {
            Some((_, view)) => highlight::apply(&view.text, search, &self.style),
            None => Cow::Borrowed(""),
        }
    }
}
