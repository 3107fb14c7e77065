mod clip;
mod highlight;
mod pipeline;
mod screen;

pub use highlight::HighlightStyle;
pub use pipeline::{Document, RenderPipeline};
pub use screen::{BottomRow, Popup, Screen};
