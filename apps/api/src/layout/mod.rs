// Page layout for the generated CV.
// Pure computation: records go in, positioned draw ops come out. Painting lives in `render`.

pub mod document;
pub mod font_metrics;
pub mod resume;

pub use document::{Document, DrawOp};
pub use font_metrics::FontStyle;
pub use resume::layout_resume;
