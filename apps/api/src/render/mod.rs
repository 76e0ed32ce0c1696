//! Renderer — the pure function from a `ResumeRecord` to PDF bytes.

mod encoding;
pub mod pdf;

use thiserror::Error;

use crate::cv::models::ResumeRecord;
use crate::layout::{layout_resume, Document, DrawOp};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Character {ch:?} ({}) cannot be encoded in the built-in PDF fonts", .ch.escape_unicode())]
    UnsupportedCharacter { ch: char },

    #[error("PDF serialization failed: {0}")]
    Pdf(String),
}

impl From<serde_json::Error> for RenderError {
    fn from(e: serde_json::Error) -> Self {
        RenderError::MalformedRecord(e.to_string())
    }
}

/// Lays out and paints the CV. No I/O; the record is only read.
pub fn render(record: &ResumeRecord) -> Result<Vec<u8>, RenderError> {
    let mut document = layout_resume(record);
    prepare_text(&mut document)?;
    pdf::paint(&document, &format!("CV - {}", record.name))
}

/// The built-in fonts are WinAnsi-encoded and the writer drops anything without a
/// code, so text is normalized and then every remaining character must encode.
fn prepare_text(document: &mut Document) -> Result<(), RenderError> {
    for op in document.pages.iter_mut().flat_map(|page| &mut page.ops) {
        if let DrawOp::Text { text, .. } = op {
            *text = encoding::normalize(text);
            encoding::check(text)?;
        }
    }
    Ok(())
}
