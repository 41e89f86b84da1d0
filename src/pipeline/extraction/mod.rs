//! Text extraction for uploaded contract files.
//!
//! PDFs get a structural walk (pages → text runs); everything else is
//! treated as plain text. No OCR and no layout reconstruction: whitespace
//! and reading order are best-effort run concatenation.

pub mod pdf;
pub mod text;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("PDF content stream could not be decoded: {0}")]
    ContentDecode(String),
}

pub const PDF_MIME: &str = "application/pdf";

/// Extract plain text from `bytes` according to the uploaded MIME type.
pub fn extract(bytes: &[u8], file_type: &str) -> Result<String, ExtractionError> {
    if file_type == PDF_MIME {
        pdf::extract_text(bytes)
    } else {
        Ok(text::extract_text(bytes))
    }
}
