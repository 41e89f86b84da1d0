//! PDF text extraction by walking the page tree.
//!
//! For each page, the content stream's text-show operators (Tj, TJ, ', ")
//! are decoded into text runs. Runs are joined with single spaces within a
//! page; pages are joined with a blank line. Kerning offsets, positioning
//! and font encodings beyond the string data itself are ignored.

use lopdf::content::Content;
use lopdf::{Document, Object};

use super::ExtractionError;

/// Extract text from a PDF, one blank-line-separated segment per page,
/// in page order.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
    Ok(extract_pages(pdf_bytes)?.join("\n\n"))
}

/// Extract per-page text segments in page order.
pub fn extract_pages(pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    let doc =
        Document::load_mem(pdf_bytes).map_err(|e| ExtractionError::PdfParsing(e.to_string()))?;

    let mut pages = Vec::new();
    // get_pages is keyed by 1-based page number, iterated in order
    for (_number, page_id) in doc.get_pages() {
        let data = doc
            .get_page_content(page_id)
            .map_err(|e| ExtractionError::ContentDecode(e.to_string()))?;
        let content =
            Content::decode(&data).map_err(|e| ExtractionError::ContentDecode(e.to_string()))?;

        let mut runs: Vec<String> = Vec::new();
        for op in &content.operations {
            match op.operator.as_str() {
                // Tj and ' take a single string operand
                "Tj" | "'" => {
                    if let Some(Object::String(bytes, _)) = op.operands.last() {
                        push_run(&mut runs, decode_string(bytes));
                    }
                }
                // " takes (aw, ac, string)
                "\"" => {
                    if let Some(Object::String(bytes, _)) = op.operands.get(2) {
                        push_run(&mut runs, decode_string(bytes));
                    }
                }
                // TJ takes an array of strings interleaved with kerning numbers
                "TJ" => {
                    if let Some(Object::Array(items)) = op.operands.first() {
                        let mut run = String::new();
                        for item in items {
                            if let Object::String(bytes, _) = item {
                                run.push_str(&decode_string(bytes));
                            }
                        }
                        push_run(&mut runs, run);
                    }
                }
                _ => {}
            }
        }

        pages.push(runs.join(" "));
    }

    Ok(pages)
}

fn push_run(runs: &mut Vec<String>, run: String) {
    let trimmed = run.trim();
    if !trimmed.is_empty() {
        runs.push(trimmed.to_string());
    }
}

/// Decode a PDF string object's bytes to text.
///
/// A UTF-16BE BOM selects UTF-16; otherwise bytes are taken as UTF-8 when
/// valid, falling back to a Latin-1 interpretation (a superset of
/// PDFDocEncoding's printable range).
fn decode_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}
