//! Per-format plain-text extraction, dispatched by filename extension.
//!
//! An unsupported extension or a decoder failure yields an empty string —
//! the designed "no usable text" signal that drops the candidate from
//! scoring without aborting the batch.

pub mod docx;
pub mod pdf;
pub mod txt;

use crate::error::Result;

pub fn extract_text(bytes: &[u8], filename: &str) -> String {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());

    let result: Result<String> = match extension.as_deref() {
        Some("pdf") => pdf::extract(bytes),
        Some("docx") => docx::extract(bytes),
        Some("txt") => txt::extract(bytes),
        _ => return String::new(),
    };

    match result {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(file = filename, error = %e, "extraction failed; treating as no usable text");
            String::new()
        }
    }
}
