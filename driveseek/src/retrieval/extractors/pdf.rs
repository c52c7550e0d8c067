use crate::error::{DriveseekError, Result};

/// Text-layer extraction; layout order is whatever the decoder produces.
pub fn extract(bytes: &[u8]) -> Result<String> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| DriveseekError::Processing(format!("PDF parse error: {e}")))
}
