//! Sequential non-overlapping slicing of extracted text.

/// Hard cap on segments per document. Documents longer than
/// `max_chars * SEGMENT_CAP` are only partially represented in scoring; an
/// accepted precision/cost trade-off.
pub const SEGMENT_CAP: usize = 50;

/// Splits `text` into consecutive windows of exactly `max_chars` characters
/// (the final window may be shorter), starting at offset 0, stopping at
/// [`SEGMENT_CAP`] even if text remains.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    if text.is_empty() || max_chars == 0 {
        return Vec::new();
    }

    let mut segments = Vec::new();
    let mut chars = text.chars();
    while segments.len() < SEGMENT_CAP {
        let segment: String = chars.by_ref().take(max_chars).collect();
        if segment.is_empty() {
            break;
        }
        segments.push(segment);
    }
    segments
}
