//! Term-frequency relevance scoring.
//!
//! Both the query and the segment are normalized (lowercase, diacritics
//! stripped) before matching. The score is the sum over whitespace-split
//! query terms of non-overlapping occurrence counts in the segment.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lowercase with diacritics stripped. Idempotent.
pub fn normalize_for_match(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Non-negative term-occurrence score of `segment` for `query`.
pub fn score_segment(segment: &str, query: &str) -> u32 {
    let segment = normalize_for_match(segment);
    normalize_for_match(query)
        .split_whitespace()
        .map(|term| segment.matches(term).count() as u32)
        .sum()
}
