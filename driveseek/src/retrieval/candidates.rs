//! Candidate selection: which files are worth downloading for a query.
//!
//! A non-empty path prefix selects traversal over that subtree; otherwise a
//! drive-wide search runs in the store's relevance order. Both branches are
//! filtered to allowed extensions and truncated to a processing budget that
//! bounds worst-case download/extraction cost regardless of how many matches
//! exist. Duplicates are not suppressed.

use crate::error::Result;
use crate::graph::models::DriveItem;
use crate::graph::walker::{self, ChildLister};
use crate::graph::GraphClient;

/// Processing budget for one retrieval request.
pub fn candidate_cap(top_k: usize) -> usize {
    (top_k * 4).max(20)
}

/// Lowercases and strips leading dots so `".PDF"`, `"pdf"` and `"Pdf"` all
/// match the same literal suffix.
pub fn normalize_file_types(file_types: &[String]) -> Vec<String> {
    file_types
        .iter()
        .map(|t| t.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Keeps files whose extension is in `allowed`, truncated to `cap`.
pub fn filter_candidates(
    items: Vec<DriveItem>,
    allowed: &[String],
    cap: usize,
) -> Vec<DriveItem> {
    items
        .into_iter()
        .filter(|item| item.is_file())
        .filter(|item| {
            item.extension()
                .map(|ext| allowed.contains(&ext))
                .unwrap_or(false)
        })
        .take(cap)
        .collect()
}

pub async fn select_candidates(
    client: &GraphClient,
    query: &str,
    path_prefix: Option<&str>,
    top_k: usize,
    file_types: &[String],
) -> Result<Vec<DriveItem>> {
    let cap = candidate_cap(top_k);
    let allowed = normalize_file_types(file_types);

    let items = match path_prefix.map(str::trim).filter(|p| !p.is_empty()) {
        Some(prefix) => walker::list_all_files(client as &dyn ChildLister, prefix).await?,
        None => client.search(query, cap).await?,
    };

    Ok(filter_candidates(items, &allowed, cap))
}
