//! The retrieval pipeline: candidates → download → extract → chunk → score →
//! global rank.
//!
//! Candidates are processed with bounded fan-out. A single candidate's
//! download or extraction failure is logged and skipped; it never aborts the
//! batch. The final ranking is a pure sort over the complete set of scored
//! snippets, so the fan-out does not change the output.

pub mod candidates;
pub mod chunker;
pub mod extractors;
pub mod scoring;

use futures::StreamExt;

use crate::error::Result;
use crate::graph::models::DriveItem;
use crate::graph::GraphClient;
use crate::models::{FileMeta, RetrieveRequest, RetrieveResponse, ScoredSnippet};

/// Fixed separator between snippet texts in the combined context.
pub const SNIPPET_SEPARATOR: &str = "\n---\n";

struct DocumentHit {
    snippet: ScoredSnippet,
    full_text: String,
}

pub async fn retrieve(
    client: &GraphClient,
    req: &RetrieveRequest,
    concurrency: usize,
) -> Result<RetrieveResponse> {
    let candidates = candidates::select_candidates(
        client,
        &req.query,
        req.path_prefix.as_deref(),
        req.top_k,
        &req.file_types,
    )
    .await?;
    tracing::debug!(count = candidates.len(), query = %req.query, "candidates selected");

    let query = req.query.as_str();
    let max_chars = req.max_chars_per_chunk;
    let results: Vec<Option<(usize, DocumentHit)>> =
        futures::stream::iter(candidates.into_iter().enumerate())
            .map(|(index, item)| async move {
                process_candidate(client, index, item, query, max_chars).await
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;

    let mut hits: Vec<(usize, DocumentHit)> = results.into_iter().flatten().collect();
    // Score descending; candidate order breaks ties so the unordered
    // collection above stays deterministic.
    hits.sort_by(|a, b| b.1.snippet.score.cmp(&a.1.snippet.score).then(a.0.cmp(&b.0)));
    hits.truncate(req.top_k);

    let file_text = if req.include_file_text {
        hits.first().map(|(_, hit)| hit.full_text.clone())
    } else {
        None
    };

    let snippets: Vec<ScoredSnippet> = hits.into_iter().map(|(_, hit)| hit.snippet).collect();
    let files: Vec<FileMeta> = snippets.iter().map(|s| s.file.clone()).collect();
    let combined_context = snippets
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(SNIPPET_SEPARATOR);

    Ok(RetrieveResponse {
        query: req.query.clone(),
        path_prefix: req.path_prefix.clone(),
        top_k: req.top_k,
        snippets,
        files,
        combined_context,
        file_text,
    })
}

/// Downloads and scores one candidate. Returns `None` when the candidate
/// yields no usable text or its download fails (skip-and-continue policy).
async fn process_candidate(
    client: &GraphClient,
    index: usize,
    item: DriveItem,
    query: &str,
    max_chars: usize,
) -> Option<(usize, DocumentHit)> {
    let bytes = match client.download(&item.id).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(item = %item.name, error = %e, "download failed; skipping candidate");
            return None;
        }
    };

    let text = extractors::extract_text(&bytes, &item.name);
    if text.is_empty() {
        return None;
    }

    let segments = chunker::chunk_text(&text, max_chars);
    let (best_segment, best_score) = best_segment(&segments, query)?;

    let snippet = ScoredSnippet {
        text: best_segment.clone(),
        score: best_score,
        file: FileMeta::from(&item),
    };
    Some((
        index,
        DocumentHit {
            snippet,
            full_text: text,
        },
    ))
}

/// Highest-scoring segment of a document; the first one encountered wins
/// ties. Zero scores are kept — there is no score floor.
fn best_segment<'a>(segments: &'a [String], query: &str) -> Option<(&'a String, u32)> {
    let mut best: Option<(&'a String, u32)> = None;
    for segment in segments {
        let score = scoring::score_segment(segment, query);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((segment, score)),
        }
    }
    best
}
