//! Wire-level request and response types for the retrieval endpoint.

use serde::{Deserialize, Serialize};

use crate::graph::models::DriveItem;

pub const DEFAULT_TOP_K: usize = 6;
pub const DEFAULT_MAX_CHARS_PER_CHUNK: usize = 1200;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS_PER_CHUNK
}

fn default_file_types() -> Vec<String> {
    vec!["pdf".to_string(), "docx".to_string(), "txt".to_string()]
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveRequest {
    pub query: String,
    /// Folder path scoping traversal-based selection; absent or empty means
    /// drive-wide search.
    #[serde(default)]
    pub path_prefix: Option<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_max_chars")]
    pub max_chars_per_chunk: usize,
    #[serde(default = "default_file_types")]
    pub file_types: Vec<String>,
    /// When set, the full extracted text of the top-ranked file is attached
    /// to the response.
    #[serde(default)]
    pub include_file_text: bool,
}

/// Identifying metadata of the file a snippet came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMeta {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
}

impl From<&DriveItem> for FileMeta {
    fn from(item: &DriveItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            path: item.display_path(),
            web_url: item.web_url.clone(),
            content_type: item.file.as_ref().and_then(|f| f.mime_type.clone()),
            last_modified: item.last_modified_date_time.clone(),
        }
    }
}

/// A segment paired with its relevance score and owning-file metadata.
/// Exactly one survives per candidate (its highest-scoring segment).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredSnippet {
    pub text: String,
    pub score: u32,
    pub file: FileMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveResponse {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,
    pub top_k: usize,
    /// Ranked snippets, score descending, at most `top_k` long.
    pub snippets: Vec<ScoredSnippet>,
    pub files: Vec<FileMeta>,
    /// Snippet texts joined with the fixed separator.
    pub combined_context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_text: Option<String>,
}
