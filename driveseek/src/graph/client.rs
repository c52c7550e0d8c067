//! Typed operations against the Graph drive API.
//!
//! Every call fetches a bearer token from the [`TokenManager`] first. The
//! site/drive scope is baked into URL construction. Non-2xx responses become
//! [`DriveseekError::Upstream`] carrying the remote status and body; no retry
//! or backoff is performed anywhere in this client.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::TokenManager;
use crate::config::GraphConfig;
use crate::error::{DriveseekError, Result};
use crate::graph::models::{DriveItem, DriveItemPage};
use crate::graph::walker::ChildLister;

pub struct GraphClient {
    http: reqwest::Client,
    base_url: String,
    site_id: String,
    drive_id: String,
    tokens: TokenManager,
}

impl GraphClient {
    pub fn new(config: &GraphConfig) -> Result<Self> {
        // Redirects (content downloads bounce through a CDN URL) are followed
        // with reqwest's default bounded hop count.
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DriveseekError::Internal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http: http.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            site_id: config.site_id.clone(),
            drive_id: config.drive_id.clone(),
            tokens: TokenManager::new(config, http),
        })
    }

    fn drive_url(&self) -> String {
        format!(
            "{}/sites/{}/drives/{}",
            self.base_url, self.site_id, self.drive_id
        )
    }

    /// Addressing segment for a slash-separated folder path; empty means the
    /// drive root. Each path segment is escaped individually so separators
    /// survive intact.
    fn children_url(&self, path: &str) -> String {
        let path = path.trim_matches('/');
        if path.is_empty() {
            format!("{}/root/children", self.drive_url())
        } else {
            format!("{}/root:/{}:/children", self.drive_url(), encode_path(path))
        }
    }

    async fn get_authorized(
        &self,
        url: &str,
        params: &[(String, String)],
    ) -> Result<reqwest::Response> {
        let token = self.tokens.bearer_token().await?;
        let mut request = self.http.get(url).bearer_auth(token);
        if !params.is_empty() {
            request = request.query(params);
        }
        Ok(request.send().await?)
    }

    /// Fails non-2xx responses with the upstream status and body.
    async fn require_success(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(DriveseekError::Upstream {
            status: status.as_u16(),
            body,
        })
    }

    /// Immediate children of a folder as the upstream JSON, unmodified.
    /// `params` passes through arbitrary query-string options (`$top`,
    /// `$select`, ...) without validation.
    pub async fn list_children_raw(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Value> {
        let response = self.get_authorized(&self.children_url(path), params).await?;
        Ok(Self::require_success(response).await?.json().await?)
    }

    /// Immediate children of a folder, typed. Only the first page is read.
    pub async fn list_children(&self, path: &str) -> Result<Vec<DriveItem>> {
        let raw = self.list_children_raw(path, &[]).await?;
        let page: DriveItemPage = serde_json::from_value(raw)?;
        Ok(page.items)
    }

    /// Search URL with the query embedded as a percent-encoded OData string
    /// literal. Encoding keeps reserved characters (`?`, `#`, `&`) from
    /// splitting the URL; single quotes double up per OData first.
    fn search_url(&self, query: &str) -> String {
        let literal = query.replace('\'', "''");
        format!(
            "{}/root/search(q='{}')",
            self.drive_url(),
            urlencoding::encode(&literal)
        )
    }

    /// Drive-wide full-text search. Results are not guaranteed to be files;
    /// callers filter folders out themselves.
    pub async fn search(&self, query: &str, top: usize) -> Result<Vec<DriveItem>> {
        let url = self.search_url(query);
        let params = [("$top".to_string(), top.to_string())];
        let response = self.get_authorized(&url, &params).await?;
        let raw: Value = Self::require_success(response).await?.json().await?;
        let page: DriveItemPage = serde_json::from_value(raw)?;
        Ok(page.items)
    }

    /// Buffered content fetch by item id, for in-process extraction.
    pub async fn download(&self, item_id: &str) -> Result<Vec<u8>> {
        let url = format!("{}/items/{item_id}/content", self.drive_url());
        let response = self.get_authorized(&url, &[]).await?;
        let response = Self::require_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    /// Streaming content fetch by item id. The response is returned whatever
    /// its status so the caller can relay upstream errors body-intact.
    pub async fn download_response_by_id(&self, item_id: &str) -> Result<reqwest::Response> {
        let url = format!("{}/items/{item_id}/content", self.drive_url());
        self.get_authorized(&url, &[]).await
    }

    /// Streaming content fetch by drive-relative path.
    pub async fn download_response_by_path(&self, path: &str) -> Result<reqwest::Response> {
        let path = path.trim_matches('/');
        let url = format!("{}/root:/{}:/content", self.drive_url(), encode_path(path));
        self.get_authorized(&url, &[]).await
    }
}

#[async_trait]
impl ChildLister for GraphClient {
    async fn child_items(&self, path: &str) -> Result<Vec<DriveItem>> {
        self.list_children(path).await
    }
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
