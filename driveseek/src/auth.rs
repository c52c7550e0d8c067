//! Client-credentials token lifecycle for the Graph API.
//!
//! A single [`TokenManager`] is shared by all requests. The cached credential
//! is returned without a network call while it is still comfortably inside
//! its validity window; once it is within [`REFRESH_MARGIN_SECS`] of expiry a
//! fresh exchange overwrites the cache whole-value. The read-check-refresh
//! sequence is double-checked under the write lock so two concurrent
//! near-expiry callers do not race destructively (a redundant exchange is
//! harmless — the operation is idempotent).

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::GraphConfig;
use crate::error::{DriveseekError, Result};

/// A cached credential is never served within this margin of its expiry.
pub const REFRESH_MARGIN_SECS: i64 = 300;

const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;
const TOKEN_SCOPE: &str = "https://graph.microsoft.com/.default";

#[derive(Debug, Clone)]
pub struct Credential {
    pub access_token: String,
    /// Absolute expiry instant, epoch seconds.
    pub expires_at: i64,
}

impl Credential {
    pub fn is_fresh(&self, now: i64) -> bool {
        self.expires_at - REFRESH_MARGIN_SECS > now
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: Option<i64>,
}

pub struct TokenManager {
    http: reqwest::Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    cached: RwLock<Option<Credential>>,
}

impl TokenManager {
    pub fn new(config: &GraphConfig, http: reqwest::Client) -> Self {
        Self {
            http,
            token_url: config.token_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            cached: RwLock::new(None),
        }
    }

    /// Returns a bearer token, refreshing the cache first when the current
    /// credential is missing or inside the refresh margin. Exchange failures
    /// propagate directly; no retry.
    pub async fn bearer_token(&self) -> Result<String> {
        let now = Utc::now().timestamp();

        if let Some(cred) = self.cached.read().await.as_ref() {
            if cred.is_fresh(now) {
                return Ok(cred.access_token.clone());
            }
        }

        let mut guard = self.cached.write().await;
        // Another task may have refreshed while we waited for the lock;
        // re-read the clock so its credential is judged against the present.
        let now = Utc::now().timestamp();
        if let Some(cred) = guard.as_ref() {
            if cred.is_fresh(now) {
                return Ok(cred.access_token.clone());
            }
        }

        let cred = self.exchange(now).await?;
        let token = cred.access_token.clone();
        *guard = Some(cred);
        Ok(token)
    }

    async fn exchange(&self, now: i64) -> Result<Credential> {
        tracing::debug!("exchanging client credentials for a new bearer token");

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("scope", TOKEN_SCOPE),
        ];

        let response = self.http.post(&self.token_url).form(&params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DriveseekError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let token: TokenResponse = response.json().await?;
        Ok(Credential {
            access_token: token.access_token,
            expires_at: now + token.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS),
        })
    }
}
