use std::env;

use crate::error::{DriveseekError, Result};

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn required(var: &str) -> Result<String> {
    env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| DriveseekError::Config(format!("{var} must be set")))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub graph: GraphConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Shared secret checked against the `x-api-key` header. `None` disables
    /// the gate entirely (local testing only).
    pub api_key: Option<String>,
}

/// Connection settings for the Microsoft Graph drive and the identity
/// provider's token endpoint. `base_url` and `token_url` default to the
/// public endpoints and are overridable so tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub site_id: String,
    pub drive_id: String,
    pub base_url: String,
    pub token_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Bounded fan-out for per-candidate download/extract/score work.
    pub concurrency: usize,
}

impl Config {
    /// Load configuration from the environment. Missing required Graph
    /// settings are fatal; the caller exits immediately.
    pub fn from_env() -> Result<Self> {
        let tenant_id = required("GRAPH_TENANT_ID")?;
        let client_id = required("GRAPH_CLIENT_ID")?;
        let client_secret = required("GRAPH_CLIENT_SECRET")?;
        let site_id = required("GRAPH_SITE_ID")?;
        let drive_id = required("GRAPH_DRIVE_ID")?;

        let token_url = env::var("GRAPH_TOKEN_URL").unwrap_or_else(|_| {
            format!("https://login.microsoftonline.com/{tenant_id}/oauth2/v2.0/token")
        });
        let base_url = env::var("GRAPH_BASE_URL")
            .unwrap_or_else(|_| "https://graph.microsoft.com/v1.0".to_string());

        Ok(Self {
            server: ServerConfig {
                host: env::var("DRIVESEEK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("DRIVESEEK_PORT", 3000),
                api_key: env::var("DRIVESEEK_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty()),
            },
            graph: GraphConfig {
                tenant_id,
                client_id,
                client_secret,
                site_id,
                drive_id,
                base_url,
                token_url,
                timeout_secs: parse_env_or("GRAPH_TIMEOUT_SECS", 30),
            },
            retrieval: RetrievalConfig {
                concurrency: parse_env_or("RETRIEVE_CONCURRENCY", 4),
            },
        })
    }
}
