use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DriveseekError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Token exchange failed ({status}): {body}")]
    TokenExchange { status: u16, body: String },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Upstream error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for DriveseekError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DriveseekError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            // Auth and upstream failures mirror the remote status when it is a
            // valid HTTP code, falling back to 502 for anything unmappable.
            DriveseekError::TokenExchange { status, body } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                body.clone(),
            ),
            DriveseekError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            DriveseekError::Upstream { status, body } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                body.clone(),
            ),
            DriveseekError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            DriveseekError::Processing(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            DriveseekError::Http(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            DriveseekError::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            DriveseekError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, DriveseekError>;
