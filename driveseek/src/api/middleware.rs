//! API-key gate.
//!
//! Every route is protected when `DRIVESEEK_API_KEY` is configured. An unset
//! key disables the gate entirely — intended only for local testing, and
//! called out with a startup warning.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::state::AppState;
use crate::error::DriveseekError;

pub const API_KEY_HEADER: &str = "x-api-key";

pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(expected) = state.config.server.api_key.as_deref() else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|h| h.to_str().ok());

    match provided {
        Some(key) if key == expected => next.run(request).await,
        Some(_) => DriveseekError::Unauthorized("Invalid API key".to_string()).into_response(),
        None => DriveseekError::Unauthorized(format!("Missing {API_KEY_HEADER} header"))
            .into_response(),
    }
}
