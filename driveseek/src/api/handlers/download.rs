//! Content relay. The upstream response — status, content headers and body
//! stream — is mirrored to the client unmodified, including upstream errors.

use std::collections::HashMap;

use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;

use crate::api::state::AppState;
use crate::error::{DriveseekError, Result};

const MIRRORED_HEADERS: &[&str] = &["content-type", "content-disposition", "content-length"];

/// `GET /download?id=...` or `GET /download?path=...`.
pub async fn download(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response> {
    let upstream = if let Some(id) = params.get("id").filter(|v| !v.trim().is_empty()) {
        state.graph.download_response_by_id(id).await?
    } else if let Some(path) = params.get("path").filter(|v| !v.trim().is_empty()) {
        state.graph.download_response_by_path(path).await?
    } else {
        return Err(DriveseekError::Validation(
            "path or id query parameter is required".to_string(),
        ));
    };

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);

    let mut builder = Response::builder().status(status);
    for name in MIRRORED_HEADERS {
        if let Some(value) = upstream.headers().get(*name) {
            builder = builder.header(*name, value.clone());
        }
    }

    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| DriveseekError::Internal(format!("failed to relay download: {e}")))
}
