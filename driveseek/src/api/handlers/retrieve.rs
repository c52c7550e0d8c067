//! `POST /retrieve` — the ranked-snippet retrieval endpoint.

use axum::extract::State;
use axum::Json;

use crate::api::state::AppState;
use crate::error::{DriveseekError, Result};
use crate::models::{RetrieveRequest, RetrieveResponse};
use crate::retrieval;

pub async fn retrieve(
    State(state): State<AppState>,
    Json(req): Json<RetrieveRequest>,
) -> Result<Json<RetrieveResponse>> {
    if req.query.trim().is_empty() {
        return Err(DriveseekError::Validation(
            "query cannot be empty".to_string(),
        ));
    }
    // A zero chunk width would silently drop every candidate.
    if req.max_chars_per_chunk == 0 {
        return Err(DriveseekError::Validation(
            "maxCharsPerChunk must be greater than zero".to_string(),
        ));
    }

    let response =
        retrieval::retrieve(&state.graph, &req, state.config.retrieval.concurrency).await?;
    Ok(Json(response))
}
