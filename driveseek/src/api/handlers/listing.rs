//! Pass-through listing routes. The upstream JSON is forwarded verbatim —
//! an opaque value, never schema-validated.

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::Json;
use serde_json::Value;

use crate::api::state::AppState;
use crate::error::{DriveseekError, Result};

/// `GET /root` — drive root listing; all query params (`$top`, `$skip`,
/// `$select`, `$expand`, ...) pass through unvalidated.
pub async fn root_listing(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let params: Vec<(String, String)> = params.into_iter().collect();
    Ok(Json(state.graph.list_children_raw("", &params).await?))
}

/// `GET /folder?path=...` — listing of one folder by slash-separated path.
pub async fn folder_listing(
    State(state): State<AppState>,
    Query(mut params): Query<HashMap<String, String>>,
) -> Result<Json<Value>> {
    let path = params
        .remove("path")
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| {
            DriveseekError::Validation("path query parameter is required".to_string())
        })?;
    let params: Vec<(String, String)> = params.into_iter().collect();
    Ok(Json(state.graph.list_children_raw(&path, &params).await?))
}
