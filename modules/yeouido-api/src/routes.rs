use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::warn;

use yeouido_graph::{GraphPayload, GraphReader};

pub struct AppState {
    pub reader: GraphReader,
}

// --- Query structs ---

#[derive(Deserialize)]
pub struct DepthQuery {
    depth: Option<u8>,
}

#[derive(Deserialize)]
pub struct LimitQuery {
    limit: Option<u32>,
}

// --- Helpers ---

pub(crate) fn clamp_depth(depth: Option<u8>) -> u8 {
    depth.unwrap_or(2).clamp(1, 5)
}

pub(crate) fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(200).min(1000)
}

// --- Handlers ---

/// Neighborhood of a substring-matched legislator.
pub async fn api_graph_by_name(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Query(params): Query<DepthQuery>,
) -> impl IntoResponse {
    let depth = clamp_depth(params.depth);

    let resolved = match state.reader.resolve_name(&name).await {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!(name = name.as_str(), error = %e, "Failed to resolve legislator");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let Some(full_name) = resolved else {
        return Json(GraphPayload::empty_with_message(format!(
            "'{name}'에 대한 검색 결과가 없습니다."
        )))
        .into_response();
    };

    match state.reader.neighborhood(&full_name, depth).await {
        Ok(payload) => Json(payload).into_response(),
        Err(e) => {
            warn!(name = full_name.as_str(), error = %e, "Failed to load neighborhood");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Sample of the whole legislator network.
pub async fn api_graph_all(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LimitQuery>,
) -> impl IntoResponse {
    let limit = clamp_limit(params.limit);

    match state.reader.sample_paths(limit).await {
        Ok(payload) => Json(payload).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to load graph sample");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
