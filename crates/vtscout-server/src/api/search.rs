use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use vtscout_discovery::{DiscoveredPerformer, PlatformFailure};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    #[serde(default)]
    query: String,
}

#[derive(Debug, Serialize)]
struct PlatformCounts {
    twitch: usize,
    youtube: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchResponse {
    success: bool,
    results: Vec<DiscoveredPerformer>,
    total_results: usize,
    platforms: PlatformCounts,
    failures: Vec<PlatformFailure>,
}

pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(request_id = %req_id.0, error = %rejection, "rejected search body");
        ApiError::bad_request(rejection.body_text())
    })?;

    let query = request.query.trim().to_owned();
    if query.is_empty() {
        return Err(ApiError::bad_request("query must not be empty"));
    }

    tracing::info!(request_id = %req_id.0, %query, "search started");
    let discovery = Arc::clone(&state.discovery);
    let report = tokio::spawn(async move { discovery.discover(&query).await })
        .await
        .map_err(|e| {
            tracing::error!(request_id = %req_id.0, error = %e, "search task failed");
            ApiError::internal(format!("search failed: {e}"))
        })?;

    let platforms = PlatformCounts {
        twitch: report.twitch.len(),
        youtube: report.youtube.len(),
    };
    tracing::info!(
        request_id = %req_id.0,
        twitch = platforms.twitch,
        youtube = platforms.youtube,
        failures = report.failures.len(),
        "search finished"
    );

    let total_results = report.total_results;
    let failures = report.failures;
    let mut results = report.twitch;
    results.extend(report.youtube);

    Ok(Json(SearchResponse {
        success: true,
        results,
        total_results,
        platforms,
        failures,
    }))
}
