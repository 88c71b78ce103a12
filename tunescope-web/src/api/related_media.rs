//! Related-media endpoints
//!
//! Each action returns the pipeline view after the action completes. Progress
//! of a running load is observable through `GET /api/related-media` and the
//! `/events` stream.

use crate::media::{FilterCategory, RelatedMediaView};
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Filter request body
#[derive(Debug, Deserialize)]
pub struct FilterRequest {
    pub category: String,
}

/// Filter response
///
/// `applied` is false when the pipeline was not ready; the filter is then
/// ignored and the view is unchanged.
#[derive(Debug, Serialize)]
pub struct FilterResponse {
    pub applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible_count: Option<usize>,
    pub view: RelatedMediaView,
}

/// GET /api/related-media
pub async fn get_view(State(state): State<AppState>) -> Json<RelatedMediaView> {
    Json(state.related_media.view())
}

/// POST /api/related-media/load
///
/// Reads the session identity and, when present, fetches related videos.
pub async fn load(State(state): State<AppState>) -> Json<RelatedMediaView> {
    state.related_media.activate().await;
    Json(state.related_media.view())
}

/// POST /api/related-media/retry
///
/// **Errors:** 400 when no identity has been loaded
pub async fn retry(State(state): State<AppState>) -> ApiResult<Json<RelatedMediaView>> {
    state
        .related_media
        .retry()
        .await
        .ok_or_else(|| ApiError::BadRequest("No song identity to retry with".to_string()))?;
    Ok(Json(state.related_media.view()))
}

/// POST /api/related-media/test-identity
pub async fn use_test_identity(State(state): State<AppState>) -> Json<RelatedMediaView> {
    state.related_media.use_test_identity().await;
    Json(state.related_media.view())
}

/// POST /api/related-media/filter
///
/// **Request:** `{"category": "all" | "lyrics" | "remix" | "effects"}`
///
/// **Errors:** 400 for an unknown category
pub async fn apply_filter(
    State(state): State<AppState>,
    Json(request): Json<FilterRequest>,
) -> ApiResult<Json<FilterResponse>> {
    let category: FilterCategory = request.category.parse().map_err(ApiError::BadRequest)?;

    let visible_count = state.related_media.apply_filter(category);
    Ok(Json(FilterResponse {
        applied: visible_count.is_some(),
        visible_count,
        view: state.related_media.view(),
    }))
}

/// Build related-media routes
pub fn related_media_routes() -> Router<AppState> {
    Router::new()
        .route("/api/related-media", get(get_view))
        .route("/api/related-media/load", post(load))
        .route("/api/related-media/retry", post(retry))
        .route("/api/related-media/test-identity", post(use_test_identity))
        .route("/api/related-media/filter", post(apply_filter))
}
