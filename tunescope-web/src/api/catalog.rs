//! Featured-songs endpoint

use crate::catalog::FeaturedSong;
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    routing::get,
    Json, Router,
};
use serde::Serialize;

/// Cookie carrying the catalog access token
const TOKEN_COOKIE: &str = "token";

#[derive(Debug, Serialize)]
pub struct FeaturedResponse {
    pub artist_id: String,
    pub songs: Vec<FeaturedSong>,
}

/// Catalog token from the `token` cookie, else from a bearer `Authorization`
pub fn catalog_token(headers: &HeaderMap) -> Option<String> {
    let from_cookie = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == TOKEN_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|token| !token.is_empty());

    from_cookie
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.strip_prefix("Bearer "))
                .map(|token| token.trim().to_string())
        })
        .filter(|token| !token.is_empty())
}

/// GET /api/artists/:id/featured
///
/// Lookup failures yield an empty `songs` list.
///
/// **Errors:** 401 when no catalog token was supplied
pub async fn get_featured_songs(
    State(state): State<AppState>,
    Path(artist_id): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Json<FeaturedResponse>> {
    let token = catalog_token(&headers)
        .ok_or_else(|| ApiError::Unauthorized("Catalog token required".to_string()))?;

    let songs = state.catalog.featured_songs(&artist_id, &token).await;
    Ok(Json(FeaturedResponse { artist_id, songs }))
}

/// Build catalog routes
pub fn catalog_routes() -> Router<AppState> {
    Router::new().route("/api/artists/:id/featured", get(get_featured_songs))
}
