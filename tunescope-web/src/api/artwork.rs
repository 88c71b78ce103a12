//! Artwork color endpoint

use super::palette::PaletteResponse;
use crate::{ApiResult, AppState};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ArtworkQuery {
    /// Image URL
    pub url: String,
}

/// GET /api/artwork/color?url=...
///
/// Downloads the image and answers with the palette of its dominant color.
///
/// **Errors:** 400 when the download is not a decodable image, 502 when the
/// image host fails
pub async fn get_artwork_color(
    State(state): State<AppState>,
    Query(query): Query<ArtworkQuery>,
) -> ApiResult<Json<PaletteResponse>> {
    let color = state.artwork.dominant_color(&query.url).await?;
    info!(url = %query.url, r = color.r, g = color.g, b = color.b, "Extracted artwork color");
    Ok(Json(PaletteResponse::from_color(color)))
}
