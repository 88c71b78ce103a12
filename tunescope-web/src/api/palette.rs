//! Palette endpoint

use crate::color::{self, ColorValue};
use crate::{ApiError, ApiResult};
use axum::extract::Query;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct PaletteQuery {
    /// JSON-encoded color, e.g. `[30,215,96]`
    pub color: String,
}

/// Every CSS value derived from one color
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteResponse {
    pub color: ColorValue,
    pub rgb: String,
    pub luminance: f64,
    pub contrast_delta: i32,
    /// Page background gradient
    pub palette: String,
    /// Filter-bar backdrop
    pub fade: String,
}

impl PaletteResponse {
    pub fn from_color(color: ColorValue) -> Self {
        Self {
            color,
            rgb: color::to_rgb_string(color),
            luminance: color::luminance(color),
            contrast_delta: color::contrast_delta(color),
            palette: color::to_palette(color),
            fade: color::fade_to_transparent(color),
        }
    }
}

/// GET /api/palette?color=[r,g,b]
///
/// Out-of-range channels are clamped.
///
/// **Errors:** 400 when `color` is not a JSON array of 3 or 4 numbers
pub async fn get_palette(Query(query): Query<PaletteQuery>) -> ApiResult<Json<PaletteResponse>> {
    let color = ColorValue::from_json_str(&query.color)
        .map_err(|e| ApiError::BadRequest(format!("Invalid color '{}': {}", query.color, e)))?;
    Ok(Json(PaletteResponse::from_color(color)))
}
