//! HTTP API handlers for tunescope-web

pub mod artwork;
pub mod buildinfo;
pub mod catalog;
pub mod health;
pub mod lyrics;
pub mod palette;
pub mod related_media;
pub mod session;
pub mod sse;

pub use buildinfo::get_build_info;
pub use catalog::catalog_routes;
pub use health::health_routes;
pub use lyrics::lyrics_routes;
pub use related_media::related_media_routes;
pub use session::session_routes;
pub use sse::event_stream;

use crate::AppState;
use axum::{routing::get, Router};

/// Palette and artwork color routes
pub fn color_routes() -> Router<AppState> {
    Router::new()
        .route("/api/palette", get(palette::get_palette))
        .route("/api/artwork/color", get(artwork::get_artwork_color))
}
