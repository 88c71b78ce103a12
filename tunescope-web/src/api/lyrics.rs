//! Lyrics endpoint

use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct LyricsResponse {
    pub isrc: String,
    /// Empty when the song has no lyrics or the lookup failed
    pub lyrics: String,
}

/// GET /api/songs/:isrc/lyrics
pub async fn get_lyrics(State(state): State<AppState>, Path(isrc): Path<String>) -> Json<LyricsResponse> {
    let lyrics = state.lyrics.fetch_lyrics(&isrc).await;
    Json(LyricsResponse { isrc, lyrics })
}

/// Build lyrics routes
pub fn lyrics_routes() -> Router<AppState> {
    Router::new().route("/api/songs/:isrc/lyrics", get(get_lyrics))
}
