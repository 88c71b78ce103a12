//! Session song-identity endpoints
//!
//! The song-detail view records the song being viewed here; the related-media
//! view reads it back through the pipeline.

use crate::media::{IdentityProvider, SongIdentity, SONG_DETAILS_KEY};
use crate::{ApiError, ApiResult, AppState};
use axum::{extract::State, http::StatusCode, routing::put, Json, Router};
use chrono::Utc;
use tracing::info;
use tunescope_common::TuneScopeEvent;

/// PUT /api/session/song-details
///
/// **Request:** `{"songName", "artistName", "albumName"?, "isrc"?}`
///
/// **Errors:** 400 when song or artist name is blank
pub async fn put_song_details(
    State(state): State<AppState>,
    Json(identity): Json<SongIdentity>,
) -> ApiResult<Json<SongIdentity>> {
    if !identity.is_searchable() {
        return Err(ApiError::BadRequest(
            "songName and artistName must not be empty".to_string(),
        ));
    }

    state.session.store(&identity);
    info!(song = %identity.song_name, artist = %identity.artist_name, "Stored song details");

    state.event_bus.emit_lossy(TuneScopeEvent::SongIdentityStored {
        song_name: identity.song_name.clone(),
        artist_name: identity.artist_name.clone(),
        timestamp: Utc::now(),
    });

    Ok(Json(identity))
}

/// GET /api/session/song-details
///
/// **Errors:** 404 when the session holds no identity
pub async fn get_song_details(State(state): State<AppState>) -> ApiResult<Json<SongIdentity>> {
    state
        .session
        .load()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No song details in session".to_string()))
}

/// DELETE /api/session/song-details
pub async fn delete_song_details(State(state): State<AppState>) -> StatusCode {
    if state.session.remove_item(SONG_DETAILS_KEY) {
        info!("Cleared song details");
        state.event_bus.emit_lossy(TuneScopeEvent::SongIdentityCleared {
            timestamp: Utc::now(),
        });
    }
    StatusCode::NO_CONTENT
}

/// Build session routes
pub fn session_routes() -> Router<AppState> {
    Router::new().route(
        "/api/session/song-details",
        put(put_song_details)
            .get(get_song_details)
            .delete(delete_song_details),
    )
}
