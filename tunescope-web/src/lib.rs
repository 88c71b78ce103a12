//! tunescope-web library - related media and artwork theming service
//!
//! Hosts the related-media pipeline, the color pipeline, and the lyrics and
//! featured-songs lookups behind an HTTP API.

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tunescope_common::config::TomlConfig;
use tunescope_common::{Error, EventBus, Result};

pub mod api;
pub mod artwork;
pub mod catalog;
pub mod color;
pub mod error;
pub mod lyrics;
pub mod media;
pub mod observer;

pub use error::{ApiError, ApiResult};

use artwork::ArtworkClient;
use catalog::CatalogClient;
use lyrics::LyricsClient;
use media::{RelatedMediaPipeline, SessionStore, VideoSearchClient};
use observer::EventBusObserver;

/// Service name reported by health checks and SSE logging
pub const MODULE_NAME: &str = "tunescope-web";

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration after overrides
    pub config: Arc<TomlConfig>,
    /// Event bus feeding `/events`
    pub event_bus: EventBus,
    /// Session key/value storage holding the song identity
    pub session: Arc<SessionStore>,
    pub related_media: Arc<RelatedMediaPipeline>,
    pub lyrics: Arc<LyricsClient>,
    pub catalog: Arc<CatalogClient>,
    pub artwork: Arc<ArtworkClient>,
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Wire every component from `config`
    pub fn new(config: TomlConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let event_bus = EventBus::new(config.event_bus_capacity);
        let session = Arc::new(SessionStore::new());

        let video_source = VideoSearchClient::new(&config.video_api_url, timeout)
            .map_err(|e| Error::Http(e.to_string()))?;
        let related_media = RelatedMediaPipeline::new(
            session.clone(),
            Arc::new(video_source),
            Arc::new(EventBusObserver::new(event_bus.clone())),
        );

        let lyrics = LyricsClient::new(&config.lyrics_api_url, timeout)?;
        let catalog = CatalogClient::new(&config.catalog_api_url, timeout)
            .map_err(|e| Error::Http(e.to_string()))?;
        let artwork = ArtworkClient::new(timeout).map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            config: Arc::new(config),
            event_bus,
            session,
            related_media: Arc::new(related_media),
            lyrics: Arc::new(lyrics),
            catalog: Arc::new(catalog),
            artwork: Arc::new(artwork),
            startup_time: Utc::now(),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/events", get(api::event_stream))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::session_routes())
        .merge(api::related_media_routes())
        .merge(api::color_routes())
        .merge(api::lyrics_routes())
        .merge(api::catalog_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
