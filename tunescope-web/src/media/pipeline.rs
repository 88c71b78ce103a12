//! Related-media pipeline
//!
//! Reads the current song identity, fetches related videos for it, and keeps a
//! filterable view of the results.
//!
//! State machine:
//!
//! ```text
//! Idle --identity available--> Loading --> Ready | Failed
//! Ready | Failed --retry / identity change--> Loading
//! ```
//!
//! Every load takes a new request generation. A response is applied only if its
//! generation is still the latest; responses to superseded requests are dropped.
//! Filtering never changes the fetch state and is only honored while `Ready`.

use super::identity::{IdentityProvider, SongIdentity};
use super::search::{VideoSearchRequest, VideoSource};
use super::video::{FilterCategory, VideoItem, VideoResultSet};
use chrono::Utc;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};
use tunescope_common::TuneScopeEvent;

/// Heading shown above a non-empty video grid
pub const RESULTS_HEADING: &str = "Discover related content";

/// Heading shown when the visible list is empty
pub const NO_RESULTS_HEADING: &str = "No videos were found.";

/// Fetch lifecycle of the related-video search
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

/// Receives pipeline events; supplied by the host application
pub trait PipelineObserver: Send + Sync {
    fn notify(&self, event: TuneScopeEvent);
}

/// Log a pipeline event at the level matching its severity
pub fn log_event(event: &TuneScopeEvent) {
    match event {
        TuneScopeEvent::RelatedMediaLoading {
            generation,
            song_name,
            artist_name,
            ..
        } => info!(generation, song = %song_name, artist = %artist_name, "Fetching related videos"),
        TuneScopeEvent::RelatedMediaReady {
            generation,
            video_count,
            ..
        } => info!(generation, video_count, "Related videos loaded"),
        TuneScopeEvent::RelatedMediaFailed {
            generation,
            message,
            ..
        } => warn!(generation, error = %message, "Related video fetch failed"),
        TuneScopeEvent::StaleResponseDiscarded {
            generation,
            latest_generation,
            ..
        } => debug!(generation, latest_generation, "Discarded stale video response"),
        TuneScopeEvent::RelatedMediaFiltered {
            category,
            visible_count,
            ..
        } => debug!(category = %category, visible_count, "Applied video filter"),
        TuneScopeEvent::IdentityMissing { .. } => {
            info!("No song details found in session")
        }
        other => debug!(event = other.event_type(), "Pipeline event"),
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
enum IdentityStatus {
    /// `load_identity` has not run yet
    #[default]
    Unchecked,
    /// Session held no identity
    Missing,
    Present(SongIdentity),
}

#[derive(Debug, Default)]
struct PipelineInner {
    identity: IdentityStatus,
    state: FetchState,
    results: VideoResultSet,
    filter: FilterCategory,
    generation: u64,
}

/// Presentation branch of the related-media view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    Idle,
    NoIdentity,
    Loading,
    Ready,
    Failed,
}

/// A visible video with its rendering key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoCard {
    pub key: String,
    #[serde(flatten)]
    pub video: VideoItem,
}

/// Snapshot of the pipeline for rendering
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedMediaView {
    pub state: ViewState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub identity: Option<SongIdentity>,
    pub filter: FilterCategory,
    pub video_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<&'static str>,
    pub videos: Vec<VideoCard>,
    pub can_retry: bool,
    pub generation: u64,
}

/// Related-video retrieval and filtering for the current song
pub struct RelatedMediaPipeline {
    identity_provider: Arc<dyn IdentityProvider>,
    source: Arc<dyn VideoSource>,
    observer: Arc<dyn PipelineObserver>,
    inner: Mutex<PipelineInner>,
}

impl RelatedMediaPipeline {
    pub fn new(
        identity_provider: Arc<dyn IdentityProvider>,
        source: Arc<dyn VideoSource>,
        observer: Arc<dyn PipelineObserver>,
    ) -> Self {
        Self {
            identity_provider,
            source,
            observer,
            inner: Mutex::new(PipelineInner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PipelineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> FetchState {
        self.lock().state.clone()
    }

    /// Identity recorded by the last `load_identity` or test-identity action
    pub fn identity(&self) -> Option<SongIdentity> {
        match &self.lock().identity {
            IdentityStatus::Present(identity) => Some(identity.clone()),
            _ => None,
        }
    }

    pub fn results(&self) -> VideoResultSet {
        self.lock().results.clone()
    }

    pub fn active_filter(&self) -> FilterCategory {
        self.lock().filter
    }

    /// Generation of the most recently started load
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Read the song identity from the identity provider
    ///
    /// An absent identity is a valid state, not an error.
    pub fn load_identity(&self) -> Option<SongIdentity> {
        let identity = self.identity_provider.load();

        self.lock().identity = match &identity {
            Some(identity) => IdentityStatus::Present(identity.clone()),
            None => IdentityStatus::Missing,
        };

        if identity.is_none() {
            self.observer.notify(TuneScopeEvent::IdentityMissing {
                timestamp: Utc::now(),
            });
        }
        identity
    }

    /// Load the identity and, when it names a song and artist, fetch videos
    pub async fn activate(&self) -> FetchState {
        match self.load_identity() {
            Some(identity) if identity.is_searchable() => {
                self.fetch_videos(&identity.song_name, &identity.artist_name)
                    .await
            }
            _ => self.state(),
        }
    }

    /// Issue one video search and apply its outcome
    ///
    /// Returns the state after the call. If a newer load started while this
    /// one was in flight, its outcome is discarded and the current state is
    /// returned unchanged.
    pub async fn fetch_videos(&self, song_name: &str, artist_name: &str) -> FetchState {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.state = FetchState::Loading;
            inner.generation
        };

        self.observer.notify(TuneScopeEvent::RelatedMediaLoading {
            generation,
            song_name: song_name.to_string(),
            artist_name: artist_name.to_string(),
            timestamp: Utc::now(),
        });

        let request = VideoSearchRequest::new(song_name, artist_name);
        let outcome = self.source.search(&request).await;

        let (state, event) = {
            let mut inner = self.lock();
            if inner.generation != generation {
                let event = TuneScopeEvent::StaleResponseDiscarded {
                    generation,
                    latest_generation: inner.generation,
                    timestamp: Utc::now(),
                };
                (inner.state.clone(), event)
            } else {
                let event = match outcome {
                    Ok(videos) => {
                        let video_count = videos.len();
                        inner.results = VideoResultSet::new(videos);
                        inner.filter = FilterCategory::All;
                        inner.state = FetchState::Ready;
                        TuneScopeEvent::RelatedMediaReady {
                            generation,
                            video_count,
                            timestamp: Utc::now(),
                        }
                    }
                    Err(e) => {
                        debug!("Video search error detail: {}", e);
                        let message = e.display_message();
                        inner.state = FetchState::Failed(message.clone());
                        TuneScopeEvent::RelatedMediaFailed {
                            generation,
                            message,
                            timestamp: Utc::now(),
                        }
                    }
                };
                (inner.state.clone(), event)
            }
        };

        self.observer.notify(event);
        state
    }

    /// Re-run the search for the last known identity
    ///
    /// Returns `None` when there is no identity to retry with.
    pub async fn retry(&self) -> Option<FetchState> {
        let identity = self.identity()?;
        Some(
            self.fetch_videos(&identity.song_name, &identity.artist_name)
                .await,
        )
    }

    /// Store the built-in test identity in the session and search for it
    pub async fn use_test_identity(&self) -> FetchState {
        let identity = SongIdentity::test_identity();
        self.identity_provider.store(&identity);
        self.lock().identity = IdentityStatus::Present(identity.clone());

        self.fetch_videos(&identity.song_name, &identity.artist_name)
            .await
    }

    /// Re-derive the visible videos for `category`
    ///
    /// Returns the number of visible videos, or `None` when the pipeline is not
    /// `Ready` (the filter is ignored in that case).
    pub fn apply_filter(&self, category: FilterCategory) -> Option<usize> {
        let visible_count = {
            let mut inner = self.lock();
            if inner.state != FetchState::Ready {
                return None;
            }
            inner.filter = category;
            inner.results.refilter(category);
            inner.results.visible().len()
        };

        self.observer.notify(TuneScopeEvent::RelatedMediaFiltered {
            category: category.to_string(),
            visible_count,
            timestamp: Utc::now(),
        });
        Some(visible_count)
    }

    /// Snapshot for rendering
    ///
    /// Loading takes precedence over a failure, which takes precedence over a
    /// missing identity.
    pub fn view(&self) -> RelatedMediaView {
        let inner = self.lock();

        let identity = match &inner.identity {
            IdentityStatus::Present(identity) => Some(identity.clone()),
            _ => None,
        };

        let (state, message) = match (&inner.state, &inner.identity) {
            (FetchState::Loading, _) => (ViewState::Loading, None),
            (FetchState::Failed(message), _) => (ViewState::Failed, Some(message.clone())),
            (_, IdentityStatus::Missing) => (ViewState::NoIdentity, None),
            (FetchState::Ready, _) => (ViewState::Ready, None),
            (FetchState::Idle, _) => (ViewState::Idle, None),
        };

        let videos: Vec<VideoCard> = if state == ViewState::Ready {
            inner
                .results
                .visible()
                .iter()
                .enumerate()
                .map(|(position, video)| VideoCard {
                    key: video.render_key(position),
                    video: video.clone(),
                })
                .collect()
        } else {
            Vec::new()
        };

        let heading = (state == ViewState::Ready).then_some(if videos.is_empty() {
            NO_RESULTS_HEADING
        } else {
            RESULTS_HEADING
        });

        RelatedMediaView {
            state,
            message,
            can_retry: state == ViewState::Failed && identity.is_some(),
            identity,
            filter: inner.filter,
            video_count: videos.len(),
            heading,
            videos,
            generation: inner.generation,
        }
    }
}
