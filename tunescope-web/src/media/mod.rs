//! Related media for the song being viewed
//!
//! - `identity`: song identity and the session store holding it
//! - `video`: video items and filter classification
//! - `search`: video-search endpoint client
//! - `pipeline`: fetch/filter state machine tying them together

pub mod identity;
pub mod pipeline;
pub mod search;
pub mod video;

pub use identity::{IdentityProvider, SessionStore, SongIdentity, SONG_DETAILS_KEY};
pub use pipeline::{
    FetchState, PipelineObserver, RelatedMediaPipeline, RelatedMediaView, ViewState,
};
pub use search::{VideoSearchClient, VideoSearchError, VideoSearchRequest, VideoSource, MAX_RESULTS};
pub use video::{apply_filter, FilterCategory, VideoItem, VideoResultSet};
