//! Related videos and their client-side classification

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// One related video as returned by the video-search endpoint
///
/// Provider fields other than `video_id` and `title` are kept verbatim in
/// `extra` and serialized back out flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoItem {
    pub video_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VideoItem {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            extra: Map::new(),
        }
    }

    /// Rendering key, unique even when the provider repeats a video id
    pub fn render_key(&self, position: usize) -> String {
        format!("{}-{}", self.video_id, position)
    }
}

/// Filter categories offered by the related-media view
///
/// Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterCategory {
    #[default]
    All,
    Lyrics,
    Remix,
    Effects,
}

const LYRICS_TERMS: &[&str] = &["lyrics"];
const REMIX_TERMS: &[&str] = &["remix"];
const EFFECTS_TERMS: &[&str] = &["slowed", "reverb", "sped up"];

impl FilterCategory {
    pub const ALL: [FilterCategory; 4] = [
        FilterCategory::All,
        FilterCategory::Lyrics,
        FilterCategory::Remix,
        FilterCategory::Effects,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterCategory::All => "all",
            FilterCategory::Lyrics => "lyrics",
            FilterCategory::Remix => "remix",
            FilterCategory::Effects => "effects",
        }
    }

    /// Lowercase title substrings selecting this category; `None` for `All`
    fn terms(&self) -> Option<&'static [&'static str]> {
        match self {
            FilterCategory::All => None,
            FilterCategory::Lyrics => Some(LYRICS_TERMS),
            FilterCategory::Remix => Some(REMIX_TERMS),
            FilterCategory::Effects => Some(EFFECTS_TERMS),
        }
    }

    /// Case-insensitive title classification
    pub fn matches(&self, video: &VideoItem) -> bool {
        match self.terms() {
            None => true,
            Some(terms) => {
                let title = video.title.to_lowercase();
                terms.iter().any(|term| title.contains(term))
            }
        }
    }
}

impl fmt::Display for FilterCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FilterCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown filter category '{}'", s))
    }
}

/// Project `original` onto the videos matching `category`, keeping order
pub fn apply_filter(original: &[VideoItem], category: FilterCategory) -> Vec<VideoItem> {
    original
        .iter()
        .filter(|video| category.matches(video))
        .cloned()
        .collect()
}

/// Fetched videos plus the currently visible projection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VideoResultSet {
    original: Vec<VideoItem>,
    visible: Vec<VideoItem>,
}

impl VideoResultSet {
    /// New result set with every video visible
    pub fn new(videos: Vec<VideoItem>) -> Self {
        Self {
            visible: videos.clone(),
            original: videos,
        }
    }

    pub fn original(&self) -> &[VideoItem] {
        &self.original
    }

    pub fn visible(&self) -> &[VideoItem] {
        &self.visible
    }

    /// Recompute `visible` from `original`
    pub fn refilter(&mut self, category: FilterCategory) {
        self.visible = apply_filter(&self.original, category);
    }
}
