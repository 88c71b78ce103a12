//! Music catalog web API client
//!
//! Used by the artist view to list songs the artist is featured on. The catalog
//! token is issued elsewhere; this client only forwards it as a bearer token.

use regex::Regex;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};
use tunescope_common::display::{join_artist_names, release_year, song_length, truncate_text};

/// Albums requested from the "appears on" listing
const APPEARS_ON_LIMIT: u32 = 50;

/// Albums inspected for featured tracks
const MAX_FEATURED_ALBUMS: usize = 6;

/// Featured songs returned
const MAX_FEATURED_SONGS: usize = 6;

/// Song titles longer than this are shortened for the card label
const CARD_TITLE_MAX_CHARS: usize = 24;

/// Album titles typical of mood/playlist compilations
const GENERIC_TITLE_PATTERN: &str = r"relaxing|mood|sleep|chill|sad|happy|vibes|playlist|20\d\d";

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Catalog token rejected")]
    Unauthorized,

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogArtist {
    pub id: String,
    pub name: String,
}

/// Album entry from an artist's album listing
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AlbumSummary {
    pub id: String,
    pub name: String,
    pub album_type: String,
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
}

#[derive(Debug, Deserialize)]
struct AlbumPage {
    #[serde(default)]
    items: Vec<AlbumSummary>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    #[serde(default)]
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct TrackPage {
    #[serde(default)]
    pub items: Vec<CatalogTrack>,
}

/// Full album with embedded tracks
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
    #[serde(default)]
    pub tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct AlbumBatch {
    /// Unknown ids come back as `null`
    #[serde(default)]
    albums: Vec<Option<Album>>,
}

/// A track the artist appears on, with its album art and card text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedSong {
    pub id: String,
    pub name: String,
    #[serde(rename = "imageURL")]
    pub image_url: String,
    /// Card label, `name` shortened with `...` when long
    pub label: String,
    /// Credited artists, comma separated
    pub artists: String,
    /// `M:SS`
    pub length: String,
    /// Album release year
    pub year: String,
}

impl FeaturedSong {
    fn from_track(track: &CatalogTrack, album: &Album, image_url: &str) -> Self {
        Self {
            id: track.id.clone(),
            name: track.name.clone(),
            image_url: image_url.to_string(),
            label: truncate_text(&track.name, CARD_TITLE_MAX_CHARS),
            artists: join_artist_names(track.artists.iter().map(|a| a.name.as_str()), ", "),
            length: song_length(track.duration_ms),
            year: release_year(&album.release_date).to_string(),
        }
    }
}

fn generic_title_regex() -> Option<&'static Regex> {
    static REGEX: OnceLock<Option<Regex>> = OnceLock::new();
    REGEX
        .get_or_init(|| match Regex::new(GENERIC_TITLE_PATTERN) {
            Ok(regex) => Some(regex),
            Err(e) => {
                warn!("Album title filter disabled: {}", e);
                None
            }
        })
        .as_ref()
}

/// Whether an "appears on" album is likely a real release featuring the artist
///
/// Excludes various-artists releases, singles, compilations, and albums whose
/// title reads like a mood playlist or a yearly compilation.
pub fn is_relevant_album(album: &AlbumSummary) -> bool {
    let various_artists = album
        .artists
        .iter()
        .any(|artist| artist.name.to_lowercase() == "various artists");
    let single_or_compilation = matches!(album.album_type.as_str(), "single" | "compilation");
    let generic_title =
        generic_title_regex().is_some_and(|regex| regex.is_match(&album.name.to_lowercase()));

    !various_artists && !single_or_compilation && !generic_title
}

/// Ids of the first relevant albums, in listing order
pub fn select_featured_albums(albums: &[AlbumSummary]) -> Vec<String> {
    albums
        .iter()
        .filter(|album| is_relevant_album(album))
        .take(MAX_FEATURED_ALBUMS)
        .map(|album| album.id.clone())
        .collect()
}

/// Tracks credited to `artist_id`, in album then track order, capped at six
pub fn collect_featured_songs(albums: &[Option<Album>], artist_id: &str) -> Vec<FeaturedSong> {
    albums
        .iter()
        .flatten()
        .flat_map(|album| {
            let image_url = album
                .images
                .first()
                .map(|image| image.url.clone())
                .unwrap_or_default();
            album
                .tracks
                .iter()
                .flat_map(|page| page.items.iter())
                .filter(|track| track.artists.iter().any(|artist| artist.id == artist_id))
                .map(move |track| FeaturedSong::from_track(track, album, &image_url))
        })
        .take(MAX_FEATURED_SONGS)
        .collect()
}

/// HTTP client for the music catalog web API
pub struct CatalogClient {
    http_client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CatalogError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T>(&self, url: &str, query: &[(&str, String)], token: &str) -> Result<T, CatalogError>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!(url = %url, "Querying catalog API");

        let response = self
            .http_client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::Unauthorized);
        }
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| CatalogError::Parse(e.to_string()))
    }

    /// Albums other artists released that `artist_id` appears on
    pub async fn appears_on_albums(
        &self,
        artist_id: &str,
        token: &str,
    ) -> Result<Vec<AlbumSummary>, CatalogError> {
        let url = format!("{}/artists/{}/albums", self.base_url, artist_id);
        let page: AlbumPage = self
            .get_json(
                &url,
                &[
                    ("include_groups", "appears_on".to_string()),
                    ("limit", APPEARS_ON_LIMIT.to_string()),
                ],
                token,
            )
            .await?;
        Ok(page.items)
    }

    /// Fetch several albums (with tracks) in one request
    pub async fn albums(&self, ids: &[String], token: &str) -> Result<Vec<Option<Album>>, CatalogError> {
        let url = format!("{}/albums", self.base_url);
        let batch: AlbumBatch = self.get_json(&url, &[("ids", ids.join(","))], token).await?;
        Ok(batch.albums)
    }

    /// Songs by other artists that feature `artist_id`
    pub async fn try_featured_songs(
        &self,
        artist_id: &str,
        token: &str,
    ) -> Result<Vec<FeaturedSong>, CatalogError> {
        let listing = self.appears_on_albums(artist_id, token).await?;
        let album_ids = select_featured_albums(&listing);
        if album_ids.is_empty() {
            return Ok(Vec::new());
        }

        let albums = self.albums(&album_ids, token).await?;
        let songs = collect_featured_songs(&albums, artist_id);

        info!(
            artist_id = %artist_id,
            albums = album_ids.len(),
            songs = songs.len(),
            "Collected featured songs"
        );
        Ok(songs)
    }

    /// Like [`try_featured_songs`](Self::try_featured_songs), but any failure
    /// is logged and yields an empty list
    pub async fn featured_songs(&self, artist_id: &str, token: &str) -> Vec<FeaturedSong> {
        match self.try_featured_songs(artist_id, token).await {
            Ok(songs) => songs,
            Err(e) => {
                warn!(artist_id = %artist_id, "Featured songs lookup failed: {}", e);
                Vec::new()
            }
        }
    }
}
