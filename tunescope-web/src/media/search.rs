//! Video-search endpoint client
//!
//! Endpoint: `POST {base}/api/music-videos`
//!
//! Request body: `{"song_name", "artist_name", "max_results"}`.
//! Response body: `{"videos": [...], "error": "..."}`. A non-2xx status or an
//! `error` field in a 2xx body are both failures.

use super::video::VideoItem;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Number of videos requested per search
pub const MAX_RESULTS: u32 = 15;

/// Message shown when a failure carries no usable description
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch music videos";

/// Video search failures
#[derive(Debug, Error)]
pub enum VideoSearchError {
    /// Request never produced a response (connect, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Endpoint answered with a non-success status
    #[error("HTTP error {status}")]
    Status {
        status: u16,
        /// `error` field of the response body, when present
        message: Option<String>,
    },

    /// Endpoint answered 2xx but reported an error in the body
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),
}

impl VideoSearchError {
    /// Message suitable for the failed-state banner
    pub fn display_message(&self) -> String {
        match self {
            VideoSearchError::Upstream(message) => message.clone(),
            VideoSearchError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            VideoSearchError::Status {
                status,
                message: None,
            } => format!("HTTP error! status: {}", status),
            VideoSearchError::Network(_) | VideoSearchError::Parse(_) => {
                GENERIC_FAILURE_MESSAGE.to_string()
            }
        }
    }
}

/// Search request body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoSearchRequest {
    pub song_name: String,
    pub artist_name: String,
    pub max_results: u32,
}

impl VideoSearchRequest {
    pub fn new(song_name: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            song_name: song_name.into(),
            artist_name: artist_name.into(),
            max_results: MAX_RESULTS,
        }
    }
}

/// Search response body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VideoSearchResponse {
    #[serde(default)]
    pub videos: Option<Vec<VideoItem>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Anything that can answer a related-video search
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn search(&self, request: &VideoSearchRequest) -> Result<Vec<VideoItem>, VideoSearchError>;
}

/// HTTP client for the video-search endpoint
pub struct VideoSearchClient {
    http_client: Client,
    endpoint: String,
}

impl VideoSearchClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, VideoSearchError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VideoSearchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/api/music-videos", base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Interpret a video-search response
fn parse_response(status: u16, body: &str) -> Result<Vec<VideoItem>, VideoSearchError> {
    // A blank `error` field carries no failure information
    let parsed = serde_json::from_str::<VideoSearchResponse>(body).map(|mut response| {
        response.error = response.error.filter(|message| !message.trim().is_empty());
        response
    });
    let success = (200..300).contains(&status);

    match parsed {
        Ok(response) if !success => Err(VideoSearchError::Status {
            status,
            message: response.error,
        }),
        Err(_) if !success => Err(VideoSearchError::Status {
            status,
            message: None,
        }),
        Ok(VideoSearchResponse {
            error: Some(message),
            ..
        }) => Err(VideoSearchError::Upstream(message)),
        Ok(response) => Ok(response.videos.unwrap_or_default()),
        Err(e) => Err(VideoSearchError::Parse(e.to_string())),
    }
}

#[async_trait]
impl VideoSource for VideoSearchClient {
    async fn search(&self, request: &VideoSearchRequest) -> Result<Vec<VideoItem>, VideoSearchError> {
        debug!(
            song = %request.song_name,
            artist = %request.artist_name,
            url = %self.endpoint,
            "Querying video search endpoint"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| VideoSearchError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| VideoSearchError::Network(e.to_string()))?;

        debug!(status, bytes = body.len(), "Video search responded");
        parse_response(status, &body)
    }
}
