//! Lyrics endpoint client
//!
//! Endpoint: `GET {base}/api/lyrics?isrc=<isrc>`
//!
//! The lyrics text is nested at `message.body.lyrics.lyrics_body`. A response
//! missing any level of that path means "no lyrics", not an error.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use tunescope_common::{Error, Result};

const LYRICS_BODY_POINTER: &str = "/message/body/lyrics/lyrics_body";

/// Pull the plain-text lyrics out of a lyrics response; `""` when absent
pub fn extract_lyrics_body(response: &Value) -> String {
    response
        .pointer(LYRICS_BODY_POINTER)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// HTTP client for the lyrics endpoint
pub struct LyricsClient {
    http_client: Client,
    endpoint: String,
}

impl LyricsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/api/lyrics", base_url.trim_end_matches('/')),
        })
    }

    /// Lyrics for the recording identified by `isrc`
    ///
    /// Never fails: transport or decode problems are logged and yield `""`.
    pub async fn fetch_lyrics(&self, isrc: &str) -> String {
        match self.try_fetch(isrc).await {
            Ok(lyrics) => lyrics,
            Err(e) => {
                warn!(isrc = %isrc, "Lyrics lookup failed: {}", e);
                String::new()
            }
        }
    }

    async fn try_fetch(&self, isrc: &str) -> Result<String> {
        debug!(isrc = %isrc, url = %self.endpoint, "Querying lyrics endpoint");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(&[("isrc", isrc)])
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Http(format!("lyrics endpoint returned {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        Ok(extract_lyrics_body(&body))
    }
}
