//! Album artwork download and dominant color lookup

use crate::color::{dominant_color, ColorValue};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Artwork lookup errors
#[derive(Debug, Error)]
pub enum ArtworkError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Artwork server returned {0}")]
    Status(u16),

    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

/// Fetches artwork images over HTTP
pub struct ArtworkClient {
    http_client: Client,
}

impl ArtworkClient {
    pub fn new(timeout: Duration) -> Result<Self, ArtworkError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ArtworkError::Network(e.to_string()))?;

        Ok(Self { http_client })
    }

    /// Raw image bytes at `url`
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, ArtworkError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ArtworkError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ArtworkError::Status(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ArtworkError::Network(e.to_string()))?;
        debug!(url = %url, bytes = bytes.len(), "Downloaded artwork");
        Ok(bytes.to_vec())
    }

    /// Dominant color of the image at `url`
    pub async fn dominant_color(&self, url: &str) -> Result<ColorValue, ArtworkError> {
        let bytes = self.fetch(url).await?;
        Ok(dominant_color(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client = ArtworkClient::new(Duration::from_secs(2)).unwrap();
        let err = client.dominant_color("http://127.0.0.1:9/cover.png").await.unwrap_err();
        assert!(matches!(err, ArtworkError::Network(_)));
    }

    #[test]
    fn test_decode_error_converts() {
        let err: ArtworkError = image::load_from_memory(b"not an image").unwrap_err().into();
        assert!(err.to_string().starts_with("Image decode failed"));
    }
}
