//! Song identity and the session-scoped store that holds it
//!
//! The song-detail view writes the identity of the song being viewed into the
//! session under [`SONG_DETAILS_KEY`]; the related-media pipeline reads it back
//! through the [`IdentityProvider`] it was constructed with.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// Session key under which the current song identity is stored
pub const SONG_DETAILS_KEY: &str = "songDetails";

/// Identity of the song whose detail view was last opened
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongIdentity {
    pub song_name: String,
    pub artist_name: String,
    #[serde(default)]
    pub album_name: String,
    #[serde(default)]
    pub isrc: String,
}

impl SongIdentity {
    /// Identity offered when no song-detail view populated the session
    pub fn test_identity() -> Self {
        Self {
            song_name: "Shape of You".to_string(),
            artist_name: "Ed Sheeran".to_string(),
            album_name: "÷ (Divide)".to_string(),
            isrc: "GBAHS1700214".to_string(),
        }
    }

    /// Whether both search fields are present
    pub fn is_searchable(&self) -> bool {
        !self.song_name.trim().is_empty() && !self.artist_name.trim().is_empty()
    }
}

/// Source of the current song identity
pub trait IdentityProvider: Send + Sync {
    /// Current identity, if any
    fn load(&self) -> Option<SongIdentity>;

    /// Replace the current identity
    fn store(&self, identity: &SongIdentity);
}

/// Ephemeral string key/value storage scoped to one browsing session
///
/// Values are JSON strings, mirroring browser session storage. Nothing is
/// persisted; dropping the store ends the session.
#[derive(Debug, Default)]
pub struct SessionStore {
    items: Mutex<HashMap<String, String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_item(&self, key: &str) -> Option<String> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn set_item(&self, key: &str, value: String) {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    /// Remove `key`, returning whether it was present
    pub fn remove_item(&self, key: &str) -> bool {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
            .is_some()
    }
}

impl IdentityProvider for SessionStore {
    fn load(&self) -> Option<SongIdentity> {
        let raw = self.get_item(SONG_DETAILS_KEY)?;
        match serde_json::from_str::<SongIdentity>(&raw) {
            Ok(identity) => {
                debug!(song = %identity.song_name, artist = %identity.artist_name, "Found song details in session");
                Some(identity)
            }
            Err(e) => {
                warn!("Ignoring malformed song details in session: {}", e);
                None
            }
        }
    }

    fn store(&self, identity: &SongIdentity) {
        match serde_json::to_string(identity) {
            Ok(raw) => self.set_item(SONG_DETAILS_KEY, raw),
            Err(e) => warn!("Failed to encode song details: {}", e),
        }
    }
}
