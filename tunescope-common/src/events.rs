//! Event types for the TuneScope event system
//!
//! Provides the shared event definitions and the EventBus used to fan events
//! out to SSE clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// TuneScope event types
///
/// Events are broadcast via EventBus and serialized for SSE transmission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TuneScopeEvent {
    /// A song-detail view stored a new identity in the session
    SongIdentityStored {
        song_name: String,
        artist_name: String,
        timestamp: DateTime<Utc>,
    },

    /// The session identity was removed
    SongIdentityCleared { timestamp: DateTime<Utc> },

    /// Related media was requested but the session holds no identity
    ///
    /// Not an error: the UI offers the test identity instead.
    IdentityMissing { timestamp: DateTime<Utc> },

    /// A video search request was issued
    RelatedMediaLoading {
        /// Request generation this load belongs to
        generation: u64,
        song_name: String,
        artist_name: String,
        timestamp: DateTime<Utc>,
    },

    /// A video search completed and its results were applied
    RelatedMediaReady {
        generation: u64,
        video_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A video search failed
    RelatedMediaFailed {
        generation: u64,
        /// Display-ready message
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// A response arrived for a superseded request and was dropped
    StaleResponseDiscarded {
        generation: u64,
        latest_generation: u64,
        timestamp: DateTime<Utc>,
    },

    /// The visible video list was re-derived for a filter category
    RelatedMediaFiltered {
        category: String,
        visible_count: usize,
        timestamp: DateTime<Utc>,
    },
}

impl TuneScopeEvent {
    /// SSE event name for this event
    pub fn event_type(&self) -> &'static str {
        match self {
            TuneScopeEvent::SongIdentityStored { .. } => "SongIdentityStored",
            TuneScopeEvent::SongIdentityCleared { .. } => "SongIdentityCleared",
            TuneScopeEvent::IdentityMissing { .. } => "IdentityMissing",
            TuneScopeEvent::RelatedMediaLoading { .. } => "RelatedMediaLoading",
            TuneScopeEvent::RelatedMediaReady { .. } => "RelatedMediaReady",
            TuneScopeEvent::RelatedMediaFailed { .. } => "RelatedMediaFailed",
            TuneScopeEvent::StaleResponseDiscarded { .. } => "StaleResponseDiscarded",
            TuneScopeEvent::RelatedMediaFiltered { .. } => "RelatedMediaFiltered",
        }
    }
}

/// Broadcast channel for TuneScope events
///
/// Cloning is cheap; all clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TuneScopeEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    ///
    /// # Examples
    ///
    /// ```
    /// use tunescope_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<TuneScopeEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: TuneScopeEvent,
    ) -> Result<usize, broadcast::error::SendError<TuneScopeEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: TuneScopeEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
