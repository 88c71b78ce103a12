//! Server-Sent Events (SSE) for pipeline progress

use crate::{AppState, MODULE_NAME};
use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::Stream;
use std::convert::Infallible;

/// GET /events - SSE event stream
///
/// Streams every `TuneScopeEvent` published by the related-media pipeline and
/// the session endpoints, plus a periodic heartbeat.
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tunescope_common::sse::create_event_sse_stream(MODULE_NAME, &state.event_bus)
}
