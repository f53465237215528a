//! Server-Sent Events (SSE) broadcaster
//!
//! Streams ingest progress and run completions to connected clients. One
//! broadcast channel feeds every connection; a slow client lags and drops
//! events instead of blocking writers.

use axum::{
    extract::State,
    response::sse::{Event, Sse},
};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

use crate::AppState;

/// GET /api/v1/events - SSE event stream
pub async fn event_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("New SSE client connected");

    let rx = state.subscribe_events();

    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(json) => Some(Ok(Event::default().event(event.event_type()).data(json))),
                Err(e) => {
                    warn!("Failed to serialize event: {}", e);
                    None
                }
            },
            Err(e) => {
                // BroadcastStream error (lagged or closed)
                warn!("SSE stream error: {:?}", e);
                None
            }
        }
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
