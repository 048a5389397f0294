//! Recent-activity listing handler.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gitpulse_core::{format_message, StoredEvent};
use serde::Serialize;
use tracing::{error, instrument};

use crate::AppState;

/// Fixed window for the activity feed; there is no pagination beyond it.
const RECENT_EVENTS_LIMIT: i64 = 50;

/// One event as presented to the activity feed.
#[derive(Debug, Serialize)]
pub struct EventView {
    /// Storage-assigned identity.
    pub id: String,
    /// Rendered one-line description.
    pub message: String,
    /// Server-side insertion time, RFC 3339.
    pub timestamp: String,
    /// Event kind in wire spelling.
    pub event_type: String,
    /// Repository the event belongs to.
    pub repository: String,
}

impl From<&StoredEvent> for EventView {
    fn from(event: &StoredEvent) -> Self {
        Self {
            id: event.id.to_string(),
            message: format_message(event),
            timestamp: event.created_at.to_rfc3339(),
            event_type: event.event_type.to_string(),
            repository: event.repository.clone(),
        }
    }
}

/// Returns up to 50 most recent events, newest first.
#[instrument(name = "list_events", skip(state))]
pub async fn list_events(State(state): State<AppState>) -> Response {
    match state.storage.events.recent(RECENT_EVENTS_LIMIT).await {
        Ok(events) => {
            let views: Vec<EventView> = events.iter().map(EventView::from).collect();
            (StatusCode::OK, Json(views)).into_response()
        },
        Err(e) => {
            error!(error = %e, "failed to fetch recent events");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to fetch events" })),
            )
                .into_response()
        },
    }
}
