//! Webhook intake handler.
//!
//! Reads the provider's event kind header and raw body, normalizes the
//! payload, and persists the resulting event. Envelopes that match no
//! rule are acknowledged as ignored; nothing is stored for them.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use gitpulse_core::normalize;
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::AppState;

/// Header carrying the event kind on GitHub webhook deliveries.
const EVENT_KIND_HEADER: &str = "x-github-event";

/// Acknowledgement returned for every webhook delivery.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    /// `success`, `ignored`, or `error`.
    pub status: &'static str,
    /// Human-readable outcome description.
    pub message: String,
    /// Identity of the stored event, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
}

/// Accepts a webhook delivery.
///
/// Always returns 200 for deliveries that were processed or deliberately
/// ignored; 500 only when persistence fails.
#[instrument(
    name = "handle_webhook",
    skip(state, headers, body),
    fields(
        event_kind = headers
            .get(EVENT_KIND_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("none"),
        body_bytes = body.len(),
    )
)]
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let kind = headers.get(EVENT_KIND_HEADER).and_then(|v| v.to_str().ok()).unwrap_or_default();

    let event = match normalize(kind, &body) {
        Ok(event) => event,
        Err(skip) => {
            debug!(reason = %skip, "webhook ignored");
            return (
                StatusCode::OK,
                Json(WebhookAck {
                    status: "ignored",
                    message: "Event not processed".to_string(),
                    event_id: None,
                }),
            )
                .into_response();
        },
    };

    match state.storage.events.insert(&event).await {
        Ok(event_id) => {
            info!(
                event_id = %event_id,
                event_type = %event.event_type,
                repository = %event.repository,
                "webhook event stored"
            );
            (
                StatusCode::OK,
                Json(WebhookAck {
                    status: "success",
                    message: "Webhook processed".to_string(),
                    event_id: Some(event_id.to_string()),
                }),
            )
                .into_response()
        },
        Err(e) => {
            error!(error = %e, "failed to persist webhook event");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(WebhookAck {
                    status: "error",
                    message: "Failed to process webhook".to_string(),
                    event_id: None,
                }),
            )
                .into_response()
        },
    }
}
