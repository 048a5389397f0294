//! Static activity page.

use axum::response::Html;

/// Serves the activity feed page.
///
/// A single embedded HTML document that polls `/api/events` for the
/// rendered messages; no templating or asset pipeline involved.
pub async fn activity_page() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
