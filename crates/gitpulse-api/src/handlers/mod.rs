//! HTTP request handlers for the GitPulse API.
//!
//! Handlers follow a consistent pattern:
//! - Tracing for observability
//! - Normalization outcomes mapped to acknowledgements, never failures
//! - Standardized JSON responses
//!
//! # Handler organization
//!
//! - `ingest` - webhook intake
//! - `events` - recent-activity listing
//! - `health` - health, readiness, and liveness probes
//! - `index` - static activity page
//!
//! # Error handling
//!
//! A webhook that cannot be normalized is acknowledged with an "ignored"
//! status rather than rejected; only storage faults produce a 500. The
//! process never crashes on a malformed request.

pub mod events;
pub mod health;
pub mod index;
pub mod ingest;

pub use events::list_events;
pub use health::{health_check, liveness_check, readiness_check};
pub use index::activity_page;
pub use ingest::handle_webhook;
