//! Health check handlers for service monitoring.
//!
//! Provides liveness, readiness, and health endpoints with a database
//! connectivity check for orchestration systems.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, instrument};

use crate::AppState;

/// Health check response structure.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall service health status.
    pub status: HealthStatus,
    /// Timestamp when the health check was performed.
    pub timestamp: DateTime<Utc>,
    /// Individual component health checks.
    pub checks: HealthChecks,
    /// Service version information.
    pub version: String,
}

/// Overall health status enumeration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// All systems operational.
    Healthy,
    /// Critical systems failing.
    Unhealthy,
}

/// Individual component health check results.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    /// Database connectivity and basic query test.
    pub database: ComponentHealth,
}

/// Health status for an individual component.
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    /// Component status.
    pub status: ComponentStatus,
    /// Optional error message if unhealthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response time in milliseconds.
    pub response_time_ms: u64,
}

/// Component-level health status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    /// Component is healthy.
    Up,
    /// Component is experiencing issues.
    Down,
}

/// Health check endpoint handler.
///
/// Called frequently by orchestration systems and load balancers, so it
/// runs only a trivial connectivity query.
#[instrument(name = "health_check", skip(state))]
pub async fn health_check(State(state): State<AppState>) -> Response {
    debug!("Performing health check");

    let timestamp = DateTime::<Utc>::from(state.clock.now_system());
    let start_time = state.clock.now();

    let (db_status, db_message) = match state.storage.health_check().await {
        Ok(()) => (ComponentStatus::Up, None),
        Err(e) => {
            error!(error = %e, "Database health check failed");
            (ComponentStatus::Down, Some(format!("Database connection failed: {e}")))
        },
    };
    let db_duration = start_time.elapsed();

    let (overall, status_code) = match db_status {
        ComponentStatus::Up => (HealthStatus::Healthy, StatusCode::OK),
        ComponentStatus::Down => (HealthStatus::Unhealthy, StatusCode::SERVICE_UNAVAILABLE),
    };

    let response = HealthResponse {
        status: overall,
        timestamp,
        checks: HealthChecks {
            database: ComponentHealth {
                status: db_status,
                message: db_message,
                response_time_ms: u64::try_from(db_duration.as_millis()).unwrap_or(u64::MAX),
            },
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (status_code, Json(response)).into_response()
}

/// Readiness check endpoint.
///
/// Identical to the health check: the service is ready exactly when its
/// database is reachable.
#[instrument(name = "readiness_check", skip(state))]
pub async fn readiness_check(State(state): State<AppState>) -> Response {
    health_check(State(state)).await
}

/// Liveness check endpoint.
///
/// Minimal check that does not touch external dependencies; only verifies
/// the HTTP server is responding.
#[instrument(name = "liveness_check", skip(state))]
pub async fn liveness_check(State(state): State<AppState>) -> Response {
    debug!("Performing liveness check");

    let response = serde_json::json!({
        "status": "alive",
        "timestamp": DateTime::<Utc>::from(state.clock.now_system()),
        "service": "gitpulse-api"
    });

    (StatusCode::OK, Json(response)).into_response()
}
