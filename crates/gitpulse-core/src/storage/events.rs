//! Repository for canonical event records.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::warn;
use uuid::Uuid;

use crate::{
    error::Result,
    models::{EventId, NewEvent, StoredEvent},
    time::Clock,
};

/// Repository for canonical event database operations.
///
/// Events are insert-only: a record is created once at webhook-handling
/// time and never updated afterwards.
pub struct Repository {
    pool: Arc<PgPool>,
    clock: Arc<dyn Clock>,
}

impl Repository {
    /// Creates a new repository instance.
    pub fn new(pool: Arc<PgPool>, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Returns a reference to the database pool.
    pub fn pool(&self) -> Arc<PgPool> {
        self.pool.clone()
    }

    /// Inserts a normalized event and returns its assigned identity.
    ///
    /// `created_at` is stamped from the injected clock at the moment of
    /// insertion, which keeps it non-decreasing with insertion order.
    ///
    /// # Errors
    ///
    /// Returns error if the insert fails.
    pub async fn insert(&self, event: &NewEvent) -> Result<EventId> {
        let created_at = DateTime::<Utc>::from(self.clock.now_system());

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO events (
                event_type, author, repository, from_branch, to_branch,
                commit_timestamp, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(event.event_type)
        .bind(&event.author)
        .bind(&event.repository)
        .bind(&event.from_branch)
        .bind(&event.to_branch)
        .bind(&event.timestamp)
        .bind(created_at)
        .fetch_one(&*self.pool)
        .await?;

        Ok(EventId::from(id))
    }

    /// Fetches the most recent events, newest first.
    ///
    /// Ordered by `created_at` descending with the identity as a
    /// deterministic tiebreak, capped at `limit` records. Rows are
    /// decoded individually; a row that fails to decode (for example an
    /// `event_type` value written outside this service) is logged and
    /// dropped from the listing rather than failing it.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    pub async fn recent(&self, limit: i64) -> Result<Vec<StoredEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT id, event_type, author, repository, from_branch, to_branch,
                   commit_timestamp, created_at
            FROM events
            ORDER BY created_at DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&*self.pool)
        .await?;

        let mut events = Vec::with_capacity(rows.len());
        for row in &rows {
            match StoredEvent::from_row(row) {
                Ok(event) => events.push(event),
                Err(error) => {
                    warn!(error = %error, "skipping event row that failed to decode");
                }
            }
        }

        Ok(events)
    }
}
