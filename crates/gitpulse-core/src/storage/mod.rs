//! Database access layer implementing the repository pattern.
//!
//! The repository layer translates between domain models and the database
//! schema. All SQL lives here; handlers receive a `Storage` instance via
//! application state rather than reaching for a process-wide pool.

use std::sync::Arc;

use sqlx::PgPool;

pub mod events;

use crate::{error::Result, time::Clock};

/// Container for repository instances providing unified database access.
///
/// Entry point for all database operations. Shares one connection pool
/// and one clock across repositories.
#[derive(Clone)]
pub struct Storage {
    /// Repository for canonical event records.
    pub events: Arc<events::Repository>,
}

impl Storage {
    /// Creates a new storage instance over the given pool and clock.
    pub fn new(pool: PgPool, clock: Arc<dyn Clock>) -> Self {
        let pool = Arc::new(pool);

        Self { events: Arc::new(events::Repository::new(pool, clock)) }
    }

    /// Performs a health check on the database connection.
    ///
    /// Executes a trivial query to verify connectivity. Used by the
    /// `/health` and `/ready` endpoints.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Database` if the connection is unhealthy.
    pub async fn health_check(&self) -> Result<()> {
        let _: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&*self.events.pool()).await?;

        Ok(())
    }
}
