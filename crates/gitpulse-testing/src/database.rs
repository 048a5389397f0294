//! Live-database harness for storage integration tests.
//!
//! Connects to the database named by `TEST_DATABASE_URL` (falling back
//! to `DATABASE_URL`) and applies the events schema. When neither is
//! configured or the database is unreachable, [`TestDatabase::connect`]
//! returns `None` and tests skip instead of failing, so the suite runs
//! in environments without PostgreSQL.

use std::{env, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Handle to a live test database with the events schema applied.
pub struct TestDatabase {
    pool: PgPool,
}

impl TestDatabase {
    /// Connects to the configured test database and prepares the schema.
    ///
    /// Returns `None` when no database URL is configured or the
    /// connection cannot be established.
    pub async fn connect() -> Option<Self> {
        let url = env::var("TEST_DATABASE_URL").or_else(|_| env::var("DATABASE_URL")).ok()?;

        let pool = PgPoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(5))
            .connect(&url)
            .await
            .ok()?;

        apply_schema(&pool).await.ok()?;

        Some(Self { pool })
    }

    /// Returns the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Clears the events table so a test starts from a known state.
    ///
    /// # Errors
    ///
    /// Returns error if the truncate fails.
    pub async fn reset(&self) -> sqlx::Result<()> {
        sqlx::query("TRUNCATE events").execute(&self.pool).await?;
        Ok(())
    }
}

/// Mirror of the service's startup migration, kept idempotent.
async fn apply_schema(pool: &PgPool) -> sqlx::Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            event_type TEXT NOT NULL,
            author TEXT NOT NULL,
            repository TEXT NOT NULL,
            from_branch TEXT,
            to_branch TEXT NOT NULL,
            commit_timestamp TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_events_created_at
        ON events(created_at DESC)
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
