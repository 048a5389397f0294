//! GitPulse webhook activity feed service.
//!
//! Main entry point. Initializes tracing, loads configuration, connects
//! to PostgreSQL, applies the schema, and serves the HTTP API until a
//! shutdown signal arrives.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use gitpulse_api::{start_server, AppState, Config};
use gitpulse_core::{RealClock, Storage};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    info!("Starting GitPulse webhook activity feed service");

    let config = Config::load()?;
    info!(
        database_url = %config.database_url_masked(),
        host = %config.host,
        port = config.port,
        max_connections = config.database_max_connections,
        "Configuration loaded"
    );

    let db_pool = create_database_pool(&config).await?;
    info!("Database connection pool established");

    run_migrations(&db_pool).await?;
    info!("Database schema ready");

    let clock = Arc::new(RealClock);
    let state = AppState::new(Storage::new(db_pool.clone(), clock.clone()), clock);
    let addr = config.parse_server_addr()?;

    info!(addr = %addr, "GitPulse is ready to receive webhooks");
    start_server(state, addr).await.context("HTTP server failed")?;

    db_pool.close().await;
    info!("Database connections closed");

    info!("GitPulse shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,gitpulse=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}

/// Creates the database connection pool with retry logic.
async fn create_database_pool(config: &Config) -> Result<sqlx::PgPool> {
    let mut retries = 0;
    const MAX_RETRIES: u32 = 5;
    const RETRY_DELAY: Duration = Duration::from_secs(2);

    loop {
        match PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connection_timeout))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => {
                sqlx::query("SELECT 1")
                    .fetch_one(&pool)
                    .await
                    .context("Failed to verify database connection")?;

                return Ok(pool);
            },
            Err(_e) if retries < MAX_RETRIES => {
                retries += 1;
                info!(
                    attempt = retries,
                    max_retries = MAX_RETRIES,
                    "Database connection failed, retrying..."
                );
                tokio::time::sleep(RETRY_DELAY).await;
            },
            Err(e) => {
                return Err(e).context("Failed to create database connection pool after retries");
            },
        }
    }
}

/// Applies the events schema, idempotently.
async fn run_migrations(pool: &sqlx::PgPool) -> Result<()> {
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
    .await
    .context("Failed to create events table")?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_events_created_at
        ON events(created_at DESC)
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create events created_at index")?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_events_event_type
        ON events(event_type)
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create events event_type index")?;

    Ok(())
}
