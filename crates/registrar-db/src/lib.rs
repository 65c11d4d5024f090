//! # Registrar DB
//!
//! PostgreSQL pool construction, migrations and sqlx error classification.
//!
//! The connection target comes from `DATABASE_URL`, or from the discrete
//! `DATABASE_HOST`/`DATABASE_PORT`/`DATABASE_USER`/`DATABASE_PASSWORD`/
//! `DATABASE_NAME`/`DATABASE_SSLMODE` variables when no URL is set.
//!
//! # Example
//!
//! ```ignore
//! use registrar_db::{DatabaseConfig, init_db_pool};
//!
//! let config = DatabaseConfig::from_env()?;
//! let pool = init_db_pool(&config).await?;
//! registrar_db::run_migrations(&pool).await?;
//! ```

pub mod config;
pub mod error;

use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

pub use config::{DatabaseConfig, DatabaseTarget};
pub use error::{SqlxResultExt, classify};
pub use sqlx::PgPool;

/// Startup connectivity check budget.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the pool and verifies the database answers within [`PING_TIMEOUT`].
pub async fn init_db_pool(config: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(PING_TIMEOUT)
        .connect_lazy_with(config.connect_options()?);

    tokio::time::timeout(PING_TIMEOUT, sqlx::query("SELECT 1").execute(&pool))
        .await
        .context("timed out pinging the database")?
        .context("failed to ping the database")?;

    tracing::info!(max_connections = config.max_connections, "connected to database");
    Ok(pool)
}

/// Applies the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .context("migration failed")?;
    tracing::info!("migrations applied");
    Ok(())
}
