use anyhow::Context;
use dotenvy::dotenv;
use registrar::router::init_router;
use registrar::state::init_app_state;
use registrar_config::AppConfig;
use registrar_db::{DatabaseConfig, init_db_pool, run_migrations};
use registrar_observability::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env();
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_db_pool(&db_config)
        .await
        .context("database unavailable")?;

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let state = init_app_state(pool);
    let app = init_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    info!(%address, "server listening");
    info!("API documentation available at http://localhost:{}/scalar", config.port);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
