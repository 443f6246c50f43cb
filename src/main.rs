use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use coffee_shop_api::app::{router, AppState};
use coffee_shop_api::auth::TokenVerifier;
use coffee_shop_api::config;
use coffee_shop_api::database::{DatabaseManager, PgDrinkRepository};
use coffee_shop_api::is_production;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, AUTH0_DOMAIN, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting Coffee Shop API in {:?} mode", config.environment);

    if is_production!() && config.security.enable_cors && config.security.cors_origins.is_empty() {
        tracing::warn!("CORS allows any origin in production");
    }

    let database = DatabaseManager::connect(&config.database).context("failed to set up database pool")?;
    database.create_schema().await.context("failed to prepare drinks table")?;

    let verifier = TokenVerifier::from_config(&config.auth).context("failed to build JWKS client")?;
    tracing::info!(
        "Verifying tokens for audience '{}' from issuer {}",
        config.auth.audience,
        config.auth.issuer()
    );

    let state = AppState::new(
        Arc::new(PgDrinkRepository::new(database.pool())),
        Arc::new(verifier),
    );
    let app = router(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Coffee Shop API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    database.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
