//! # Rostra Binary
//!
//! The entry point that assembles the adapters into the service layer,
//! starts the periodic close sweep, and serves the API.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use chrono::Utc;
use rostra_api::AppState;
use rostra_auth_simple::SimpleAuthProvider;
use rostra_config::AppConfig;
use rostra_db_sqlite::SqliteDebateRepo;
use rostra_services::Lifecycle;
use secrecy::ExposeSecret;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    // 1. Storage adapter
    let repo = Arc::new(
        SqliteDebateRepo::connect(&config.database_url)
            .await
            .context("opening database")?,
    );

    // 2. Auth adapter
    let auth = Arc::new(SimpleAuthProvider::new(config.auth_salt.expose_secret()));

    // 3. Periodic close sweep. Each debate closes in its own
    //    transaction, so interrupting the task cannot corrupt one.
    let sweep = Lifecycle::new(repo.clone());
    let interval = Duration::from_secs(config.sweep_interval_secs);
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        loop {
            tick.tick().await;
            match sweep.close_expired(Utc::now()).await {
                Ok(0) => {}
                Ok(closed) => tracing::info!(closed, "close sweep finished"),
                Err(error) => tracing::warn!(%error, "close sweep failed"),
            }
        }
    });

    // 4. Serve the API
    let state = Arc::new(AppState::new(repo, auth));
    let app = rostra_api::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "rostra listening");
    axum::serve(listener, app).await?;
    Ok(())
}
