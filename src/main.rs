use anyhow::Context;
use doc_catalog::app::{self, AppState};
use doc_catalog::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_catalog=info,tower_http=info".into()),
        )
        .init();

    tracing::info!("Starting document catalog server...");

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    let state = AppState::connect(&config)
        .await
        .context("Failed to configure MongoDB client")?;

    tracing::info!(
        database = %config.database,
        "MongoDB client configured"
    );

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
