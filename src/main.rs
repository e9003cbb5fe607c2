use anyhow::{Context, Result};
use crowdin_width_qa::config::Config;
use crowdin_width_qa::server::{build_router, AppState};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("crowdin_width_qa=info".parse()?),
        )
        .init();

    info!("Starting Crowdin text width QA app");

    let config = Config::from_env()?;
    if config.crowdin_client_secret.is_none() {
        warn!("CROWDIN_CLIENT_SECRET not set, JWT signatures will not be verified");
    }
    if config.organization.is_none() {
        warn!("CROWDIN_ORG_ID not set, string metadata lookups will fail open");
    }

    let port = config.port;
    info!("Base URL: {}", config.base_url);

    let state = AppState::new(config)?;
    let app = build_router(state);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    info!("✓ Listening on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
