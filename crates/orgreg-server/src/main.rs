//! Orgreg Server: application entry point.

use std::sync::Arc;

use orgreg_db::DbManager;
use orgreg_server::{ServerConfig, router};
use orgreg_service::OrganizationService;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str =
    "orgreg_server=info,orgreg_service=info,orgreg_db=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; variables may come from the environment.
    let _ = dotenvy::dotenv();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .init();

    tracing::info!("Starting organization registry...");

    let config = ServerConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let db = DbManager::open(&config.db).await?;

    let repo = db.tenant_repository();
    let service = Arc::new(OrganizationService::new(repo, config.auth.clone()));
    let app = router(service);

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.disconnect();
    tracing::info!("Organization registry stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
