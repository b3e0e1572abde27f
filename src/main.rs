//! AYAZay Search - A product search gateway
//!
//! Starts the HTTP API in front of the retrieval service.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ayazay_search::api::{create_router, AppState};
use ayazay_search::upstream::{
    CredentialProvider, HttpTransport, MetadataTokenProvider, StaticTokenProvider,
};
use ayazay_search::{Config, SearchService};

/// Main entry point for the search gateway.
///
/// # Startup Sequence
/// 1. Load `.env` and initialize the tracing subscriber
/// 2. Load configuration from environment variables
/// 3. Build the credential provider, transport and search service
/// 4. Create Axum router with all endpoints
/// 5. Serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ayazay_search=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting AYAZay Search API");

    let config = Config::from_env();
    info!(
        "Configuration loaded: serving_config={}, port={}, response_ttl={}s, token_ttl={}s",
        config.serving_config_path(),
        config.server_port,
        config.response_cache_ttl,
        config.token_cache_ttl
    );

    let credentials: Arc<dyn CredentialProvider> = match &config.access_token {
        Some(token) => {
            info!("Using configured access token");
            Arc::new(StaticTokenProvider::new(token.clone()))
        }
        None => {
            info!("Using metadata server credentials");
            Arc::new(MetadataTokenProvider::new().context("failed to build metadata client")?)
        }
    };
    let transport = HttpTransport::new().context("failed to build HTTP client")?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let service = SearchService::new(config, credentials, Arc::new(transport));
    let app = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
