mod analysis;
mod assistant_client;
mod config;
mod errors;
mod files;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::session::SessionManager;
use crate::assistant_client::azure::AzureAssistantClient;
use crate::config::Config;
use crate::files::samples::seed_sample_resumes;
use crate::files::store::FileStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Search API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize file store
    let store = FileStore::new(&config.resumes_dir, &config.jobs_dir);
    store.init().await?;
    info!(
        "File store ready (resumes: {}, jobs: {})",
        config.resumes_dir.display(),
        config.jobs_dir.display()
    );
    if config.seed_sample_resumes {
        seed_sample_resumes(&store).await?;
    }

    // Initialize assistant backend
    let backend = AzureAssistantClient::new(config.azure.clone(), store.clone())?;
    info!(
        "Assistant client initialized (endpoint: {}, deployment: {})",
        config.azure.endpoint, config.azure.deployment_name
    );

    let sessions = SessionManager::new(
        Arc::new(backend),
        store.clone(),
        config.azure.deployment_name.clone(),
    );

    // Build app state
    let state = AppState {
        store,
        sessions: Arc::new(sessions),
    };

    // Build router
    let app = build_router(state, &config.static_dir)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM. In-flight analyses finish, including their remote cleanup.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
