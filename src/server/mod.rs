use crate::catalog::CatalogCoordinator;
use crate::config::Config;
use crate::gateway::CatalogGateway;
use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::{
    cors::{Any, CorsLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod manifest;
pub mod routes_addon;
pub mod user_config;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub coordinator: CatalogCoordinator,
    pub config: Arc<Config>,
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = routes_addon::addon_routes()
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx);

    // Serve the configuration page for anything the addon routes don't match
    if let Some(dir) = static_dir {
        if dir.exists() {
            tracing::info!("Serving static files from {:?}", dir);
            let index_path = dir.join("index.html");
            app = app.fallback_service(
                ServeDir::new(&dir)
                    .append_index_html_on_directories(true)
                    .not_found_service(ServeFile::new(index_path)),
            );
        }
    }

    app
}

/// Start the catalog refresh schedule and the HTTP server.
///
/// Returns after a shutdown signal, once the schedule has stopped.
pub async fn start_server(config: Config, gateway: Arc<dyn CatalogGateway>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;

    let coordinator = CatalogCoordinator::new(gateway, config.catalog.buckets.clone());

    let cancel = CancellationToken::new();
    let schedule = coordinator.start_schedule(
        Duration::from_millis(config.catalog.refresh_interval_ms),
        cancel.clone(),
    );

    let ctx = AppContext {
        coordinator,
        config: Arc::new(config.clone()),
    };

    let app = create_router(ctx, config.server.static_dir.clone());

    tracing::info!("Starting server on {}", addr);
    tracing::info!("Manifest available at http://{}/manifest.json", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    let server_result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    cancel.cancel();
    if let Err(e) = schedule.await {
        tracing::warn!("Refresh schedule ended abnormally: {}", e);
    }

    server_result?;
    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received");
}
