//! Server assembly and lifecycle.

use anyhow::{Context, Result};
use axum::{http::HeaderValue, Router};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::config::{Config, ServerConfig};
use crate::db::Database;
use crate::routes::{auth::seed_admin_or_warn, create_router};
use crate::state::{AppState, SharedState};

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if server.cors_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

/// Routes plus CORS and request tracing.
pub fn build_app(state: SharedState) -> Router {
    let cors = cors_layer(&state.config.server);
    create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Open storage, seed the admin and build the shared state.
pub async fn prepare(config: Config) -> Result<SharedState> {
    let db = Database::open(&config.database.path).with_context(|| {
        format!("Failed to open database at {}", config.database.path.display())
    })?;

    let avatar_dir = config.uploads.avatar_dir();
    tokio::fs::create_dir_all(&avatar_dir)
        .await
        .with_context(|| format!("Failed to create {}", avatar_dir.display()))?;

    seed_admin_or_warn(&db, &config.admin).await;

    AppState::from_config(config, db).context("Failed to initialize AI client")
}

/// Run until Ctrl+C or SIGTERM.
pub async fn run(config: Config) -> Result<()> {
    let address = format!("{}:{}", config.server.host, config.server.port);

    info!("Initializing state...");
    let state = prepare(config).await?;
    let app = build_app(state);

    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
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
}
