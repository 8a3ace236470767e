use crate::config::Config;
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Router,
};
use dircast_common::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod routes_admin;
pub mod routes_control;
pub mod routes_web;

/// Shared application context
#[derive(Clone)]
pub struct AppContext {
    pub state: Arc<AppState>,
    pub config: Arc<Config>,
}

/// Create the Axum router with all routes
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Parsed-action control endpoints
        .nest("/control", routes_control::control_routes())
        // Administrative share management
        .nest("/api", routes_admin::admin_routes())
        // Virtual-file delivery: descriptors and media bytes
        .merge(routes_web::web_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Start the HTTP server
pub async fn start_server(config: Config, state: Arc<AppState>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| {
            format!(
                "Invalid listen address {}:{}",
                config.server.host, config.server.port
            )
        })?;

    let ctx = AppContext {
        state,
        config: Arc::new(config),
    };
    let app = create_router(ctx);

    // A bind failure here is fatal: there is no server without a socket.
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {}", e);
        return;
    }
    tracing::info!("Shutting down...");
}

/// Map a per-request error to its HTTP response.
///
/// Per-request failures never cross the boundary as panics; I/O failures
/// from the virtual file layer surface as 404-equivalents.
pub(crate) fn error_response(err: Error) -> (StatusCode, String) {
    let status = match &err {
        Error::InvalidArgument(_) | Error::NotBrowsable(_) => StatusCode::BAD_REQUEST,
        Error::NoSuchObject(_) | Error::Io(_) => StatusCode::NOT_FOUND,
        Error::Closed | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}
