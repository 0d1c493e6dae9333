//! API server lifecycle management.
//!
//! Provides [`start_server`] which binds to a TCP port and serves the
//! router until the process exits, and [`spawn_server`] which runs it on
//! a background task.

use std::net::SocketAddr;
use std::sync::Arc;

use firewatch_core::{ApiConfig, RouteCatalogSource, ZoneReadingSource};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::router::build_router;
use crate::state::AppState;

/// Errors that can occur when starting or running the API server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Failed to bind to the network address.
    #[error("bind error: {0}")]
    Bind(String),

    /// The server encountered a fatal error while serving.
    #[error("serve error: {0}")]
    Serve(String),
}

async fn bind(config: &ApiConfig) -> Result<TcpListener, ServerError> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ServerError::Bind(format!("invalid address: {e}")))?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| ServerError::Bind(format!("bind failed on {addr}: {e}")))?;

    info!(%addr, "API server listening");
    Ok(listener)
}

async fn serve<S, C>(listener: TcpListener, state: Arc<AppState<S, C>>) -> Result<(), ServerError>
where
    S: ZoneReadingSource + 'static,
    C: RouteCatalogSource + 'static,
{
    axum::serve(listener, build_router(state))
        .await
        .map_err(|e| ServerError::Serve(format!("serve error: {e}")))
}

/// Start the API server and serve until the process is terminated.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind or the server
/// encounters a fatal I/O error.
pub async fn start_server<S, C>(
    config: &ApiConfig,
    state: Arc<AppState<S, C>>,
) -> Result<(), ServerError>
where
    S: ZoneReadingSource + 'static,
    C: RouteCatalogSource + 'static,
{
    let listener = bind(config).await?;
    serve(listener, state).await
}

/// Bind now and serve on a background task.
///
/// Binding happens before this returns so address errors surface at
/// startup. Serve errors after that are logged by the task.
///
/// # Errors
///
/// Returns [`ServerError::Bind`] if the listener cannot bind.
pub async fn spawn_server<S, C>(
    config: &ApiConfig,
    state: Arc<AppState<S, C>>,
) -> Result<JoinHandle<()>, ServerError>
where
    S: ZoneReadingSource + 'static,
    C: RouteCatalogSource + 'static,
{
    let listener = bind(config).await?;
    Ok(tokio::spawn(async move {
        if let Err(e) = serve(listener, state).await {
            error!(error = %e, "API server stopped");
        }
    }))
}
