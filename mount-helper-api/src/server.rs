//! Listener setup for the mount helper HTTP service

use crate::config::{Config, ListenAddress};
use crate::routes::create_app;
use crate::state::AppState;
use anyhow::{Context, Result};
use std::future::Future;
use std::path::Path;
use tokio::net::{TcpListener, UnixListener};
use tracing::info;

/// Serve the API on the configured address until `shutdown` resolves.
pub async fn run_server<F>(config: Config, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = config.listen_address()?;
    let app = create_app(AppState::from_config(&config));

    match address {
        ListenAddress::Tcp(addr) => {
            let listener = TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind to {addr}"))?;
            info!("Mount helper listening on http://{}", addr);

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
                .context("Server failed")?;
        }
        ListenAddress::Unix(path) => {
            let listener = bind_unix(&path)?;
            info!("Mount helper listening on unix:{}", path.display());

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown)
                .await
                .context("Server failed")?;
        }
    }

    info!("Mount helper stopped");
    Ok(())
}

/// Bind a Unix socket, replacing a stale socket file left by a previous run.
fn bind_unix(path: &Path) -> Result<UnixListener> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create socket directory {}", parent.display()))?;
    }
    if path.exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove stale socket {}", path.display()))?;
    }
    UnixListener::bind(path).with_context(|| format!("Failed to bind to {}", path.display()))
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Received shutdown signal, stopping mount helper gracefully");
}
