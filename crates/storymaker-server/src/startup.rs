//! Server startup helper for the engine binary.
//!
//! [`spawn_server`] binds eagerly, so a taken port is reported to the
//! caller, then serves on a background Tokio task until the shutdown
//! signal fires.

use std::net::SocketAddr;
use std::sync::Arc;

use storymaker_world::ServerConfig;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::server::{ServerError, bind, serve};
use crate::state::AppState;

/// Errors that can occur when spawning the game server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// A server running on a background task.
#[derive(Debug)]
pub struct RunningServer {
    /// Address the server is bound to.
    pub addr: SocketAddr,
    /// Background task serving connections.
    pub handle: JoinHandle<()>,
    shutdown: oneshot::Sender<()>,
}

impl RunningServer {
    /// Stop accepting connections and wait for the server task to end.
    pub async fn shutdown(self) {
        // The task may already be gone; then there is nothing to stop.
        let _stopped = self.shutdown.send(());
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "game server task failed");
        }
    }
}

/// Bind and spawn the game server on a background task.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the address cannot be bound.
pub async fn spawn_server(
    config: &ServerConfig,
    state: Arc<AppState>,
) -> Result<RunningServer, StartupError> {
    let listener = bind(config).await?;
    let addr = listener
        .local_addr()
        .map_err(|e| ServerError::Bind(format!("no local address: {e}")))?;
    let (shutdown, signal) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let stop = async {
            // A dropped sender also stops the server.
            let _signalled = signal.await;
        };
        if let Err(e) = serve(listener, state, stop).await {
            tracing::error!(error = %e, "game server exited with error");
        }
    });

    tracing::info!(%addr, "game server spawned on background task");
    Ok(RunningServer {
        addr,
        handle,
        shutdown,
    })
}
