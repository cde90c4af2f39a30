//! Game server binary for the StoryMaker engine.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `STORYMAKER_CONFIG` or `storymaker-config.yaml`
//! 3. Build the entity registry (fatal if the catalog is inconsistent)
//! 4. Spawn the game server on a background task
//! 5. Wait for Ctrl-C, then stop accepting connections

mod error;

use std::path::PathBuf;
use std::sync::Arc;

use storymaker_entities::objects;
use storymaker_server::{AppState, spawn_server};
use storymaker_world::GameConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;

const DEFAULT_CONFIG: &str = "storymaker-config.yaml";

/// Application entry point for the game server.
///
/// # Errors
///
/// Returns an error if configuration, the registry, or the server fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("storymaker-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        addr = %config.server.bind_addr(),
        map_width = config.map.width,
        map_height = config.map.height,
        minutes_per_action = config.session.minutes_per_action,
        "Configuration loaded"
    );

    // 3. Build the entity registry.
    let registry = objects::registry().map_err(EngineError::from)?;
    info!(types = registry.len(), "Entity registry built");

    // 4. Spawn the game server.
    let server_config = config.server.clone();
    let state = Arc::new(AppState::new(Arc::new(registry), config));
    let server = spawn_server(&server_config, state)
        .await
        .map_err(EngineError::from)?;
    info!(addr = %server.addr, "Game server ready");

    // 5. Run until interrupted.
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| EngineError::Signal {
            message: format!("failed to listen for ctrl-c: {e}"),
        })?;
    info!("Shutdown requested");
    server.shutdown().await;

    info!("storymaker-engine shutdown complete");
    Ok(())
}

/// Load the game configuration.
///
/// A missing file yields the defaults.
fn load_config() -> Result<GameConfig, EngineError> {
    let path = std::env::var_os("STORYMAKER_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG), PathBuf::from);
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
    }
    Ok(GameConfig::from_file(&path)?)
}
