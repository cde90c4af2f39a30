//! Axum router construction for the game server.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router for the game server.
///
/// The router includes:
/// - `GET /` -- game `WebSocket` (the browser client connects to the root)
/// - `GET /ws` -- the same `WebSocket` under an explicit path
/// - `GET /health` -- liveness and session count
///
/// CORS allows any origin so the browser client can be served from
/// anywhere during development.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(ws::ws_game))
        .route("/ws", get(ws::ws_game))
        .route("/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
