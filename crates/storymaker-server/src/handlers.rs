//! HTTP handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, serde::Deserialize)]
pub struct Health {
    /// Always `ok` while the server answers.
    pub status: String,
    /// Number of live sessions.
    pub sessions: usize,
}

/// Liveness check with the live session count.
///
/// # Route
///
/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "ok".to_owned(),
        sessions: state.session_count().await,
    })
}
