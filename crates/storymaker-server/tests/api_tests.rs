//! Integration tests for the HTTP endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use storymaker_entities::objects;
use storymaker_server::handlers::Health;
use storymaker_server::router::build_router;
use storymaker_server::state::AppState;
use storymaker_types::StartCommand;
use storymaker_world::GameConfig;
use tower::ServiceExt;

fn make_state() -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(objects::registry().unwrap()),
        GameConfig::default(),
    ))
}

async fn get(state: Arc<AppState>, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = build_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn health_reports_no_sessions_at_start() {
    let (status, body) = get(make_state(), "/health").await;
    assert_eq!(status, StatusCode::OK);

    let health: Health = serde_json::from_slice(&body).unwrap();
    assert_eq!(
        health,
        Health {
            status: "ok".to_owned(),
            sessions: 0,
        }
    );
}

#[tokio::test]
async fn health_counts_open_sessions() {
    let state = make_state();
    state
        .open_session(StartCommand {
            name: "Ada".to_owned(),
            seed: 1,
        })
        .await
        .unwrap();

    let (_, body) = get(state, "/health").await;
    let health: Health = serde_json::from_slice(&body).unwrap();
    assert_eq!(health.sessions, 1);
}

#[tokio::test]
async fn game_socket_requires_an_upgrade() {
    let (status, _) = get(make_state(), "/ws").await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (status, _) = get(make_state(), "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
