//! Live `WebSocket` round trips against a spawned server.
//!
//! Each test binds an ephemeral port, drives the game through
//! [`GameClient`], and checks what arrives on the topic stream.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use storymaker_client::{GameClient, GameView, TopicStream};
use storymaker_entities::objects;
use storymaker_server::{AppState, RunningServer, spawn_server};
use storymaker_types::{Envelope, InstanceId, TopicName};
use storymaker_world::{GameConfig, ServerConfig};
use tokio::time::timeout;

const WAIT: Duration = Duration::from_secs(5);

async fn start() -> (Arc<AppState>, RunningServer) {
    let state = Arc::new(AppState::new(
        Arc::new(objects::registry().unwrap()),
        GameConfig::default(),
    ));
    let config = ServerConfig {
        host: "127.0.0.1".to_owned(),
        port: 0,
    };
    let server = spawn_server(&config, Arc::clone(&state)).await.unwrap();
    (state, server)
}

async fn next(topics: &mut TopicStream) -> Envelope {
    timeout(WAIT, topics.next()).await.unwrap().unwrap()
}

/// Read pushes into the view until a `message` push arrives.
async fn until_message(topics: &mut TopicStream, view: &mut GameView) -> Vec<String> {
    let mut kinds = Vec::new();
    loop {
        let envelope = next(topics).await;
        view.apply(&envelope).unwrap();
        kinds.push(envelope.kind.clone());
        if envelope.kind == TopicName::Message.as_str() {
            return kinds;
        }
    }
}

fn entry_number(view: &GameView, id: &str, target: &str) -> usize {
    let index = view
        .actions
        .iter()
        .position(|entry| {
            entry.id.as_str() == id && entry.target.as_ref().map(InstanceId::as_str) == Some(target)
        })
        .unwrap();
    index.checked_add(1).unwrap()
}

#[tokio::test]
async fn ready_replays_every_topic_once() {
    let (state, server) = start().await;
    let client = GameClient::connect(&format!("ws://{}/ws", server.addr))
        .await
        .unwrap();
    let mut topics = client.topics();
    let mut view = GameView::default();

    client.start("Ada", 7).await.unwrap();
    client.ready().await.unwrap();

    let kinds = until_message(&mut topics, &mut view).await;
    let expected: Vec<&str> = TopicName::ALL.into_iter().map(TopicName::as_str).collect();
    assert_eq!(kinds, expected);
    assert_eq!(view.profile.as_ref().map(|p| p.seed), Some(7));
    assert!(!view.messages.is_empty());
    assert_eq!(state.session_count().await, 1);

    client.close().await.unwrap();
    server.shutdown().await;
}

#[tokio::test]
async fn actions_round_trip_and_resume() {
    let (_state, server) = start().await;
    let url = format!("ws://{}/", server.addr);

    let client = GameClient::connect(&url).await.unwrap();
    let mut topics = client.topics();
    let mut view = GameView::default();
    client.start("Ada", 7).await.unwrap();
    client.ready().await.unwrap();
    until_message(&mut topics, &mut view).await;

    let open = view.command_for(entry_number(&view, "open", "door_front")).unwrap();
    client.send(&open).await.unwrap();
    let kinds = until_message(&mut topics, &mut view).await;
    assert!(kinds.iter().any(|k| k == "actions"));
    assert!(kinds.iter().any(|k| k == "time"));
    let close = view.actions.get(entry_number(&view, "close", "door_front").checked_sub(1).unwrap());
    assert!(close.unwrap().available);
    client.close().await.unwrap();

    // A new connection with the same name and seed resumes the open door.
    let again = GameClient::connect(&url).await.unwrap();
    let mut topics = again.topics();
    let mut resumed = GameView::default();
    again.start("Ada", 7).await.unwrap();
    again.ready().await.unwrap();
    until_message(&mut topics, &mut resumed).await;

    assert_eq!(resumed.actions, view.actions);
    assert_eq!(resumed.time, view.time);
    assert_eq!(resumed.messages, view.messages);

    again.close().await.unwrap();
    server.shutdown().await;
}

#[tokio::test]
async fn commands_before_start_are_ignored() {
    let (_state, server) = start().await;
    let client = GameClient::connect(&format!("ws://{}/ws", server.addr))
        .await
        .unwrap();
    let mut topics = client.topics();

    client.ready().await.unwrap();
    client.cancel().await.unwrap();
    assert!(timeout(Duration::from_millis(200), topics.next()).await.is_err());

    client.start("Grace", 1).await.unwrap();
    client.ready().await.unwrap();
    assert_eq!(next(&mut topics).await.kind, "profile");

    client.close().await.unwrap();
    server.shutdown().await;
}
