//! Connection lifecycle against a scripted `WebSocket` peer.
//!
//! The peer answers the first command with one push and then hangs up, so
//! the tests can observe how the client reports a lost connection.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use storymaker_channel::codec;
use storymaker_client::{ClientError, ConnectionState, GameClient};
use storymaker_types::{Envelope, TopicName};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;

const WAIT: Duration = Duration::from_secs(5);

/// Accept one client, push `health` after its first command, then close.
async fn hang_up_after_one_push() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _peer) = listener.accept().await.unwrap();
        let mut socket = accept_async(stream).await.unwrap();
        let _first = socket.next().await;
        let push = Envelope::new(TopicName::Health.as_str(), serde_json::json!(90));
        socket
            .send(Message::Text(codec::encode(&push).unwrap()))
            .await
            .unwrap();
        socket.close(None).await.unwrap();
        while socket.next().await.is_some() {}
    });
    format!("ws://{addr}")
}

#[tokio::test]
async fn lost_connection_is_reported_and_refuses_commands() {
    let url = hang_up_after_one_push().await;
    let client = GameClient::connect(&url).await.unwrap();
    let mut topics = client.topics();
    assert_eq!(client.state(), ConnectionState::Connected);

    client.ready().await.unwrap();
    let push = timeout(WAIT, topics.next()).await.unwrap().unwrap();
    assert_eq!(push.kind, "health");
    assert_eq!(push.data, serde_json::json!(90));

    timeout(WAIT, client.closed()).await.unwrap();
    assert_eq!(client.state(), ConnectionState::Closed);
    assert!(matches!(client.ready().await, Err(ClientError::Closed)));
}

#[tokio::test]
async fn closed_resolves_at_once_on_a_closed_client() {
    let url = hang_up_after_one_push().await;
    let client = GameClient::connect(&url).await.unwrap();
    client.start("Ada", 7).await.unwrap();
    timeout(WAIT, client.closed()).await.unwrap();

    // Waiting again does not block once the state is settled.
    timeout(WAIT, client.closed()).await.unwrap();
    assert!(matches!(client.cancel().await, Err(ClientError::Closed)));
}
