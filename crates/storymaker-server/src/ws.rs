//! `WebSocket` handler for game connections.
//!
//! Each connection drives one session. Inbound text frames are decoded
//! into commands; the session's topic pushes are published on a
//! per-connection [`ChannelBus`] whose listeners forward them to the socket
//! writer, one frame per push, in publish order.
//!
//! Unknown message types are ignored. Commands before `start` are ignored
//! with a debug log, since there is no session to address yet.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use storymaker_channel::{ChannelBus, Subscription, codec};
use storymaker_types::{Command, Envelope, TopicName};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::state::{AppState, SharedSession};

/// Upgrade an HTTP request to a game connection.
///
/// # Route
///
/// `GET /` and `GET /ws`
pub async fn ws_game(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_ws(socket, state))
}

/// Server half of one connection.
struct Connection {
    state: Arc<AppState>,
    session: Option<SharedSession>,
    bus: ChannelBus<TopicName, Envelope>,
}

impl Connection {
    async fn receive(&mut self, frame: &str) {
        let command = match codec::decode_command(frame) {
            Ok(Some(command)) => command,
            Ok(None) => {
                debug!("ignoring frame of unknown type");
                return;
            }
            Err(e) => {
                warn!(error = %e, "undecodable frame");
                return;
            }
        };

        if let Command::Start(start) = command {
            match self.state.open_session(start).await {
                Ok(session) => self.session = Some(session),
                Err(e) => error!(error = %e, "failed to open session"),
            }
            return;
        }

        let Some(session) = &self.session else {
            debug!(command = command.kind().as_str(), "command before start");
            return;
        };
        let pushes = session.lock().await.handle(&command);
        match pushes {
            Ok(pushes) => {
                for envelope in pushes {
                    if let Some(topic) = codec::topic_of(&envelope) {
                        self.bus.publish(&topic, &envelope);
                    }
                }
            }
            Err(e) => error!(command = command.kind().as_str(), error = %e, "command failed"),
        }
    }
}

/// Bind every topic of the bus to the outbound queue.
fn forward_topics(
    bus: &ChannelBus<TopicName, Envelope>,
    outbound: &mpsc::UnboundedSender<Envelope>,
) -> Vec<Subscription<TopicName, Envelope>> {
    TopicName::ALL
        .into_iter()
        .map(|topic| {
            let outbound = outbound.clone();
            bus.subscribe(topic, move |envelope: &Envelope| {
                // The receiver only closes once the connection is gone.
                let _sent = outbound.send(envelope.clone());
            })
        })
        .collect()
}

/// Handle the `WebSocket` lifecycle: decode commands, forward pushes.
async fn handle_ws(socket: WebSocket, state: Arc<AppState>) {
    info!("game client connected");

    let (mut sink, mut stream) = socket.split();
    let (outbound, mut pushes) = mpsc::unbounded_channel::<Envelope>();
    let bus = ChannelBus::new();
    let _subscriptions = forward_topics(&bus, &outbound);
    let mut connection = Connection {
        state,
        session: None,
        bus,
    };

    loop {
        tokio::select! {
            // Forward a topic push to the client.
            Some(envelope) = pushes.recv() => {
                let json = match codec::encode(&envelope) {
                    Ok(j) => j,
                    Err(e) => {
                        warn!("Failed to encode topic push: {e}");
                        continue;
                    }
                };
                if sink.send(Message::Text(json.into())).await.is_err() {
                    debug!("game client disconnected (send failed)");
                    break;
                }
            }
            // Handle a frame from the client.
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => connection.receive(text.as_str()).await,
                    Some(Ok(Message::Close(_))) | None => {
                        debug!("game client closed the connection");
                        break;
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sink.send(Message::Pong(data)).await.is_err() {
                            debug!("game client disconnected (pong failed)");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        debug!("WebSocket error: {e}");
                        break;
                    }
                    _ => {
                        // Binary and pong frames carry nothing for us.
                    }
                }
            }
        }
    }

    info!("game client disconnected");
}
