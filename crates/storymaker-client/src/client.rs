//! `WebSocket` connection to the game server.
//!
//! [`GameClient`] owns the write half of the socket and a background task
//! reading the other half. Every decoded topic push is published on the
//! client's [`ChannelBus`]; UI code binds to topics with
//! [`GameClient::subscribe`] or drains them in arrival order with
//! [`GameClient::topics`].
//!
//! When the server closes the connection or the socket fails, the state
//! switches to [`ConnectionState::Closed`] and every later send fails with
//! [`ClientError::Closed`]. Commands are never queued for a later
//! connection.

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use storymaker_channel::{ChannelBus, Subscription, codec};
use storymaker_types::{ActionCommand, Command, Envelope, StartCommand, TopicName};
use tokio::net::TcpStream;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use crate::error::ClientError;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Whether the connection can still carry commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// The socket is open.
    Connected,
    /// The server closed the socket or it failed.
    Closed,
}

/// Client half of one game connection.
pub struct GameClient {
    sink: Mutex<SplitSink<WsStream, Message>>,
    bus: ChannelBus<TopicName, Envelope>,
    state: watch::Receiver<ConnectionState>,
    reader: JoinHandle<()>,
}

impl GameClient {
    /// Open a connection to a game server, e.g. `ws://127.0.0.1:8000/ws`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the handshake fails.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        let (socket, _response) = connect_async(url)
            .await
            .map_err(|e| ClientError::Transport(format!("connect to {url} failed: {e}")))?;
        info!(%url, "connected to game server");

        let (sink, stream) = socket.split();
        let bus = ChannelBus::new();
        let (state_tx, state) = watch::channel(ConnectionState::Connected);
        let reader = tokio::spawn(read_frames(stream, bus.clone(), state_tx));

        Ok(Self {
            sink: Mutex::new(sink),
            bus,
            state,
            reader,
        })
    }

    /// Register a listener for one topic. Dropping the guard unregisters it.
    pub fn subscribe(
        &self,
        topic: TopicName,
        listener: impl Fn(&Envelope) + Send + Sync + 'static,
    ) -> Subscription<TopicName, Envelope> {
        self.bus.subscribe(topic, listener)
    }

    /// Receive every topic push from now on, in arrival order.
    pub fn topics(&self) -> TopicStream {
        let (outbound, pushes) = mpsc::unbounded_channel();
        let subscriptions = TopicName::ALL
            .into_iter()
            .map(|topic| {
                let outbound = outbound.clone();
                self.bus.subscribe(topic, move |envelope: &Envelope| {
                    // The stream may have been dropped by its owner.
                    let _sent = outbound.send(envelope.clone());
                })
            })
            .collect();
        TopicStream {
            _subscriptions: subscriptions,
            pushes,
        }
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Wait until the connection is closed.
    pub async fn closed(&self) {
        let mut state = self.state.clone();
        if state
            .wait_for(|s| *s == ConnectionState::Closed)
            .await
            .is_err()
        {
            debug!("connection reader ended without reporting");
        }
    }

    /// Send one command.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] once the connection is gone, or
    /// [`ClientError::Transport`] if the write fails for another reason.
    pub async fn send(&self, command: &Command) -> Result<(), ClientError> {
        if self.state() == ConnectionState::Closed {
            return Err(ClientError::Closed);
        }
        let frame = codec::encode(&codec::command_envelope(command)?)?;
        debug!(command = command.kind().as_str(), "sending command");
        self.sink
            .lock()
            .await
            .send(Message::Text(frame))
            .await
            .map_err(|e| match e {
                tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                    ClientError::Closed
                }
                other => ClientError::Transport(other.to_string()),
            })
    }

    /// Bootstrap or resume the session of `name`.
    pub async fn start(&self, name: &str, seed: u64) -> Result<(), ClientError> {
        self.send(&Command::Start(StartCommand {
            name: name.to_owned(),
            seed,
        }))
        .await
    }

    /// Request a full snapshot of every topic.
    pub async fn ready(&self) -> Result<(), ClientError> {
        self.send(&Command::Ready).await
    }

    /// Perform an offered menu entry.
    pub async fn action(&self, action: ActionCommand) -> Result<(), ClientError> {
        self.send(&Command::Action(action)).await
    }

    /// Abandon a pending multi-step command.
    pub async fn cancel(&self) -> Result<(), ClientError> {
        self.send(&Command::Cancel).await
    }

    /// Close the connection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the close frame cannot be sent.
    pub async fn close(&self) -> Result<(), ClientError> {
        let result = self.sink.lock().await.close().await;
        self.reader.abort();
        match result {
            Ok(()) | Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                Ok(())
            }
            Err(e) => Err(ClientError::Transport(e.to_string())),
        }
    }
}

impl Drop for GameClient {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

impl core::fmt::Debug for GameClient {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("GameClient")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Topic pushes in arrival order, from [`GameClient::topics`].
#[derive(Debug)]
pub struct TopicStream {
    _subscriptions: Vec<Subscription<TopicName, Envelope>>,
    pushes: mpsc::UnboundedReceiver<Envelope>,
}

impl TopicStream {
    /// The next push.
    pub async fn next(&mut self) -> Option<Envelope> {
        self.pushes.recv().await
    }
}

async fn read_frames(
    mut stream: SplitStream<WsStream>,
    bus: ChannelBus<TopicName, Envelope>,
    state: watch::Sender<ConnectionState>,
) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => dispatch(&bus, &text),
            Ok(Message::Close(_)) => {
                info!("game server closed the connection");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "connection to game server failed");
                break;
            }
        }
    }
    state.send_replace(ConnectionState::Closed);
}

fn dispatch(bus: &ChannelBus<TopicName, Envelope>, frame: &str) {
    match codec::decode_envelope(frame) {
        Ok(envelope) => match codec::topic_of(&envelope) {
            Some(topic) => {
                bus.publish(&topic, &envelope);
            }
            None => debug!(kind = %envelope.kind, "ignoring unknown topic"),
        },
        Err(e) => warn!(error = %e, "undecodable frame"),
    }
}
