//! Error types for the game client.

use storymaker_channel::CodecError;

/// Errors from the client side of a game connection.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The `WebSocket` handshake or a frame write failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The connection is closed; nothing more can be sent.
    #[error("connection to the game server is closed")]
    Closed,

    /// A frame could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// A topic payload did not have the expected shape.
    #[error("invalid `{topic}` payload: {source}")]
    Payload {
        /// Topic whose payload was rejected.
        topic: String,
        /// Underlying deserialization error.
        source: serde_json::Error,
    },
}
