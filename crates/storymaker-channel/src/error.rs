//! Error types for the storymaker-channel crate.

use storymaker_types::CommandKind;

/// Errors raised while decoding or encoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The frame is not a JSON object with a string `type`.
    #[error("malformed envelope: {0}")]
    Malformed(String),

    /// A known command carried a payload of the wrong shape.
    #[error("invalid {kind:?} payload: {source}")]
    InvalidPayload {
        /// The command whose payload failed to decode.
        kind: CommandKind,
        /// Decoder error.
        source: serde_json::Error,
    },

    /// A message failed to serialize.
    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}
