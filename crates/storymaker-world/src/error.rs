//! Error types for the storymaker-world crate.
//!
//! Every variant here is a data-integrity failure: it aborts the current
//! command and leaves the world as it was before the command. Blocked and
//! unknown actions never reach this type; the session turns them into
//! narrative messages.

use storymaker_entities::EntityError;
use storymaker_types::InstanceId;

/// Errors raised by the world store and sessions.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// Entity resolution failed below the session.
    #[error(transparent)]
    Entity(#[from] EntityError),

    /// An instance id does not resolve in the world.
    #[error("unknown instance: {0}")]
    UnknownInstance(InstanceId),

    /// Two instances were created under the same id.
    #[error("duplicate instance: {0}")]
    DuplicateInstance(InstanceId),

    /// The game clock counter overflowed.
    #[error("game clock overflow")]
    ClockOverflow,

    /// The map cannot be generated with the given dimensions.
    #[error("invalid map: {reason}")]
    InvalidMap {
        /// What is wrong with the dimensions.
        reason: String,
    },

    /// A topic payload failed to serialize.
    #[error("failed to encode topic payload: {0}")]
    Encode(#[from] serde_json::Error),
}
