//! Channel bus and wire codec for the StoryMaker protocol.
//!
//! Both ends of a connection multiplex one duplex stream into named
//! channels. The server pushes topic snapshots and receives commands; the
//! client does the reverse. [`ChannelBus`] routes decoded messages to the
//! listeners registered for their type, and [`codec`] converts between text
//! frames and typed messages.
//!
//! # Modules
//!
//! - [`bus`] -- Topic-keyed listeners with drop-to-unregister guards
//! - [`codec`] -- Envelope framing, lenient command decoding
//! - [`error`] -- Codec errors

pub mod bus;
pub mod codec;
pub mod error;

pub use bus::{ChannelBus, Subscription};
pub use codec::{command_envelope, decode_command, decode_envelope, encode, topic_of};
pub use error::CodecError;
