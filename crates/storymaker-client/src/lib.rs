//! Thin client for the StoryMaker engine.
//!
//! The client renders whatever the server pushes and forwards the actor's
//! choices back; it holds no game rules. Menu entries are echoed back
//! exactly as offered, and the server decides what a valid step is.
//!
//! # Modules
//!
//! - [`client`] -- `WebSocket` connection, topic listeners, command sending
//! - [`view`] -- Typed local mirror of the pushed topics
//! - [`error`] -- Client errors

pub mod client;
pub mod error;
pub mod view;

pub use client::{ConnectionState, GameClient, TopicStream};
pub use error::ClientError;
pub use view::{GameView, Locale};
