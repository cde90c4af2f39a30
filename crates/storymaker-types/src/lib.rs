//! Shared type definitions for the StoryMaker engine.
//!
//! This crate is the single source of truth for the identifiers, display
//! text, and wire payloads shared by the server, the world model, and the
//! thin client. Types flow downstream to `TypeScript` via `ts-rs` for the
//! browser prototype.
//!
//! # Modules
//!
//! - [`ids`] -- Actor UUIDs and stable string keys for types, instances, actions
//! - [`text`] -- Two-locale display text ([`LocalizedText`], [`QuantityName`])
//! - [`protocol`] -- Wire envelope, topic names, client commands, item verbs
//! - [`topics`] -- Payloads of the server-pushed topics

pub mod ids;
pub mod protocol;
pub mod text;
pub mod topics;

// Re-export all public types at crate root for convenience.
pub use ids::{ActionId, ActorId, EntityTypeId, InstanceId};
pub use protocol::{
    ActionCommand, Command, CommandKind, Envelope, ItemVerb, StartCommand, TopicName,
};
pub use text::{LocalizedText, QuantityName};
pub use topics::{
    ActionContext, ActionEntry, GameTime, InventoryItem, NarrativeMessage, Position, Profile,
    SelectionStep, Wallet,
};
