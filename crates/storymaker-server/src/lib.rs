//! Game server for the StoryMaker engine.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **`WebSocket` endpoint** (`/` and `/ws`) carrying the topic/command
//!   protocol, one session per connection
//! - **Health endpoint** (`/health`) reporting the live session count
//!
//! # Architecture
//!
//! Sessions live in [`AppState`], keyed by player name, so a reconnecting
//! client resumes its game and receives a full snapshot on `ready`. Each
//! connection publishes its session's pushes on its own channel bus, whose
//! listeners feed the socket writer.

pub mod handlers;
pub mod router;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{ServerError, serve, start_server};
pub use startup::{RunningServer, StartupError, spawn_server};
pub use state::AppState;
