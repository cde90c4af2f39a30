//! World state and session logic for the StoryMaker engine.
//!
//! A session owns one actor's seeded world: the instance table and where
//! each instance lies, the actor's vitals and wallet, the game clock, and the
//! map. It turns client commands into state changes and topic pushes,
//! including the multi-step selection of item verbs.
//!
//! # Modules
//!
//! - [`actor`] -- Vitals, wallet, and position of the acting player
//! - [`clock`] -- In-game clock starting on day 1 at 08:00
//! - [`config`] -- Configuration loading from `storymaker-config.yaml`
//! - [`error`] -- Data-integrity errors of the world layer
//! - [`map`] -- Seeded terrain grid
//! - [`populate`] -- Initial world content
//! - [`scene`] -- Menus and affordances from the actor's point of view
//! - [`session`] -- [`Session`], the per-actor command state machine
//! - [`store`] -- Instance table with placements and the actor capability view
//!
//! [`Session`]: session::Session

pub mod actor;
pub mod clock;
pub mod config;
pub mod error;
pub mod map;
pub mod populate;
pub mod scene;
pub mod session;
pub mod store;

pub use config::{ConfigError, GameConfig, MapConfig, ServerConfig, SessionConfig};
pub use error::WorldError;
pub use session::{Pending, Session};
