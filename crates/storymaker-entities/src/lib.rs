//! Entity model and action resolution for the StoryMaker engine.
//!
//! Every object in a world is an instance of a registered entity type. A type
//! supplies default options, a display name, and an ordered table of actions,
//! each a pure condition paired with an execute step. The [`ActionEngine`]
//! lists menus for an actor and performs actions transactionally.
//!
//! # Modules
//!
//! - [`capability`] -- [`CapabilityView`], the read-only actor queries conditions use
//! - [`definition`] -- [`EntityKind`] and its type-erased registry form
//! - [`effect`] -- World-level consequences returned by execute steps
//! - [`engine`] -- Menu listing and transactional perform
//! - [`error`] -- Registry and entity error types
//! - [`instance`] -- Live instances with options and soft references
//! - [`objects`] -- The built-in object catalog
//! - [`registry`] -- The closed type registry

pub mod capability;
pub mod definition;
pub mod effect;
pub mod engine;
pub mod error;
pub mod instance;
pub mod objects;
pub mod registry;

pub use capability::{CapabilityView, Possessions};
pub use definition::{
    ActionDecl, ActionInput, ActionOption, ActionSpec, Definition, EntityDefinition, EntityKind,
    Performed, TargetMode, TargetRef,
};
pub use effect::Effect;
pub use engine::ActionEngine;
pub use error::{EntityError, RegistryError};
pub use instance::EntityInstance;
pub use registry::{EntityRegistry, RegistryBuilder};
