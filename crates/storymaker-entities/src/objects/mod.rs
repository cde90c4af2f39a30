//! The built-in object catalog.
//!
//! Every kind of object a StoryMaker world can contain, grouped by family.
//! [`registry`] registers all of them, in catalog order.

pub mod door;
pub mod energy;
pub mod locks;
pub mod medical;
pub mod resources;
pub mod verbs;

use crate::error::RegistryError;
use crate::registry::EntityRegistry;

/// Currency every sale pays out in.
pub const CURRENCY: &str = "coin";

/// Build the registry holding the whole catalog.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateType`] if two kinds share an identifier.
pub fn registry() -> Result<EntityRegistry, RegistryError> {
    EntityRegistry::builder()
        .register::<door::Door>()?
        .register::<locks::Key>()?
        .register::<locks::ClassicLock>()?
        .register::<locks::Card>()?
        .register::<locks::Reader>()?
        .register::<locks::Keypad>()?
        .register::<energy::Battery>()?
        .register::<energy::Generator>()?
        .register::<energy::SolarPanel>()?
        .register::<resources::Gasoline>()?
        .register::<resources::Stone>()?
        .register::<resources::Wood>()?
        .register::<resources::Water>()?
        .register::<medical::Bandage>()?
        .build()
}
