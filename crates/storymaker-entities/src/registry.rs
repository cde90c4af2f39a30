//! The closed registry of entity types.
//!
//! Built once at startup by registering every known [`EntityKind`]; never
//! mutated afterwards. Registering the same identifier twice is a fatal
//! configuration error. Looking up an unregistered identifier at runtime is
//! a data-integrity failure and is reported, never defaulted.

use std::collections::BTreeMap;

use storymaker_types::EntityTypeId;

use crate::definition::{Definition, EntityDefinition, EntityKind};
use crate::error::{EntityError, RegistryError};

/// Immutable mapping from type identifier to definition.
pub struct EntityRegistry {
    definitions: BTreeMap<EntityTypeId, Box<dyn EntityDefinition>>,
    order: Vec<EntityTypeId>,
}

impl core::fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("types", &self.order)
            .finish()
    }
}

impl EntityRegistry {
    /// Start building a registry.
    pub const fn builder() -> RegistryBuilder {
        RegistryBuilder {
            definitions: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    /// Look up a definition.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnknownType`] if nothing is registered under `type_id`.
    pub fn get(&self, type_id: &EntityTypeId) -> Result<&dyn EntityDefinition, EntityError> {
        self.definitions
            .get(type_id)
            .map(|definition| &**definition)
            .ok_or_else(|| EntityError::UnknownType(type_id.clone()))
    }

    /// Whether a type is registered.
    pub fn contains(&self, type_id: &EntityTypeId) -> bool {
        self.definitions.contains_key(type_id)
    }

    /// Registered type identifiers, in registration order.
    pub fn type_ids(&self) -> &[EntityTypeId] {
        &self.order
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the registry has no types (never true for a built registry).
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Collects entity types before freezing them into an [`EntityRegistry`].
pub struct RegistryBuilder {
    definitions: BTreeMap<EntityTypeId, Box<dyn EntityDefinition>>,
    order: Vec<EntityTypeId>,
}

impl RegistryBuilder {
    /// Register entity kind `K`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateType`] if `K::TYPE_ID` is taken.
    pub fn register<K: EntityKind>(self) -> Result<Self, RegistryError> {
        self.register_definition(Box::new(Definition::<K>::new()))
    }

    /// Register an already type-erased definition.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateType`] if its identifier is taken.
    pub fn register_definition(
        mut self,
        definition: Box<dyn EntityDefinition>,
    ) -> Result<Self, RegistryError> {
        let type_id = definition.type_id();
        if self.definitions.contains_key(&type_id) {
            return Err(RegistryError::DuplicateType(type_id));
        }
        self.order.push(type_id.clone());
        self.definitions.insert(type_id, definition);
        Ok(self)
    }

    /// Freeze the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Empty`] if no type was registered.
    pub fn build(self) -> Result<EntityRegistry, RegistryError> {
        if self.order.is_empty() {
            return Err(RegistryError::Empty);
        }
        tracing::debug!(types = self.order.len(), "entity registry built");
        Ok(EntityRegistry {
            definitions: self.definitions,
            order: self.order,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::door::Door;
    use crate::objects::resources::Stone;

    #[test]
    fn duplicate_registration_is_rejected() {
        let result = EntityRegistry::builder()
            .register::<Door>()
            .and_then(RegistryBuilder::register::<Door>);
        assert!(matches!(result, Err(RegistryError::DuplicateType(id)) if id.as_str() == "house_door"));
    }

    #[test]
    fn empty_registry_is_rejected() {
        assert!(matches!(EntityRegistry::builder().build(), Err(RegistryError::Empty)));
    }

    #[test]
    fn lookup_of_unknown_type_fails() {
        let registry = EntityRegistry::builder()
            .register::<Stone>()
            .and_then(RegistryBuilder::build);
        assert!(registry.is_ok());
        let Ok(registry) = registry else {
            return;
        };
        let missing = EntityTypeId::from("dragon");
        assert!(matches!(registry.get(&missing), Err(EntityError::UnknownType(_))));
        assert!(registry.contains(&EntityTypeId::from("resources_stone")));
        assert_eq!(registry.len(), 1);
    }
}
