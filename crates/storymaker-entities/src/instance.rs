//! Live entity instances.
//!
//! An instance is one concrete object in a world: its type, its owner, its
//! options record, and soft references to other instances. References are
//! ids, never handles, so a door and its key can point at each other without
//! an ownership cycle; they are resolved through the world's instance table
//! at read time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use storymaker_types::{ActorId, EntityTypeId, InstanceId};

use crate::error::EntityError;
use crate::registry::EntityRegistry;

/// State of one entity instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityInstance {
    /// Instance identifier, unique within a world.
    pub id: InstanceId,
    /// Registered type of the instance.
    pub type_id: EntityTypeId,
    /// The actor the instance belongs to (authorization anchor).
    pub owner: ActorId,
    /// Complete options record for the type (`null` for stateless types).
    pub options: serde_json::Value,
    /// Named soft references to other instances.
    #[serde(default)]
    pub links: BTreeMap<String, InstanceId>,
}

impl EntityInstance {
    /// Create an instance seeded from its type's defaults plus `overrides`.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnknownType`] if the type is not registered, or
    /// [`EntityError::InvalidOverrides`] if the overrides do not fit the type.
    pub fn spawn(
        registry: &EntityRegistry,
        id: impl Into<InstanceId>,
        type_id: impl Into<EntityTypeId>,
        owner: ActorId,
        overrides: &serde_json::Value,
    ) -> Result<Self, EntityError> {
        let type_id = type_id.into();
        let options = registry.get(&type_id)?.init(overrides)?;
        Ok(Self {
            id: id.into(),
            type_id,
            owner,
            options,
            links: BTreeMap::new(),
        })
    }

    /// Add a named soft reference.
    #[must_use]
    pub fn with_link(mut self, name: impl Into<String>, target: impl Into<InstanceId>) -> Self {
        self.links.insert(name.into(), target.into());
        self
    }

    /// Every entity id this instance refers to, from links and option fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the type is unknown or the options are corrupt.
    pub fn references(&self, registry: &EntityRegistry) -> Result<Vec<InstanceId>, EntityError> {
        let mut references: Vec<InstanceId> = self.links.values().cloned().collect();
        references.extend(registry.get(&self.type_id)?.references(&self.id, &self.options)?);
        Ok(references)
    }
}
