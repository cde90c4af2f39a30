//! The world store: live instances and where they are.
//!
//! The store owns instance lifecycle. Instances are created when the world
//! is populated, mutated through the action engine, and moved or removed
//! only by applying the effects an action returned.

use std::collections::BTreeMap;

use storymaker_entities::{CapabilityView, EntityError, EntityInstance, EntityRegistry};
use storymaker_types::{ActorId, InstanceId, Position};
use tracing::error;

use crate::error::WorldError;

/// Where an instance currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// In the actor's inventory.
    Carried,
    /// Lying on a map cell.
    Ground(Position),
    /// Handed over to another instance (a battery in a reader).
    Held(InstanceId),
}

/// Mutable instance table of one session.
#[derive(Debug, Clone, Default)]
pub struct WorldStore {
    instances: BTreeMap<InstanceId, EntityInstance>,
    placements: BTreeMap<InstanceId, Placement>,
}

impl WorldStore {
    /// An empty world.
    pub const fn new() -> Self {
        Self {
            instances: BTreeMap::new(),
            placements: BTreeMap::new(),
        }
    }

    /// Add an instance.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateInstance`] if the id is taken.
    pub fn insert(&mut self, instance: EntityInstance, placement: Placement) -> Result<(), WorldError> {
        if self.instances.contains_key(&instance.id) {
            return Err(WorldError::DuplicateInstance(instance.id));
        }
        self.placements.insert(instance.id.clone(), placement);
        self.instances.insert(instance.id.clone(), instance);
        Ok(())
    }

    /// Look up an instance.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownInstance`] if the id does not resolve.
    pub fn get(&self, id: &InstanceId) -> Result<&EntityInstance, WorldError> {
        self.instances
            .get(id)
            .ok_or_else(|| WorldError::UnknownInstance(id.clone()))
    }

    /// Whether the id resolves.
    pub fn contains(&self, id: &InstanceId) -> bool {
        self.instances.contains_key(id)
    }

    /// Replace an existing instance with an updated copy.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownInstance`] if no instance has that id.
    pub fn commit(&mut self, instance: EntityInstance) -> Result<(), WorldError> {
        match self.instances.get_mut(&instance.id) {
            Some(slot) => {
                *slot = instance;
                Ok(())
            }
            None => Err(WorldError::UnknownInstance(instance.id)),
        }
    }

    /// Where an instance is.
    pub fn placement(&self, id: &InstanceId) -> Option<&Placement> {
        self.placements.get(id)
    }

    /// Move an instance.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownInstance`] if no instance has that id.
    pub fn place(&mut self, id: &InstanceId, placement: Placement) -> Result<(), WorldError> {
        match self.placements.get_mut(id) {
            Some(slot) => {
                *slot = placement;
                Ok(())
            }
            None => Err(WorldError::UnknownInstance(id.clone())),
        }
    }

    /// Remove an instance from the world.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownInstance`] if no instance has that id.
    pub fn remove(&mut self, id: &InstanceId) -> Result<EntityInstance, WorldError> {
        self.placements.remove(id);
        self.instances
            .remove(id)
            .ok_or_else(|| WorldError::UnknownInstance(id.clone()))
    }

    /// Carried instances, in id order.
    pub fn carried(&self) -> impl Iterator<Item = &EntityInstance> {
        self.with_placement(|placement| *placement == Placement::Carried)
    }

    /// Instances lying on a cell, in id order.
    pub fn on_ground(&self, position: Position) -> impl Iterator<Item = &EntityInstance> {
        self.with_placement(move |placement| *placement == Placement::Ground(position))
    }

    /// Instances the actor can act on from `position`: the cell's ground
    /// instances first, then carried ones.
    pub fn within_reach(&self, position: Position) -> Vec<&EntityInstance> {
        self.on_ground(position).chain(self.carried()).collect()
    }

    fn with_placement(
        &self,
        keep: impl Fn(&Placement) -> bool,
    ) -> impl Iterator<Item = &EntityInstance> {
        self.instances.iter().filter_map(move |(id, instance)| {
            self.placements
                .get(id)
                .is_some_and(|placement| keep(placement))
                .then_some(instance)
        })
    }

    /// Check that every link and option reference resolves in this world.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::DanglingReference`] for the first reference
    /// that does not resolve, or any decoding error of the instance options.
    pub fn check_references(&self, registry: &EntityRegistry) -> Result<(), WorldError> {
        for instance in self.instances.values() {
            for reference in instance.references(registry)? {
                if !self.contains(&reference) {
                    error!(instance = %instance.id, reference = %reference, "dangling entity reference");
                    return Err(EntityError::DanglingReference {
                        instance: instance.id.clone(),
                        reference,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Number of live instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the world holds no instance.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

/// The actor's possessions as seen by action conditions.
///
/// Backed by the store: the actor has an object while it is carried.
#[derive(Debug, Clone, Copy)]
pub struct ActorView<'a> {
    actor: ActorId,
    store: &'a WorldStore,
}

impl<'a> ActorView<'a> {
    /// View of `actor` over `store`.
    pub const fn new(actor: ActorId, store: &'a WorldStore) -> Self {
        Self { actor, store }
    }
}

impl CapabilityView for ActorView<'_> {
    fn id(&self) -> ActorId {
        self.actor
    }

    fn has(&self, object: &InstanceId) -> bool {
        self.store.placement(object) == Some(&Placement::Carried)
    }
}
