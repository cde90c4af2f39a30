//! Read-only actor queries consulted by action conditions.
//!
//! The core never owns the actor's possessions. Whatever system tracks the
//! inventory implements [`CapabilityView`] and the conditions only ask
//! questions through it.

use std::collections::BTreeSet;

use storymaker_types::{ActorId, InstanceId};

/// What a condition may ask about the acting actor.
pub trait CapabilityView {
    /// The acting actor.
    fn id(&self) -> ActorId;

    /// Whether the actor currently possesses the object.
    fn has(&self, object: &InstanceId) -> bool;

    /// Whether the actor possesses at least one of the objects.
    fn has_one_of(&self, objects: &[InstanceId]) -> bool {
        objects.iter().any(|object| self.has(object))
    }
}

/// A fixed set of possessions, for seeding and tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Possessions {
    /// The actor the possessions belong to.
    pub actor: ActorId,
    /// Objects the actor holds.
    pub objects: BTreeSet<InstanceId>,
}

impl Possessions {
    /// An actor holding nothing.
    pub const fn empty(actor: ActorId) -> Self {
        Self {
            actor,
            objects: BTreeSet::new(),
        }
    }

    /// Add an object to the possessions.
    #[must_use]
    pub fn with(mut self, object: impl Into<InstanceId>) -> Self {
        self.objects.insert(object.into());
        self
    }
}

impl CapabilityView for Possessions {
    fn id(&self) -> ActorId {
        self.actor
    }

    fn has(&self, object: &InstanceId) -> bool {
        self.objects.contains(object)
    }
}
