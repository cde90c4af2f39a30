//! Declarative effects produced by an action's execute step.
//!
//! Execute mutates only the instance's own options. Anything that touches
//! the actor or the world (healing, money, moving the item) is returned as
//! an [`Effect`] and applied by the world store, which owns the lifecycle
//! of instances.

use rust_decimal::Decimal;
use storymaker_types::{InstanceId, LocalizedText};

/// A world-level consequence of a performed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a narrative message for the actor.
    Narrate {
        /// Short heading.
        title: LocalizedText,
        /// Body text.
        content: LocalizedText,
    },
    /// Restore actor health by the given points.
    Heal(u32),
    /// Restore actor energy by the given points.
    RestoreEnergy(u32),
    /// Credit the actor's wallet.
    Earn {
        /// Currency name.
        currency: String,
        /// Amount credited.
        amount: Decimal,
    },
    /// Put the acted-on item on the ground at the actor's position.
    Drop,
    /// Hand the acted-on item over to another instance.
    TransferTo(InstanceId),
    /// Remove the acted-on item from the world.
    Consume,
}

impl Effect {
    /// Shorthand for a narrative effect.
    pub const fn narrate(title: LocalizedText, content: LocalizedText) -> Self {
        Self::Narrate { title, content }
    }
}
