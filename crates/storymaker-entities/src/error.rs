//! Error types for the storymaker-entities crate.
//!
//! Registry construction failures are configuration errors and fatal at
//! startup. Entity errors split into recoverable, user-facing outcomes
//! ([`EntityError::UnknownAction`], [`EntityError::ActionBlocked`]) and
//! data-integrity failures that abort the current operation without touching
//! world state.

use storymaker_types::{ActionId, EntityTypeId, InstanceId, LocalizedText};

/// Errors raised while building the entity registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two entity types were registered under the same identifier.
    #[error("duplicate entity type: {0}")]
    DuplicateType(EntityTypeId),

    /// The registry was built without any entity type.
    #[error("entity registry is empty")]
    Empty,
}

/// Errors raised while resolving or performing entity actions.
#[derive(Debug, thiserror::Error)]
pub enum EntityError {
    /// No entity type is registered under this identifier.
    #[error("unknown entity type: {0}")]
    UnknownType(EntityTypeId),

    /// Stored options do not decode into the type's options record.
    #[error("corrupt options on instance {instance} ({type_id}): {reason}")]
    CorruptOptions {
        /// The instance whose options failed to decode.
        instance: InstanceId,
        /// The instance's entity type.
        type_id: EntityTypeId,
        /// Decoder message.
        reason: String,
    },

    /// Caller-supplied overrides do not match the type's options shape.
    #[error("invalid overrides for {type_id}: {reason}")]
    InvalidOverrides {
        /// The entity type being initialized.
        type_id: EntityTypeId,
        /// Decoder message.
        reason: String,
    },

    /// An instance references an entity id that does not resolve.
    #[error("instance {instance} references missing entity {reference}")]
    DanglingReference {
        /// The instance holding the reference.
        instance: InstanceId,
        /// The unresolved identifier.
        reference: InstanceId,
    },

    /// The requested action is not in the instance's current menu.
    #[error("unknown action {action} on instance {instance}")]
    UnknownAction {
        /// The instance the action was requested on.
        instance: InstanceId,
        /// The requested action id.
        action: ActionId,
    },

    /// The action's condition blocked it.
    #[error("action {action} blocked: {reason}")]
    ActionBlocked {
        /// The blocked action id.
        action: ActionId,
        /// Human-readable reason from the condition.
        reason: LocalizedText,
    },

    /// The action's execute step panicked; the instance was left unchanged.
    #[error("execute of {action} on instance {instance} failed")]
    ExecuteFailed {
        /// The instance the action ran on.
        instance: InstanceId,
        /// The failing action id.
        action: ActionId,
    },
}

impl EntityError {
    /// Whether the error is a normal, user-facing outcome rather than a defect.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::UnknownAction { .. } | Self::ActionBlocked { .. })
    }
}
