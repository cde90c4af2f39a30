//! Action resolution: menu listing and transactional perform.
//!
//! [`ActionEngine::perform`] never trusts a previously listed menu. It
//! re-derives the action from the instance's current options, re-evaluates
//! the condition, and only then runs execute, on a copy of the options that
//! is committed back to the instance after execute returns. A blocked or
//! unknown action leaves the instance untouched.
//!
//! Callers serialize access per instance through `&mut EntityInstance`: two
//! performs on the same instance cannot interleave their check-then-execute
//! sequence.

use storymaker_types::ActionId;
use tracing::{debug, error};

use crate::capability::CapabilityView;
use crate::definition::{ActionDecl, ActionInput, ActionOption, TargetRef};
use crate::effect::Effect;
use crate::error::EntityError;
use crate::instance::EntityInstance;
use crate::registry::EntityRegistry;

/// Resolves and performs actions against the registry.
#[derive(Debug, Clone, Copy)]
pub struct ActionEngine<'r> {
    registry: &'r EntityRegistry,
}

impl<'r> ActionEngine<'r> {
    /// Create an engine over a registry.
    pub const fn new(registry: &'r EntityRegistry) -> Self {
        Self { registry }
    }

    /// Compute the action menu of an instance for an actor.
    ///
    /// Entries follow the type's declaration order. Side-effect free.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error if the type is unknown or the options
    /// are corrupt.
    pub fn list_actions(
        &self,
        instance: &EntityInstance,
        actor: &dyn CapabilityView,
        target: Option<TargetRef<'_>>,
    ) -> Result<Vec<ActionOption>, EntityError> {
        let definition = self.registry.get(&instance.type_id)?;
        let input = ActionInput {
            instance: &instance.id,
            owner: instance.owner,
            links: &instance.links,
            actor,
            target,
        };
        definition.menu(&instance.options, &input)
    }

    /// Look up the declaration of one action on an instance's type.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnknownType`] if the type is not registered.
    pub fn declaration(
        &self,
        instance: &EntityInstance,
        action: &str,
    ) -> Result<Option<ActionDecl>, EntityError> {
        let definition = self.registry.get(&instance.type_id)?;
        Ok(definition
            .declarations()
            .into_iter()
            .find(|decl| decl.id == action))
    }

    /// Perform one action on an instance.
    ///
    /// The target, if any, is passed to the action unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`EntityError::UnknownAction`] if the type declares no such
    /// action, [`EntityError::ActionBlocked`] if its condition fails, or a
    /// data-integrity error. In every error case the instance is unchanged.
    pub fn perform(
        &self,
        instance: &mut EntityInstance,
        actor: &dyn CapabilityView,
        action: &ActionId,
        target: Option<TargetRef<'_>>,
    ) -> Result<Vec<Effect>, EntityError> {
        let definition = self.registry.get(&instance.type_id)?;
        let result = {
            let input = ActionInput {
                instance: &instance.id,
                owner: instance.owner,
                links: &instance.links,
                actor,
                target,
            };
            definition.perform(&instance.options, action, &input)
        };

        match result {
            Ok(performed) => {
                debug!(
                    instance = %instance.id,
                    type_id = %instance.type_id,
                    action = %action,
                    effects = performed.effects.len(),
                    "action performed"
                );
                instance.options = performed.options;
                Ok(performed.effects)
            }
            Err(e) if e.is_recoverable() => {
                debug!(instance = %instance.id, action = %action, error = %e, "action refused");
                Err(e)
            }
            Err(e) => {
                error!(instance = %instance.id, action = %action, error = %e, "action failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeSet;

    use storymaker_types::{ActorId, EntityTypeId, InstanceId};

    use super::*;
    use crate::capability::Possessions;
    use crate::objects;

    fn registry() -> EntityRegistry {
        objects::registry().unwrap()
    }

    fn door(registry: &EntityRegistry, owner: ActorId, overrides: &serde_json::Value) -> EntityInstance {
        EntityInstance::spawn(registry, "door_front", "house_door", owner, overrides).unwrap()
    }

    fn available_ids(menu: &[ActionOption]) -> BTreeSet<String> {
        menu.iter()
            .filter(|entry| entry.available)
            .map(|entry| entry.id.to_string())
            .collect()
    }

    #[test]
    fn fresh_door_offers_open_only() {
        let registry = registry();
        let engine = ActionEngine::new(&registry);
        let actor = Possessions::empty(ActorId::new());
        let door = door(&registry, actor.actor, &serde_json::Value::Null);

        let menu = engine.list_actions(&door, &actor, None).unwrap_or_default();
        let ids: Vec<&str> = menu.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["open", "close", "lock", "unlock"]);
        assert_eq!(available_ids(&menu), BTreeSet::from(["open".to_owned()]));
        assert!(menu.iter().filter(|entry| !entry.available).all(|entry| entry.reason.is_some()));
    }

    #[test]
    fn opening_twice_is_blocked_and_leaves_state() {
        let registry = registry();
        let engine = ActionEngine::new(&registry);
        let actor = Possessions::empty(ActorId::new());
        let mut door = door(&registry, actor.actor, &serde_json::Value::Null);
        let open = ActionId::from("open");

        assert!(engine.perform(&mut door, &actor, &open, None).is_ok());
        assert_eq!(door.options.get("open"), Some(&serde_json::Value::Bool(true)));

        let before = door.clone();
        let second = engine.perform(&mut door, &actor, &open, None);
        assert!(matches!(
            second,
            Err(EntityError::ActionBlocked { ref reason, .. }) if reason.en == "This door is already open"
        ));
        assert_eq!(door, before);
    }

    #[test]
    fn unknown_action_is_reported() {
        let registry = registry();
        let engine = ActionEngine::new(&registry);
        let actor = Possessions::empty(ActorId::new());
        let mut door = door(&registry, actor.actor, &serde_json::Value::Null);
        let result = engine.perform(&mut door, &actor, &ActionId::from("paint"), None);
        assert!(matches!(result, Err(EntityError::UnknownAction { .. })));
    }

    #[test]
    fn locking_requires_a_key_in_possession() {
        let registry = registry();
        let engine = ActionEngine::new(&registry);
        let actor_id = ActorId::new();
        let without_key = Possessions::empty(actor_id);
        let mut door = door(
            &registry,
            actor_id,
            &serde_json::json!({ "open": false, "locked": false, "keys": ["key_brass"] }),
        );
        let lock = ActionId::from("lock");

        let before = door.clone();
        let blocked = engine.perform(&mut door, &without_key, &lock, None);
        assert!(matches!(
            blocked,
            Err(EntityError::ActionBlocked { ref reason, .. })
                if reason.en == "You do not have a key to lock this door"
        ));
        assert_eq!(door, before);

        let with_key = without_key.with("key_brass");
        assert!(engine.perform(&mut door, &with_key, &lock, None).is_ok());
        assert_eq!(door.options.get("locked"), Some(&serde_json::Value::Bool(true)));
    }

    #[test]
    fn menu_matches_perform_outcomes() {
        let registry = registry();
        let engine = ActionEngine::new(&registry);
        let actor_id = ActorId::new();
        let actors = [
            Possessions::empty(actor_id),
            Possessions::empty(actor_id).with("key_brass"),
        ];
        let states = [
            serde_json::json!({ "open": false, "locked": false, "keys": [] }),
            serde_json::json!({ "open": true, "locked": false, "keys": ["key_brass"] }),
            serde_json::json!({ "open": false, "locked": false, "keys": ["key_brass"] }),
            serde_json::json!({ "open": false, "locked": true, "keys": ["key_brass"] }),
        ];

        for actor in &actors {
            for state in &states {
                let door = door(&registry, actor_id, state);
                let menu = engine.list_actions(&door, actor, None).unwrap_or_default();
                let listed = available_ids(&menu);

                let mut performed = BTreeSet::new();
                for entry in &menu {
                    let mut copy = door.clone();
                    if engine.perform(&mut copy, actor, &entry.id, None).is_ok() {
                        performed.insert(entry.id.to_string());
                    } else {
                        assert_eq!(copy, door);
                    }
                }
                assert_eq!(listed, performed);
            }
        }
    }

    #[test]
    fn corrupt_instance_fails_without_mutation() {
        let registry = registry();
        let engine = ActionEngine::new(&registry);
        let actor = Possessions::empty(ActorId::new());
        let mut door = EntityInstance {
            id: InstanceId::from("door_broken"),
            type_id: EntityTypeId::from("house_door"),
            owner: actor.actor,
            options: serde_json::json!({ "open": "maybe" }),
            links: std::collections::BTreeMap::new(),
        };
        let before = door.clone();
        let result = engine.perform(&mut door, &actor, &ActionId::from("open"), None);
        assert!(matches!(result, Err(EntityError::CorruptOptions { .. })));
        assert_eq!(door, before);
    }
}
