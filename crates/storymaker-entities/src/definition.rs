//! Entity type definitions.
//!
//! An entity type implements [`EntityKind`]: it names itself, builds its
//! default options from partial overrides, and declares a fixed table of
//! [`ActionSpec`]s. Each spec pairs a pure condition with an execute step as
//! plain function pointers, so the action table is resolved at compile time
//! and never rebuilt per call.
//!
//! The registry stores types behind the object-safe [`EntityDefinition`]
//! trait. Instance options travel as `serde_json::Value` and are decoded into
//! the typed options record for every evaluation, which keeps the stored
//! value untouched until an execute step has fully succeeded.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::panic::{AssertUnwindSafe, catch_unwind};

use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned};
use storymaker_types::{
    ActionId, ActorId, EntityTypeId, InstanceId, LocalizedText, QuantityName,
};

use crate::capability::CapabilityView;
use crate::effect::Effect;
use crate::error::EntityError;

// ---------------------------------------------------------------------------
// Action tables
// ---------------------------------------------------------------------------

/// Whether an action is directed at a second object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    /// The action applies to the instance alone.
    None,
    /// The action needs a target; the engine passes it through untouched.
    Required,
}

/// The second object of a targeted action, as seen by conditions.
#[derive(Debug, Clone, Copy)]
pub struct TargetRef<'a> {
    /// Target instance id.
    pub id: &'a InstanceId,
    /// Target entity type.
    pub type_id: &'a EntityTypeId,
}

/// Everything a condition or execute step may read besides the options.
#[derive(Clone, Copy)]
pub struct ActionInput<'a> {
    /// The instance the action belongs to.
    pub instance: &'a InstanceId,
    /// The actor the instance belongs to.
    pub owner: ActorId,
    /// Soft references to other instances.
    pub links: &'a BTreeMap<String, InstanceId>,
    /// The acting actor.
    pub actor: &'a dyn CapabilityView,
    /// Target of the action, for targeted actions.
    pub target: Option<TargetRef<'a>>,
}

/// Condition: `None` when the action is legal, otherwise the reason it is not.
pub type ConditionFn<O> = fn(&O, &ActionInput<'_>) -> Option<LocalizedText>;

/// Execute: mutate the options and report world-level effects.
pub type ExecuteFn<O> = fn(&mut O, &ActionInput<'_>) -> Vec<Effect>;

/// One entry of an entity type's action table.
pub struct ActionSpec<O> {
    /// Stable action identifier.
    pub id: &'static str,
    /// Whether the action is directed at another object.
    pub target: TargetMode,
    /// Menu label.
    pub description: fn() -> LocalizedText,
    /// Pure legality check.
    pub condition: ConditionFn<O>,
    /// State mutation, only ever run right after a passing condition.
    pub execute: ExecuteFn<O>,
}

/// Blueprint of one kind of world object.
///
/// `Options` is the complete persistent state; stateless kinds use `()`.
/// `Overrides` is the partial form accepted by [`EntityKind::init`]; feeding
/// a full options record back as overrides must reproduce it exactly.
pub trait EntityKind: 'static {
    /// Stable registry identifier.
    const TYPE_ID: &'static str;

    /// Complete options record.
    type Options: Clone + PartialEq + Serialize + DeserializeOwned;

    /// Partial options accepted at creation.
    type Overrides: Default + DeserializeOwned;

    /// Display name by quantity.
    fn name() -> QuantityName;

    /// Build a complete options record, defaulting every field not overridden.
    fn init(overrides: Self::Overrides) -> Self::Options;

    /// Declared actions, in menu order.
    fn actions() -> &'static [ActionSpec<Self::Options>] {
        &[]
    }

    /// Entity ids held in option fields.
    fn references(_options: &Self::Options) -> Vec<InstanceId> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Type-erased definitions
// ---------------------------------------------------------------------------

/// Declared action of a type, without its functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionDecl {
    /// Action identifier.
    pub id: &'static str,
    /// Whether the action needs a target.
    pub target: TargetMode,
}

/// One evaluated menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOption {
    /// Action identifier.
    pub id: ActionId,
    /// Menu label.
    pub label: LocalizedText,
    /// Whether the condition passed.
    pub available: bool,
    /// Condition text when blocked.
    pub reason: Option<LocalizedText>,
    /// Whether the action needs a target.
    pub target: TargetMode,
}

/// Result of a successful execute step.
#[derive(Debug, Clone, PartialEq)]
pub struct Performed {
    /// New options to commit on the instance.
    pub options: serde_json::Value,
    /// World-level consequences.
    pub effects: Vec<Effect>,
}

/// Object-safe view of an [`EntityKind`], as stored in the registry.
pub trait EntityDefinition: Send + Sync {
    /// Registry identifier.
    fn type_id(&self) -> EntityTypeId;

    /// Display name by quantity.
    fn name(&self) -> QuantityName;

    /// Build complete options from partial overrides (`null` or `{}` for none).
    fn init(&self, overrides: &serde_json::Value) -> Result<serde_json::Value, EntityError>;

    /// Declared actions, in menu order.
    fn declarations(&self) -> Vec<ActionDecl>;

    /// Evaluate every declared action against the options.
    fn menu(
        &self,
        options: &serde_json::Value,
        input: &ActionInput<'_>,
    ) -> Result<Vec<ActionOption>, EntityError>;

    /// Re-check one action's condition and, if it passes, execute it on a copy.
    fn perform(
        &self,
        options: &serde_json::Value,
        action: &ActionId,
        input: &ActionInput<'_>,
    ) -> Result<Performed, EntityError>;

    /// Entity ids held in option fields.
    fn references(
        &self,
        instance: &InstanceId,
        options: &serde_json::Value,
    ) -> Result<Vec<InstanceId>, EntityError>;
}

/// Registry adapter from a static [`EntityKind`] to [`EntityDefinition`].
pub struct Definition<K>(PhantomData<fn() -> K>);

impl<K> Definition<K> {
    /// Adapter for `K`.
    pub const fn new() -> Self {
        Self(PhantomData)
    }
}

impl<K> Default for Definition<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EntityKind> Definition<K> {
    fn decode(
        instance: &InstanceId,
        options: &serde_json::Value,
    ) -> Result<K::Options, EntityError> {
        K::Options::deserialize(options).map_err(|e| EntityError::CorruptOptions {
            instance: instance.clone(),
            type_id: EntityTypeId::from(K::TYPE_ID),
            reason: e.to_string(),
        })
    }

    fn encode(instance: &InstanceId, options: &K::Options) -> Result<serde_json::Value, EntityError> {
        serde_json::to_value(options).map_err(|e| EntityError::CorruptOptions {
            instance: instance.clone(),
            type_id: EntityTypeId::from(K::TYPE_ID),
            reason: e.to_string(),
        })
    }
}

/// Whether an overrides payload carries no override at all.
fn is_empty_overrides(overrides: &serde_json::Value) -> bool {
    match overrides {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

impl<K: EntityKind> EntityDefinition for Definition<K> {
    fn type_id(&self) -> EntityTypeId {
        EntityTypeId::from(K::TYPE_ID)
    }

    fn name(&self) -> QuantityName {
        K::name()
    }

    fn init(&self, overrides: &serde_json::Value) -> Result<serde_json::Value, EntityError> {
        let partial = if is_empty_overrides(overrides) {
            K::Overrides::default()
        } else {
            K::Overrides::deserialize(overrides).map_err(|e| EntityError::InvalidOverrides {
                type_id: EntityTypeId::from(K::TYPE_ID),
                reason: e.to_string(),
            })?
        };
        serde_json::to_value(K::init(partial)).map_err(|e| EntityError::InvalidOverrides {
            type_id: EntityTypeId::from(K::TYPE_ID),
            reason: e.to_string(),
        })
    }

    fn declarations(&self) -> Vec<ActionDecl> {
        K::actions()
            .iter()
            .map(|spec| ActionDecl {
                id: spec.id,
                target: spec.target,
            })
            .collect()
    }

    fn menu(
        &self,
        options: &serde_json::Value,
        input: &ActionInput<'_>,
    ) -> Result<Vec<ActionOption>, EntityError> {
        let state = Self::decode(input.instance, options)?;
        Ok(K::actions()
            .iter()
            .map(|spec| {
                let reason = (spec.condition)(&state, input);
                ActionOption {
                    id: ActionId::from(spec.id),
                    label: (spec.description)(),
                    available: reason.is_none(),
                    reason,
                    target: spec.target,
                }
            })
            .collect())
    }

    fn perform(
        &self,
        options: &serde_json::Value,
        action: &ActionId,
        input: &ActionInput<'_>,
    ) -> Result<Performed, EntityError> {
        let spec = K::actions()
            .iter()
            .find(|spec| spec.id == action.as_str())
            .ok_or_else(|| EntityError::UnknownAction {
                instance: input.instance.clone(),
                action: action.clone(),
            })?;

        let mut state = Self::decode(input.instance, options)?;

        if let Some(reason) = (spec.condition)(&state, input) {
            return Err(EntityError::ActionBlocked {
                action: action.clone(),
                reason,
            });
        }

        // Execute runs on a decoded copy; a panic discards the copy.
        let effects = catch_unwind(AssertUnwindSafe(|| (spec.execute)(&mut state, input)))
            .map_err(|_panic| EntityError::ExecuteFailed {
                instance: input.instance.clone(),
                action: action.clone(),
            })?;

        Ok(Performed {
            options: Self::encode(input.instance, &state)?,
            effects,
        })
    }

    fn references(
        &self,
        instance: &InstanceId,
        options: &serde_json::Value,
    ) -> Result<Vec<InstanceId>, EntityError> {
        let state = Self::decode(instance, options)?;
        Ok(K::references(&state))
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;
    use crate::capability::Possessions;

    /// A lamp that can be switched on once, and panics when smashed.
    struct Lamp;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct LampOptions {
        lit: bool,
        bulbs: u32,
    }

    #[derive(Debug, Default, Deserialize)]
    struct LampOverrides {
        lit: Option<bool>,
        bulbs: Option<u32>,
    }

    fn switch_on_description() -> LocalizedText {
        LocalizedText::new("Switch on", "Allumer")
    }

    fn switch_on_condition(options: &LampOptions, _input: &ActionInput<'_>) -> Option<LocalizedText> {
        options
            .lit
            .then(|| LocalizedText::new("Already lit", "Déjà allumée"))
    }

    fn switch_on_execute(options: &mut LampOptions, _input: &ActionInput<'_>) -> Vec<Effect> {
        options.lit = true;
        Vec::new()
    }

    fn smash_description() -> LocalizedText {
        LocalizedText::new("Smash", "Briser")
    }

    fn smash_condition(_options: &LampOptions, _input: &ActionInput<'_>) -> Option<LocalizedText> {
        None
    }

    #[allow(clippy::panic)]
    fn smash_execute(options: &mut LampOptions, _input: &ActionInput<'_>) -> Vec<Effect> {
        options.bulbs = 0;
        panic!("smashing is not supported");
    }

    const LAMP_ACTIONS: &[ActionSpec<LampOptions>] = &[
        ActionSpec {
            id: "switch_on",
            target: TargetMode::None,
            description: switch_on_description,
            condition: switch_on_condition,
            execute: switch_on_execute,
        },
        ActionSpec {
            id: "smash",
            target: TargetMode::None,
            description: smash_description,
            condition: smash_condition,
            execute: smash_execute,
        },
    ];

    impl EntityKind for Lamp {
        const TYPE_ID: &'static str = "test_lamp";
        type Options = LampOptions;
        type Overrides = LampOverrides;

        fn name() -> QuantityName {
            QuantityName {
                one: LocalizedText::new("Lamp", "Lampe"),
                many: LocalizedText::new("Lamps", "Lampes"),
            }
        }

        fn init(overrides: LampOverrides) -> LampOptions {
            LampOptions {
                lit: overrides.lit.unwrap_or(false),
                bulbs: overrides.bulbs.unwrap_or(1),
            }
        }

        fn actions() -> &'static [ActionSpec<LampOptions>] {
            LAMP_ACTIONS
        }
    }

    fn input<'a>(
        instance: &'a InstanceId,
        links: &'a BTreeMap<String, InstanceId>,
        actor: &'a Possessions,
    ) -> ActionInput<'a> {
        ActionInput {
            instance,
            owner: actor.actor,
            links,
            actor,
            target: None,
        }
    }

    #[test]
    fn init_defaults_and_overrides() {
        let lamp = Definition::<Lamp>::new();
        let defaults = lamp.init(&serde_json::Value::Null).ok();
        assert_eq!(defaults, Some(serde_json::json!({ "lit": false, "bulbs": 1 })));

        let partial = lamp.init(&serde_json::json!({ "bulbs": 3 })).ok();
        assert_eq!(partial, Some(serde_json::json!({ "lit": false, "bulbs": 3 })));
    }

    #[test]
    fn init_rejects_wrong_shape() {
        let lamp = Definition::<Lamp>::new();
        let result = lamp.init(&serde_json::json!({ "bulbs": "many" }));
        assert!(matches!(result, Err(EntityError::InvalidOverrides { .. })));
    }

    #[test]
    fn menu_follows_declaration_order() {
        let lamp = Definition::<Lamp>::new();
        let id = InstanceId::from("lamp_1");
        let links = BTreeMap::new();
        let actor = Possessions::empty(ActorId::new());
        let options = serde_json::json!({ "lit": true, "bulbs": 1 });

        let menu = lamp.menu(&options, &input(&id, &links, &actor)).unwrap_or_default();
        let ids: Vec<&str> = menu.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["switch_on", "smash"]);
        assert_eq!(menu.first().map(|entry| entry.available), Some(false));
    }

    #[test]
    fn perform_returns_new_options() {
        let lamp = Definition::<Lamp>::new();
        let id = InstanceId::from("lamp_1");
        let links = BTreeMap::new();
        let actor = Possessions::empty(ActorId::new());
        let options = serde_json::json!({ "lit": false, "bulbs": 1 });

        let performed = lamp
            .perform(&options, &ActionId::from("switch_on"), &input(&id, &links, &actor))
            .ok();
        assert_eq!(
            performed.map(|p| p.options),
            Some(serde_json::json!({ "lit": true, "bulbs": 1 }))
        );
    }

    #[test]
    fn panicking_execute_is_contained() {
        let lamp = Definition::<Lamp>::new();
        let id = InstanceId::from("lamp_1");
        let links = BTreeMap::new();
        let actor = Possessions::empty(ActorId::new());
        let options = serde_json::json!({ "lit": false, "bulbs": 1 });

        let result = lamp.perform(&options, &ActionId::from("smash"), &input(&id, &links, &actor));
        assert!(matches!(result, Err(EntityError::ExecuteFailed { .. })));
    }

    #[test]
    fn corrupt_options_are_reported() {
        let lamp = Definition::<Lamp>::new();
        let id = InstanceId::from("lamp_1");
        let links = BTreeMap::new();
        let actor = Possessions::empty(ActorId::new());
        let result = lamp.menu(&serde_json::json!({ "lit": 7 }), &input(&id, &links, &actor));
        assert!(matches!(result, Err(EntityError::CorruptOptions { .. })));
    }
}
