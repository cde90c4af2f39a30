//! Medical supplies.

use storymaker_types::{LocalizedText, QuantityName};

use crate::definition::{ActionInput, ActionSpec, EntityKind, TargetMode};
use crate::effect::Effect;

use super::verbs;

/// Health restored by one bandage.
pub const BANDAGE_HEAL: u32 = 25;

/// The `medical_bandage` entity type.
pub struct Bandage;

fn apply_bandage(_options: &mut (), _input: &ActionInput<'_>) -> Vec<Effect> {
    vec![
        Effect::Heal(BANDAGE_HEAL),
        Effect::Consume,
        Effect::narrate(
            LocalizedText::new("Bandage", "Bandage"),
            LocalizedText::new(
                "You dress your wounds.",
                "Vous pansez vos blessures.",
            ),
        ),
    ]
}

const BANDAGE_ACTIONS: &[ActionSpec<()>] = &[
    ActionSpec {
        id: "use",
        target: TargetMode::None,
        description: verbs::use_description,
        condition: verbs::carried_condition::<()>,
        execute: apply_bandage,
    },
    verbs::throw(),
];

impl EntityKind for Bandage {
    const TYPE_ID: &'static str = "medical_bandage";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Bandage", "Bandage"),
            many: LocalizedText::new("Bandages", "Bandages"),
        }
    }

    fn init((): ()) {}

    fn actions() -> &'static [ActionSpec<()>] {
        BANDAGE_ACTIONS
    }
}
