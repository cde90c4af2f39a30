//! Raw materials and consumables found in the world.

use rust_decimal::Decimal;
use storymaker_types::{LocalizedText, QuantityName};

use crate::definition::{ActionInput, ActionSpec, EntityKind, TargetMode};
use crate::effect::Effect;

use super::{energy, verbs};

/// The `resources_stone` entity type.
pub struct Stone;

fn sell_stone(_options: &mut (), _input: &ActionInput<'_>) -> Vec<Effect> {
    verbs::sold(Decimal::ONE)
}

const STONE_ACTIONS: &[ActionSpec<()>] = &[
    ActionSpec {
        id: "sell",
        target: TargetMode::None,
        description: verbs::sell_description,
        condition: verbs::carried_condition::<()>,
        execute: sell_stone,
    },
    verbs::throw(),
];

impl EntityKind for Stone {
    const TYPE_ID: &'static str = "resources_stone";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Stone", "Pierre"),
            many: LocalizedText::new("Stones", "Pierres"),
        }
    }

    fn init((): ()) {}

    fn actions() -> &'static [ActionSpec<()>] {
        STONE_ACTIONS
    }
}

/// The `resources_wood` entity type.
pub struct Wood;

fn sell_wood(_options: &mut (), _input: &ActionInput<'_>) -> Vec<Effect> {
    verbs::sold(Decimal::TWO)
}

const WOOD_ACTIONS: &[ActionSpec<()>] = &[
    ActionSpec {
        id: "sell",
        target: TargetMode::None,
        description: verbs::sell_description,
        condition: verbs::carried_condition::<()>,
        execute: sell_wood,
    },
    verbs::throw(),
];

impl EntityKind for Wood {
    const TYPE_ID: &'static str = "resources_wood";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Log", "Bûche"),
            many: LocalizedText::new("Logs", "Bûches"),
        }
    }

    fn init((): ()) {}

    fn actions() -> &'static [ActionSpec<()>] {
        WOOD_ACTIONS
    }
}

/// The `resources_water` entity type.
pub struct Water;

fn drink_water(_options: &mut (), _input: &ActionInput<'_>) -> Vec<Effect> {
    vec![
        Effect::RestoreEnergy(10),
        Effect::Consume,
        Effect::narrate(
            LocalizedText::new("Water", "Eau"),
            LocalizedText::new(
                "You drink the water and feel refreshed.",
                "Vous buvez l'eau et vous sentez revigoré.",
            ),
        ),
    ]
}

fn sell_water(_options: &mut (), _input: &ActionInput<'_>) -> Vec<Effect> {
    verbs::sold(Decimal::ONE)
}

const WATER_ACTIONS: &[ActionSpec<()>] = &[
    ActionSpec {
        id: "use",
        target: TargetMode::None,
        description: verbs::use_description,
        condition: verbs::carried_condition::<()>,
        execute: drink_water,
    },
    ActionSpec {
        id: "sell",
        target: TargetMode::None,
        description: verbs::sell_description,
        condition: verbs::carried_condition::<()>,
        execute: sell_water,
    },
    verbs::throw(),
];

impl EntityKind for Water {
    const TYPE_ID: &'static str = "resources_water";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Water bottle", "Bouteille d'eau"),
            many: LocalizedText::new("Water bottles", "Bouteilles d'eau"),
        }
    }

    fn init((): ()) {}

    fn actions() -> &'static [ActionSpec<()>] {
        WATER_ACTIONS
    }
}

/// The `chemicals_gasoline` entity type.
pub struct Gasoline;

fn gasoline_give_condition(_options: &(), input: &ActionInput<'_>) -> Option<LocalizedText> {
    verbs::target_accepts(
        input,
        <energy::Generator as EntityKind>::TYPE_ID,
        LocalizedText::new(
            "Gasoline only goes into a generator",
            "L'essence ne va que dans un générateur",
        ),
    )
}

fn gasoline_give_execute(_options: &mut (), input: &ActionInput<'_>) -> Vec<Effect> {
    verbs::given(input)
}

fn sell_gasoline(_options: &mut (), _input: &ActionInput<'_>) -> Vec<Effect> {
    verbs::sold(Decimal::new(5, 0))
}

const GASOLINE_ACTIONS: &[ActionSpec<()>] = &[
    ActionSpec {
        id: "give",
        target: TargetMode::Required,
        description: verbs::give_description,
        condition: gasoline_give_condition,
        execute: gasoline_give_execute,
    },
    ActionSpec {
        id: "sell",
        target: TargetMode::None,
        description: verbs::sell_description,
        condition: verbs::carried_condition::<()>,
        execute: sell_gasoline,
    },
    verbs::throw(),
];

impl EntityKind for Gasoline {
    const TYPE_ID: &'static str = "chemicals_gasoline";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Gasoline can", "Bidon d'essence"),
            many: LocalizedText::new("Gasoline cans", "Bidons d'essence"),
        }
    }

    fn init((): ()) {}

    fn actions() -> &'static [ActionSpec<()>] {
        GASOLINE_ACTIONS
    }
}
