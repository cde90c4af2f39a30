//! Power sources: batteries, generators, and solar panels.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storymaker_types::{LocalizedText, QuantityName};

use crate::definition::{ActionInput, ActionSpec, EntityKind, TargetMode};
use crate::effect::Effect;

use super::{locks, verbs};

/// Persistent state of a battery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatteryOptions {
    /// Remaining charge, in percent.
    pub charge: u32,
}

/// Partial battery state accepted at creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatteryOverrides {
    /// Starting charge.
    pub charge: Option<u32>,
}

/// The `energy_battery` entity type.
pub struct Battery;

fn battery_give_condition(_battery: &BatteryOptions, input: &ActionInput<'_>) -> Option<LocalizedText> {
    verbs::target_accepts(
        input,
        <locks::Reader as EntityKind>::TYPE_ID,
        LocalizedText::new(
            "A battery only fits in a reader",
            "Une batterie ne s'insère que dans un lecteur",
        ),
    )
}

fn battery_give_execute(_battery: &mut BatteryOptions, input: &ActionInput<'_>) -> Vec<Effect> {
    verbs::given(input)
}

fn battery_sell_condition(battery: &BatteryOptions, input: &ActionInput<'_>) -> Option<LocalizedText> {
    verbs::carried(input).or_else(|| {
        (battery.charge == 0).then(|| {
            LocalizedText::new("Nobody buys a flat battery", "Personne n'achète une batterie vide")
        })
    })
}

/// Price of a battery: one coin per ten percent of charge.
fn battery_price(battery: &BatteryOptions) -> Decimal {
    Decimal::new(i64::from(battery.charge), 1)
}

fn battery_sell_execute(battery: &mut BatteryOptions, _input: &ActionInput<'_>) -> Vec<Effect> {
    verbs::sold(battery_price(battery))
}

const BATTERY_ACTIONS: &[ActionSpec<BatteryOptions>] = &[
    ActionSpec {
        id: "give",
        target: TargetMode::Required,
        description: verbs::give_description,
        condition: battery_give_condition,
        execute: battery_give_execute,
    },
    ActionSpec {
        id: "sell",
        target: TargetMode::None,
        description: verbs::sell_description,
        condition: battery_sell_condition,
        execute: battery_sell_execute,
    },
    verbs::throw(),
];

impl EntityKind for Battery {
    const TYPE_ID: &'static str = "energy_battery";
    type Options = BatteryOptions;
    type Overrides = BatteryOverrides;

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Battery", "Batterie"),
            many: LocalizedText::new("Batteries", "Batteries"),
        }
    }

    fn init(overrides: BatteryOverrides) -> BatteryOptions {
        BatteryOptions {
            charge: overrides.charge.unwrap_or(100),
        }
    }

    fn actions() -> &'static [ActionSpec<BatteryOptions>] {
        BATTERY_ACTIONS
    }
}

/// Persistent state of a fuel generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorOptions {
    /// Fuel units left.
    pub fuel: u32,
    /// Whether the generator is running.
    pub running: bool,
}

/// Partial generator state accepted at creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneratorOverrides {
    /// Starting fuel.
    pub fuel: Option<u32>,
    /// Whether it starts running.
    pub running: Option<bool>,
}

/// The `energy_generator` entity type.
pub struct Generator;

fn generator_title() -> LocalizedText {
    LocalizedText::new("Generator", "Générateur")
}

fn start_description() -> LocalizedText {
    LocalizedText::new("Start", "Démarrer")
}

fn start_condition(generator: &GeneratorOptions, _input: &ActionInput<'_>) -> Option<LocalizedText> {
    if generator.running {
        return Some(LocalizedText::new(
            "The generator is already running",
            "Le générateur tourne déjà",
        ));
    }
    (generator.fuel == 0).then(|| {
        LocalizedText::new("The generator has no fuel", "Le générateur n'a plus de carburant")
    })
}

fn start_execute(generator: &mut GeneratorOptions, _input: &ActionInput<'_>) -> Vec<Effect> {
    generator.running = true;
    generator.fuel = generator.fuel.saturating_sub(1);
    vec![Effect::narrate(
        generator_title(),
        LocalizedText::new("The generator rumbles to life.", "Le générateur démarre en grondant."),
    )]
}

fn stop_description() -> LocalizedText {
    LocalizedText::new("Stop", "Arrêter")
}

fn stop_condition(generator: &GeneratorOptions, _input: &ActionInput<'_>) -> Option<LocalizedText> {
    (!generator.running).then(|| {
        LocalizedText::new("The generator is not running", "Le générateur est à l'arrêt")
    })
}

fn stop_execute(generator: &mut GeneratorOptions, _input: &ActionInput<'_>) -> Vec<Effect> {
    generator.running = false;
    vec![Effect::narrate(
        generator_title(),
        LocalizedText::new("The generator falls silent.", "Le générateur se tait."),
    )]
}

const GENERATOR_ACTIONS: &[ActionSpec<GeneratorOptions>] = &[
    ActionSpec {
        id: "start",
        target: TargetMode::None,
        description: start_description,
        condition: start_condition,
        execute: start_execute,
    },
    ActionSpec {
        id: "stop",
        target: TargetMode::None,
        description: stop_description,
        condition: stop_condition,
        execute: stop_execute,
    },
];

impl EntityKind for Generator {
    const TYPE_ID: &'static str = "energy_generator";
    type Options = GeneratorOptions;
    type Overrides = GeneratorOverrides;

    fn name() -> QuantityName {
        QuantityName {
            one: generator_title(),
            many: LocalizedText::new("Generators", "Générateurs"),
        }
    }

    fn init(overrides: GeneratorOverrides) -> GeneratorOptions {
        GeneratorOptions {
            fuel: overrides.fuel.unwrap_or(3),
            running: overrides.running.unwrap_or(false),
        }
    }

    fn actions() -> &'static [ActionSpec<GeneratorOptions>] {
        GENERATOR_ACTIONS
    }
}

/// The `energy_solarPanel` entity type.
pub struct SolarPanel;

impl EntityKind for SolarPanel {
    const TYPE_ID: &'static str = "energy_solarPanel";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Solar panel", "Panneau solaire"),
            many: LocalizedText::new("Solar panels", "Panneaux solaires"),
        }
    }

    fn init((): ()) {}
}
