//! Building blocks shared by item verb actions.

use rust_decimal::Decimal;
use storymaker_types::{ItemVerb, LocalizedText};

use crate::definition::{ActionInput, ActionSpec, TargetMode};
use crate::effect::Effect;

use super::CURRENCY;

/// Blocks the action unless the actor carries the instance.
pub fn carried(input: &ActionInput<'_>) -> Option<LocalizedText> {
    (!input.actor.has(input.instance)).then(|| {
        LocalizedText::new("You are not carrying this", "Vous ne portez pas cet objet")
    })
}

/// Condition form of [`carried`].
pub fn carried_condition<O>(_options: &O, input: &ActionInput<'_>) -> Option<LocalizedText> {
    carried(input)
}

/// Blocks a give unless the target is of the accepted type.
pub fn target_accepts(
    input: &ActionInput<'_>,
    accepted_type: &str,
    refusal: LocalizedText,
) -> Option<LocalizedText> {
    if let Some(reason) = carried(input) {
        return Some(reason);
    }
    match input.target {
        None => Some(LocalizedText::new(
            "Choose what to give it to",
            "Choisissez à quoi le donner",
        )),
        Some(target) if target.type_id.as_str() == accepted_type => None,
        Some(_) => Some(refusal),
    }
}

/// Effects of handing the item to the target.
pub fn given(input: &ActionInput<'_>) -> Vec<Effect> {
    input.target.map_or_else(Vec::new, |target| {
        vec![
            Effect::TransferTo(target.id.clone()),
            Effect::narrate(
                LocalizedText::new("Given", "Donné"),
                LocalizedText::new("You hand it over.", "Vous le remettez."),
            ),
        ]
    })
}

/// Effects of selling the item for `amount` coins.
pub fn sold(amount: Decimal) -> Vec<Effect> {
    vec![
        Effect::Earn {
            currency: CURRENCY.to_owned(),
            amount,
        },
        Effect::Consume,
        Effect::narrate(
            LocalizedText::new("Sold", "Vendu"),
            LocalizedText::new(
                format!("You sell it for {amount} {CURRENCY}."),
                format!("Vous le vendez pour {amount} {CURRENCY}."),
            ),
        ),
    ]
}

fn throw_description() -> LocalizedText {
    ItemVerb::Throw.label()
}

fn throw_execute<O>(_options: &mut O, _input: &ActionInput<'_>) -> Vec<Effect> {
    vec![
        Effect::Drop,
        Effect::narrate(
            LocalizedText::new("Thrown", "Jeté"),
            LocalizedText::new("You throw it on the ground.", "Vous le jetez par terre."),
        ),
    ]
}

/// The `throw` action: drop a carried item where the actor stands.
pub const fn throw<O>() -> ActionSpec<O> {
    ActionSpec {
        id: "throw",
        target: TargetMode::None,
        description: throw_description,
        condition: carried_condition::<O>,
        execute: throw_execute::<O>,
    }
}

/// Menu label of the `use` verb.
pub fn use_description() -> LocalizedText {
    ItemVerb::Use.label()
}

/// Menu label of the `give` verb.
pub fn give_description() -> LocalizedText {
    ItemVerb::Give.label()
}

/// Menu label of the `sell` verb.
pub fn sell_description() -> LocalizedText {
    ItemVerb::Sell.label()
}
