//! Doors: open, close, lock, and unlock.
//!
//! Locking and unlocking consult the actor's possessions: the actor must
//! hold one of the keys listed in the door's options.

use serde::{Deserialize, Serialize};
use storymaker_types::{InstanceId, LocalizedText, QuantityName};

use crate::definition::{ActionInput, ActionSpec, EntityKind, TargetMode};
use crate::effect::Effect;

/// Lock mechanism of a door.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DoorType {
    /// Key-operated.
    #[default]
    Classic,
    /// Mechanical code.
    Mechanical,
    /// Card reader.
    Electronic,
}

/// Persistent state of a door.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorOptions {
    /// Lock mechanism.
    #[serde(rename = "type")]
    pub kind: DoorType,
    /// Whether the door is open.
    pub open: bool,
    /// Whether the door is locked.
    pub locked: bool,
    /// Instances that can lock and unlock the door.
    pub keys: Vec<InstanceId>,
    /// Security rating of the lock.
    pub security: u32,
}

/// Partial door state accepted at creation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DoorOverrides {
    /// Lock mechanism.
    #[serde(rename = "type")]
    pub kind: Option<DoorType>,
    /// Whether the door starts open.
    pub open: Option<bool>,
    /// Whether the door starts locked.
    pub locked: Option<bool>,
    /// Key instances.
    pub keys: Option<Vec<InstanceId>>,
    /// Security rating.
    pub security: Option<u32>,
}

/// The `house_door` entity type.
pub struct Door;

fn door_title() -> LocalizedText {
    LocalizedText::new("Door", "Porte")
}

fn open_description() -> LocalizedText {
    LocalizedText::new("Open", "Ouvrir")
}

fn open_condition(door: &DoorOptions, _input: &ActionInput<'_>) -> Option<LocalizedText> {
    if door.open {
        return Some(LocalizedText::new(
            "This door is already open",
            "Cette porte est déjà ouverte",
        ));
    }
    if door.locked {
        return Some(LocalizedText::new(
            "This door is locked",
            "Cette porte est verrouillée",
        ));
    }
    None
}

fn open_execute(door: &mut DoorOptions, _input: &ActionInput<'_>) -> Vec<Effect> {
    door.open = true;
    vec![Effect::narrate(
        door_title(),
        LocalizedText::new("You open the door.", "Vous ouvrez la porte."),
    )]
}

fn close_description() -> LocalizedText {
    LocalizedText::new("Close", "Fermer")
}

fn close_condition(door: &DoorOptions, _input: &ActionInput<'_>) -> Option<LocalizedText> {
    (!door.open).then(|| {
        LocalizedText::new("This door is already closed", "Cette porte est déjà fermée")
    })
}

fn close_execute(door: &mut DoorOptions, _input: &ActionInput<'_>) -> Vec<Effect> {
    door.open = false;
    vec![Effect::narrate(
        door_title(),
        LocalizedText::new("You close the door.", "Vous fermez la porte."),
    )]
}

fn lock_description() -> LocalizedText {
    LocalizedText::new("Lock", "Verrouiller")
}

fn lock_condition(door: &DoorOptions, input: &ActionInput<'_>) -> Option<LocalizedText> {
    if door.locked {
        return Some(LocalizedText::new(
            "This door is already locked",
            "Cette porte est déjà verrouillée",
        ));
    }
    if door.open {
        return Some(LocalizedText::new("This door is open", "Cette porte est ouverte"));
    }
    if door.keys.is_empty() {
        return Some(LocalizedText::new(
            "This door does not have yet any key to lock it",
            "Cette porte ne possède pas encore de clé pour la verrouiller",
        ));
    }
    if !input.actor.has_one_of(&door.keys) {
        return Some(LocalizedText::new(
            "You do not have a key to lock this door",
            "Vous ne possédez pas de clé pour verrouiller cette porte",
        ));
    }
    None
}

fn lock_execute(door: &mut DoorOptions, _input: &ActionInput<'_>) -> Vec<Effect> {
    door.locked = true;
    vec![Effect::narrate(
        door_title(),
        LocalizedText::new("You lock the door.", "Vous verrouillez la porte."),
    )]
}

fn unlock_description() -> LocalizedText {
    LocalizedText::new("Unlock", "Déverrouiller")
}

fn unlock_condition(door: &DoorOptions, input: &ActionInput<'_>) -> Option<LocalizedText> {
    if !door.locked {
        return Some(LocalizedText::new(
            "This door is already unlocked",
            "Cette porte est déjà déverrouillée",
        ));
    }
    if !input.actor.has_one_of(&door.keys) {
        return Some(LocalizedText::new(
            "You do not have a key to unlock this door",
            "Vous ne possédez pas de clé pour déverrouiller cette porte",
        ));
    }
    None
}

fn unlock_execute(door: &mut DoorOptions, _input: &ActionInput<'_>) -> Vec<Effect> {
    door.locked = false;
    vec![Effect::narrate(
        door_title(),
        LocalizedText::new("You unlock the door.", "Vous déverrouillez la porte."),
    )]
}

const DOOR_ACTIONS: &[ActionSpec<DoorOptions>] = &[
    ActionSpec {
        id: "open",
        target: TargetMode::None,
        description: open_description,
        condition: open_condition,
        execute: open_execute,
    },
    ActionSpec {
        id: "close",
        target: TargetMode::None,
        description: close_description,
        condition: close_condition,
        execute: close_execute,
    },
    ActionSpec {
        id: "lock",
        target: TargetMode::None,
        description: lock_description,
        condition: lock_condition,
        execute: lock_execute,
    },
    ActionSpec {
        id: "unlock",
        target: TargetMode::None,
        description: unlock_description,
        condition: unlock_condition,
        execute: unlock_execute,
    },
];

impl EntityKind for Door {
    const TYPE_ID: &'static str = "house_door";
    type Options = DoorOptions;
    type Overrides = DoorOverrides;

    fn name() -> QuantityName {
        QuantityName {
            one: door_title(),
            many: LocalizedText::new("Doors", "Portes"),
        }
    }

    fn init(overrides: DoorOverrides) -> DoorOptions {
        DoorOptions {
            kind: overrides.kind.unwrap_or_default(),
            open: overrides.open.unwrap_or(false),
            locked: overrides.locked.unwrap_or(false),
            keys: overrides.keys.unwrap_or_default(),
            security: overrides.security.unwrap_or(0),
        }
    }

    fn actions() -> &'static [ActionSpec<DoorOptions>] {
        DOOR_ACTIONS
    }

    fn references(options: &DoorOptions) -> Vec<InstanceId> {
        options.keys.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_a_closed_unlocked_keyless_door() {
        let door = Door::init(DoorOverrides::default());
        assert_eq!(door.kind, DoorType::Classic);
        assert!(!door.open);
        assert!(!door.locked);
        assert!(door.keys.is_empty());
        assert_eq!(door.security, 0);
    }

    #[test]
    fn overrides_touch_only_their_fields() {
        let door = Door::init(DoorOverrides {
            kind: Some(DoorType::Electronic),
            security: Some(3),
            ..DoorOverrides::default()
        });
        assert_eq!(door.kind, DoorType::Electronic);
        assert_eq!(door.security, 3);
        assert!(!door.open);
        assert!(door.keys.is_empty());
    }

    #[test]
    fn door_type_wire_names() {
        let json = serde_json::to_value(DoorType::Mechanical).ok();
        assert_eq!(json, Some(serde_json::json!("MECHANICAL")));
    }

    #[test]
    fn keys_are_references() {
        let door = Door::init(DoorOverrides {
            keys: Some(vec![InstanceId::from("key_brass")]),
            ..DoorOverrides::default()
        });
        assert_eq!(Door::references(&door), vec![InstanceId::from("key_brass")]);
    }
}
