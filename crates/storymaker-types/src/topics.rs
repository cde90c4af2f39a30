//! Payloads carried by server-pushed topics.
//!
//! Each struct is the `data` of one [`TopicName`](crate::protocol::TopicName).
//! `health` and `energy` are bare numbers, `money` is a currency to amount
//! mapping, and `map` is a grid of cell labels; those need no struct.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{ActionId, InstanceId};
use crate::text::LocalizedText;

/// Currency name to amount held.
pub type Wallet = BTreeMap<String, Decimal>;

/// Payload of the `profile` topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Profile {
    /// Actor display name.
    pub name: String,
    /// World generation seed.
    pub seed: u64,
}

/// In-world time, payload of the `time` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameTime {
    /// Day number, starting at 1.
    pub day: u32,
    /// Hour of day, 0 to 23.
    pub hour: u32,
    /// Minute of hour, 0 to 59.
    pub minute: u32,
}

impl core::fmt::Display for GameTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "Day {} - {:02}:{:02}", self.day, self.hour, self.minute)
    }
}

/// Actor position on the map, payload of the `position` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Column index.
    pub x: u32,
    /// Row index.
    pub y: u32,
}

/// One carried item in the `inventory` topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct InventoryItem {
    /// Instance identifier, echoed back in `action{item}`.
    pub id: InstanceId,
    /// Display name of the item's type.
    pub name: LocalizedText,
    /// The item can be used right now.
    pub usable: bool,
    /// The item can be given to something in reach.
    pub giveable: bool,
    /// The item can be sold.
    pub sellable: bool,
    /// The item can be thrown away.
    pub throwable: bool,
}

/// One entry of the `actions` topic.
///
/// The entry carries exactly the fields the client echoes back in an
/// `action` command when it is selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionEntry {
    /// Action identifier.
    pub id: ActionId,
    /// Display text of the entry.
    pub label: LocalizedText,
    /// Whether the action can be performed right now.
    pub available: bool,
    /// Why the action is blocked, when it is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub reason: Option<LocalizedText>,
    /// Carried item the action applies to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub item: Option<InstanceId>,
    /// Object the action is directed at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub target: Option<InstanceId>,
}

/// Which identifier a multi-step command is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum SelectionStep {
    /// Choose the carried item the verb applies to.
    Item,
    /// Choose the object the item is directed at.
    Target,
}

/// `context` accompanying an `actions` push during a multi-step command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionContext {
    /// The verb being completed.
    pub verb: ActionId,
    /// What the menu is asking for.
    pub step: SelectionStep,
    /// The item already chosen, during target selection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub item: Option<InstanceId>,
    /// Instruction shown above the candidates.
    pub prompt: LocalizedText,
}

/// One narrative log entry, payload of the `message` topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NarrativeMessage {
    /// Short heading.
    pub title: LocalizedText,
    /// Body text.
    pub content: LocalizedText,
    /// In-world time the entry occurred.
    pub time: GameTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_time_display() {
        let time = GameTime {
            day: 2,
            hour: 8,
            minute: 5,
        };
        assert_eq!(time.to_string(), "Day 2 - 08:05");
    }

    #[test]
    fn game_time_orders_chronologically() {
        let earlier = GameTime {
            day: 1,
            hour: 23,
            minute: 59,
        };
        let later = GameTime {
            day: 2,
            hour: 0,
            minute: 0,
        };
        assert!(earlier < later);
    }

    #[test]
    fn action_entry_skips_absent_fields() {
        let entry = ActionEntry {
            id: ActionId::from("open"),
            label: LocalizedText::new("Open", "Ouvrir"),
            available: true,
            reason: None,
            item: None,
            target: Some(InstanceId::from("door_front")),
        };
        let json = serde_json::to_value(&entry).ok();
        assert_eq!(
            json,
            Some(serde_json::json!({
                "id": "open",
                "label": { "en": "Open", "fr": "Ouvrir" },
                "available": true,
                "target": "door_front",
            }))
        );
    }
}
