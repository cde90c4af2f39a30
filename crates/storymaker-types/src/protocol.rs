//! Wire envelope, topic names, and client commands.
//!
//! Every message in either direction is one JSON object:
//!
//! ```text
//! { "type": string, "data": any, "context"?: any }
//! ```
//!
//! The server pushes [`TopicName`] snapshots; the client sends the commands
//! named by [`CommandKind`]. Decoding and encoding live in
//! `storymaker-channel`; this module only defines the shapes.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::{ActionId, InstanceId};
use crate::text::LocalizedText;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// One message on the channel, in either direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Envelope {
    /// Topic or command name.
    #[serde(rename = "type")]
    pub kind: String,
    /// Payload; `null` for commands without arguments.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Auxiliary payload, used by `actions` pushes during multi-step commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub context: Option<serde_json::Value>,
}

impl Envelope {
    /// Build an envelope without context.
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            data,
            context: None,
        }
    }

    /// Attach a context payload.
    #[must_use]
    pub fn with_context(mut self, context: serde_json::Value) -> Self {
        self.context = Some(context);
        self
    }
}

// ---------------------------------------------------------------------------
// Topics (server -> client)
// ---------------------------------------------------------------------------

/// A named channel of server-pushed state snapshots.
///
/// Topics are last-value-wins: each push carries the full current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum TopicName {
    /// Session profile (name, seed).
    Profile,
    /// In-world time (day, hour, minute).
    Time,
    /// Actor health, 0 to 100.
    Health,
    /// Actor energy, 0 to 100.
    Energy,
    /// Currency to amount mapping.
    Money,
    /// 2-D grid of cell labels.
    Map,
    /// Actor position on the map.
    Position,
    /// Carried items with their affordances.
    Inventory,
    /// Current action menu, optionally with a multi-step context.
    Actions,
    /// Narrative log entries, oldest first.
    Message,
}

impl TopicName {
    /// Every topic, in the order a full snapshot is pushed.
    pub const ALL: [Self; 10] = [
        Self::Profile,
        Self::Time,
        Self::Health,
        Self::Energy,
        Self::Money,
        Self::Map,
        Self::Position,
        Self::Inventory,
        Self::Actions,
        Self::Message,
    ];

    /// Wire name of the topic.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Profile => "profile",
            Self::Time => "time",
            Self::Health => "health",
            Self::Energy => "energy",
            Self::Money => "money",
            Self::Map => "map",
            Self::Position => "position",
            Self::Inventory => "inventory",
            Self::Actions => "actions",
            Self::Message => "message",
        }
    }

    /// Look up a topic by wire name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|topic| topic.as_str() == name)
    }
}

impl core::fmt::Display for TopicName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Commands (client -> server)
// ---------------------------------------------------------------------------

/// Names of the commands a client may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum CommandKind {
    /// Session bootstrap.
    Start,
    /// Client finished loading; request the first full snapshot.
    Ready,
    /// Invoke an action from the current menu.
    Action,
    /// Abort a pending multi-step command.
    Cancel,
}

impl CommandKind {
    /// Every command kind.
    pub const ALL: [Self; 4] = [Self::Start, Self::Ready, Self::Action, Self::Cancel];

    /// Wire name of the command.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Ready => "ready",
            Self::Action => "action",
            Self::Cancel => "cancel",
        }
    }

    /// Look up a command by wire name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

/// Payload of a `start` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StartCommand {
    /// Display name of the actor.
    pub name: String,
    /// World generation seed.
    pub seed: u64,
}

/// Payload of an `action` command.
///
/// The client copies `id`, `item`, and `target` from the menu entry it
/// selected; it never invents identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionCommand {
    /// The action to perform.
    pub id: ActionId,
    /// The carried item the action applies to, for item verbs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub item: Option<InstanceId>,
    /// The object the action is directed at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub target: Option<InstanceId>,
}

impl ActionCommand {
    /// An action with no item and no target.
    pub fn bare(id: impl Into<ActionId>) -> Self {
        Self {
            id: id.into(),
            item: None,
            target: None,
        }
    }
}

/// A decoded client command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `start{name, seed}`.
    Start(StartCommand),
    /// `ready`.
    Ready,
    /// `action{id, item?, target?}`.
    Action(ActionCommand),
    /// `cancel`.
    Cancel,
}

impl Command {
    /// The wire name of this command.
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Start(_) => CommandKind::Start,
            Self::Ready => CommandKind::Ready,
            Self::Action(_) => CommandKind::Action,
            Self::Cancel => CommandKind::Cancel,
        }
    }
}

// ---------------------------------------------------------------------------
// Item verbs
// ---------------------------------------------------------------------------

/// The two-phase verbs applied to carried items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "bindings/")]
pub enum ItemVerb {
    /// Consume or apply the item.
    Use,
    /// Hand the item over to another object.
    Give,
    /// Exchange the item for money.
    Sell,
    /// Drop the item on the ground.
    Throw,
}

impl ItemVerb {
    /// Every verb, in menu order.
    pub const ALL: [Self; 4] = [Self::Use, Self::Give, Self::Sell, Self::Throw];

    /// The action id carrying this verb.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Use => "use",
            Self::Give => "give",
            Self::Sell => "sell",
            Self::Throw => "throw",
        }
    }

    /// Look up a verb by action id.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|verb| verb.as_str() == id)
    }

    /// Menu label of the verb.
    pub fn label(self) -> LocalizedText {
        match self {
            Self::Use => LocalizedText::new("Use", "Utiliser"),
            Self::Give => LocalizedText::new("Give", "Donner"),
            Self::Sell => LocalizedText::new("Sell", "Vendre"),
            Self::Throw => LocalizedText::new("Throw", "Jeter"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_names_round_trip_through_parse() {
        for topic in TopicName::ALL {
            assert_eq!(TopicName::parse(topic.as_str()), Some(topic));
        }
        assert_eq!(TopicName::parse("weather"), None);
    }

    #[test]
    fn topic_serde_name_matches_wire_name() {
        let json = serde_json::to_value(TopicName::Inventory).ok();
        assert_eq!(json, Some(serde_json::json!("inventory")));
    }

    #[test]
    fn envelope_omits_absent_context() {
        let envelope = Envelope::new("health", serde_json::json!(80));
        let json = serde_json::to_value(&envelope).ok();
        assert_eq!(json, Some(serde_json::json!({ "type": "health", "data": 80 })));
    }

    #[test]
    fn action_command_optional_fields() {
        let parsed: Result<ActionCommand, _> =
            serde_json::from_value(serde_json::json!({ "id": "use", "item": "bandage_1" }));
        let expected = ActionCommand {
            id: ActionId::from("use"),
            item: Some(InstanceId::from("bandage_1")),
            target: None,
        };
        assert_eq!(parsed.ok(), Some(expected));
    }

    #[test]
    fn verbs_parse_from_action_ids() {
        assert_eq!(ItemVerb::parse("sell"), Some(ItemVerb::Sell));
        assert_eq!(ItemVerb::parse("open"), None);
        assert_eq!(ItemVerb::Throw.label().fr, "Jeter");
    }
}
