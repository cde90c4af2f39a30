//! Local mirror of the server-pushed topics.
//!
//! [`GameView`] folds topic pushes into typed state. Every topic is
//! last-value-wins except `message`, whose pushes are appended: `ready`
//! replays the whole log and later pushes carry only new entries, so a
//! view must be [`reset`](GameView::reset) before asking for a new
//! snapshot.

use storymaker_types::{
    ActionCommand, ActionContext, ActionEntry, Command, Envelope, GameTime, InventoryItem,
    LocalizedText, NarrativeMessage, Position, Profile, TopicName, Wallet,
};

use crate::error::ClientError;

/// Display language picked from each [`LocalizedText`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// French.
    Fr,
}

impl Locale {
    /// Parse a locale tag such as `fr` or `en_US`. Unknown tags yield `None`.
    pub fn parse(tag: &str) -> Option<Self> {
        let lang = tag.split(['_', '-', '.']).next().unwrap_or_default();
        match lang.to_ascii_lowercase().as_str() {
            "en" => Some(Self::En),
            "fr" => Some(Self::Fr),
            _ => None,
        }
    }

    /// The rendering of `text` in this locale.
    pub fn pick(self, text: &LocalizedText) -> &str {
        match self {
            Self::En => &text.en,
            Self::Fr => &text.fr,
        }
    }
}

/// Everything the server has told the client so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameView {
    /// Session name and seed.
    pub profile: Option<Profile>,
    /// In-world time.
    pub time: Option<GameTime>,
    /// Actor health.
    pub health: Option<u32>,
    /// Actor energy.
    pub energy: Option<u32>,
    /// Money held per currency.
    pub money: Wallet,
    /// Cell labels, row by row.
    pub map: Vec<Vec<String>>,
    /// Actor position.
    pub position: Option<Position>,
    /// Carried items.
    pub inventory: Vec<InventoryItem>,
    /// Current action menu.
    pub actions: Vec<ActionEntry>,
    /// Pending multi-step command, if any.
    pub context: Option<ActionContext>,
    /// Narrative log, oldest first.
    pub messages: Vec<NarrativeMessage>,
}

impl GameView {
    /// Forget everything, before requesting a fresh snapshot.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fold one push into the view.
    ///
    /// Returns the topic that changed, or `None` for unknown types.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Payload`] if a known topic carries a payload
    /// of the wrong shape; the view is left unchanged.
    pub fn apply(&mut self, envelope: &Envelope) -> Result<Option<TopicName>, ClientError> {
        let Some(topic) = TopicName::parse(&envelope.kind) else {
            return Ok(None);
        };
        match topic {
            TopicName::Profile => self.profile = Some(payload(topic, &envelope.data)?),
            TopicName::Time => self.time = Some(payload(topic, &envelope.data)?),
            TopicName::Health => self.health = Some(payload(topic, &envelope.data)?),
            TopicName::Energy => self.energy = Some(payload(topic, &envelope.data)?),
            TopicName::Money => self.money = payload(topic, &envelope.data)?,
            TopicName::Map => self.map = payload(topic, &envelope.data)?,
            TopicName::Position => self.position = Some(payload(topic, &envelope.data)?),
            TopicName::Inventory => self.inventory = payload(topic, &envelope.data)?,
            TopicName::Actions => {
                let actions = payload(topic, &envelope.data)?;
                self.context = match &envelope.context {
                    Some(context) if !context.is_null() => Some(payload(topic, context)?),
                    _ => None,
                };
                self.actions = actions;
            }
            TopicName::Message => {
                let entries: Vec<NarrativeMessage> = payload(topic, &envelope.data)?;
                self.messages.extend(entries);
            }
        }
        Ok(Some(topic))
    }

    /// The command for the menu entry numbered `number`, counting from 1.
    pub fn command_for(&self, number: usize) -> Option<Command> {
        let entry = self.actions.get(number.checked_sub(1)?)?;
        Some(Command::Action(ActionCommand {
            id: entry.id.clone(),
            item: entry.item.clone(),
            target: entry.target.clone(),
        }))
    }

    /// The map with the actor drawn as `@`.
    pub fn render_map(&self) -> String {
        let mut out = String::new();
        for (y, row) in self.map.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                let here = self.position.is_some_and(|p| {
                    usize::try_from(p.x).is_ok_and(|px| px == x)
                        && usize::try_from(p.y).is_ok_and(|py| py == y)
                });
                out.push_str(if here { "@" } else { cell });
            }
            out.push('\n');
        }
        out
    }
}

fn payload<P: serde::de::DeserializeOwned>(
    topic: TopicName,
    data: &serde_json::Value,
) -> Result<P, ClientError> {
    P::deserialize(data).map_err(|source| ClientError::Payload {
        topic: topic.as_str().to_owned(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use storymaker_types::InstanceId;

    use super::*;

    fn push(kind: &str, data: serde_json::Value) -> Envelope {
        Envelope::new(kind, data)
    }

    fn message(en: &str, minute: u32) -> serde_json::Value {
        json!({
            "title": { "en": "Note", "fr": "Note" },
            "content": { "en": en, "fr": en },
            "time": { "day": 1, "hour": 8, "minute": minute },
        })
    }

    #[test]
    fn topics_replace_previous_values() {
        let mut view = GameView::default();
        view.apply(&push("health", json!(100))).unwrap();
        view.apply(&push("health", json!(95))).unwrap();
        view.apply(&push("money", json!({ "coin": "10" }))).unwrap();
        assert_eq!(view.health, Some(95));
        assert_eq!(view.money.get("coin").map(ToString::to_string).as_deref(), Some("10"));
    }

    #[test]
    fn messages_accumulate_in_order() {
        let mut view = GameView::default();
        view.apply(&push("message", json!([message("first", 0), message("second", 5)])))
            .unwrap();
        view.apply(&push("message", json!([message("third", 10)]))).unwrap();

        let contents: Vec<&str> = view.messages.iter().map(|m| m.content.en.as_str()).collect();
        assert_eq!(contents, ["first", "second", "third"]);

        view.reset();
        assert!(view.messages.is_empty());
    }

    #[test]
    fn actions_carry_their_context() {
        let mut view = GameView::default();
        let menu = json!([
            { "id": "use", "label": { "en": "Bandage", "fr": "Bandage" },
              "available": true, "item": "bandage_1" },
            { "id": "cancel", "label": { "en": "Cancel", "fr": "Annuler" }, "available": true },
        ]);
        let context = json!({
            "verb": "use", "step": "item",
            "prompt": { "en": "Choose an item to use", "fr": "Choisissez" },
        });
        view.apply(&push("actions", menu).with_context(context)).unwrap();
        assert_eq!(view.context.as_ref().map(|c| c.verb.as_str()), Some("use"));

        assert_eq!(
            view.command_for(1),
            Some(Command::Action(ActionCommand {
                id: "use".into(),
                item: Some(InstanceId::from("bandage_1")),
                target: None,
            }))
        );
        assert_eq!(view.command_for(0), None);
        assert_eq!(view.command_for(3), None);

        view.apply(&push("actions", json!([]))).unwrap();
        assert!(view.context.is_none());
    }

    #[test]
    fn bad_payload_leaves_the_view_unchanged() {
        let mut view = GameView::default();
        view.apply(&push("health", json!(80))).unwrap();
        assert!(view.apply(&push("health", json!("lots"))).is_err());
        assert_eq!(view.health, Some(80));
        assert_eq!(view.apply(&push("weather", json!("rain"))).unwrap(), None);
    }

    #[test]
    fn map_marks_the_actor() {
        let mut view = GameView::default();
        view.apply(&push("map", json!([["~", "~", "~"], ["~", ".", "#"]]))).unwrap();
        view.apply(&push("position", json!({ "x": 1, "y": 1 }))).unwrap();
        assert_eq!(view.render_map(), "~~~\n~@#\n");
    }

    #[test]
    fn locale_tags() {
        assert_eq!(Locale::parse("fr_FR.UTF-8"), Some(Locale::Fr));
        assert_eq!(Locale::parse("EN"), Some(Locale::En));
        assert_eq!(Locale::parse("de"), None);
        let text = LocalizedText::new("Door", "Porte");
        assert_eq!(Locale::Fr.pick(&text), "Porte");
    }
}
