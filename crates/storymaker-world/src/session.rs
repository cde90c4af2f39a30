//! One actor's game session.
//!
//! A [`Session`] owns a seeded world and turns client commands into topic
//! pushes. Every command is transactional: the mutable state is
//! checkpointed before dispatch and restored if a data-integrity error
//! aborts the command, so a failed command never leaves partial changes.
//!
//! # Multi-step commands
//!
//! Item verbs (use, give, sell, throw) are picked in up to three steps:
//!
//! ```text
//! Idle --verb--> SelectItem --item--> (SelectTarget --target-->) perform --> Idle
//!          \__________ cancel at any step __________/
//! ```
//!
//! Each step republishes `actions` with the candidates and a `context`.
//! The session only accepts a command that matches an entry it offered in
//! its latest menu.
//!
//! # Topic pushes
//!
//! [`Session::ready`] pushes every topic once. After a command, only topics
//! whose value changed are pushed. `message` always carries a list of
//! entries in emission order: the whole retained history on `ready`, the
//! new entries otherwise.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;

use storymaker_entities::{ActionEngine, EntityError, EntityRegistry, Effect, TargetMode, TargetRef};
use storymaker_types::{
    ActionCommand, ActionContext, ActionEntry, ActionId, Command, Envelope, InstanceId, ItemVerb,
    LocalizedText, NarrativeMessage, Profile, SelectionStep, TopicName,
};
use tracing::{debug, error, info};

use crate::actor::ActorState;
use crate::clock::GameClock;
use crate::config::{GameConfig, SessionConfig};
use crate::error::WorldError;
use crate::map::{Direction, WorldMap};
use crate::populate::populate;
use crate::scene::{CANCEL, REST, Scene, TAKE};
use crate::store::{ActorView, Placement, WorldStore};

/// Progress of a multi-step item command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    /// Base menu.
    Idle,
    /// The verb is chosen; waiting for an item.
    SelectItem {
        /// Chosen verb.
        verb: ItemVerb,
    },
    /// Verb and item are chosen; waiting for a target.
    SelectTarget {
        /// Chosen verb.
        verb: ItemVerb,
        /// Chosen item.
        item: InstanceId,
    },
}

/// Everything a command may mutate.
#[derive(Debug, Clone)]
struct WorldState {
    actor: ActorState,
    clock: GameClock,
    store: WorldStore,
    pending: Pending,
    offered: Vec<ActionEntry>,
    context: Option<ActionContext>,
    history: VecDeque<NarrativeMessage>,
    unsent: Vec<NarrativeMessage>,
}

/// A running game for one actor.
#[derive(Debug)]
pub struct Session {
    registry: Arc<EntityRegistry>,
    config: SessionConfig,
    map: WorldMap,
    state: WorldState,
    published: BTreeMap<TopicName, Envelope>,
}

impl Session {
    /// Start a new game for `profile`, generating the world from its seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the map cannot be generated or the seeded world
    /// fails its integrity checks.
    pub fn new(
        registry: Arc<EntityRegistry>,
        config: &GameConfig,
        profile: Profile,
    ) -> Result<Self, WorldError> {
        let map = WorldMap::generate(profile.seed, &config.map)?;
        let actor = ActorState::new(profile, &config.session, map.house());
        let store = populate(&registry, &map, actor.id, actor.profile.seed)?;

        let mut session = Self {
            registry,
            config: config.session.clone(),
            map,
            state: WorldState {
                actor,
                clock: GameClock::start(),
                store,
                pending: Pending::Idle,
                offered: Vec::new(),
                context: None,
                history: VecDeque::new(),
                unsent: Vec::new(),
            },
            published: BTreeMap::new(),
        };
        let name = session.state.actor.profile.name.clone();
        session.narrate(
            LocalizedText::new("Welcome", "Bienvenue"),
            LocalizedText::new(
                format!("Welcome, {name}. You stand in front of your house."),
                format!("Bienvenue, {name}. Vous êtes devant votre maison."),
            ),
        );
        session.refresh_menu()?;
        info!(
            name = %session.state.actor.profile.name,
            seed = session.state.actor.profile.seed,
            "session started"
        );
        Ok(session)
    }

    /// Name and seed of the session.
    pub const fn profile(&self) -> &Profile {
        &self.state.actor.profile
    }

    /// The acting player.
    pub const fn actor(&self) -> &ActorState {
        &self.state.actor
    }

    /// Live instances.
    pub const fn store(&self) -> &WorldStore {
        &self.state.store
    }

    /// Game clock.
    pub const fn clock(&self) -> &GameClock {
        &self.state.clock
    }

    /// Terrain.
    pub const fn map(&self) -> &WorldMap {
        &self.map
    }

    /// Progress of the current multi-step command.
    pub const fn pending(&self) -> &Pending {
        &self.state.pending
    }

    /// The latest action menu.
    pub fn offered(&self) -> &[ActionEntry] {
        &self.state.offered
    }

    /// Handle a command addressed to this session.
    ///
    /// `start` is resolved by the caller, which picks or creates the session;
    /// it produces no push here.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error; the session is left as it was.
    pub fn handle(&mut self, command: &Command) -> Result<Vec<Envelope>, WorldError> {
        match command {
            Command::Start(_) => Ok(Vec::new()),
            Command::Ready => self.ready(),
            Command::Action(action) => self.act(action),
            Command::Cancel => self.cancel(),
        }
    }

    /// Full snapshot of every topic with a value, each exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::Encode`] if a payload fails to serialize.
    pub fn ready(&mut self) -> Result<Vec<Envelope>, WorldError> {
        self.published.clear();
        let mut pushes = self.changed_topics()?;
        if !self.state.history.is_empty() {
            let history: Vec<&NarrativeMessage> = self.state.history.iter().collect();
            pushes.push(Envelope::new(
                TopicName::Message.as_str(),
                serde_json::to_value(history)?,
            ));
        }
        self.state.unsent.clear();
        debug!(topics = pushes.len(), "snapshot pushed");
        Ok(pushes)
    }

    /// Perform an action command copied from the latest menu.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error; the session is left as it was.
    pub fn act(&mut self, command: &ActionCommand) -> Result<Vec<Envelope>, WorldError> {
        self.transaction(|session| session.dispatch(command))
    }

    /// Abandon any pending selection and return to the base menu.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error; the session is left as it was.
    pub fn cancel(&mut self) -> Result<Vec<Envelope>, WorldError> {
        self.transaction(|session| {
            session.state.pending = Pending::Idle;
            Ok(())
        })
    }

    fn transaction(
        &mut self,
        step: impl FnOnce(&mut Self) -> Result<(), WorldError>,
    ) -> Result<Vec<Envelope>, WorldError> {
        let checkpoint = self.state.clone();
        let outcome = step(self).and_then(|()| self.refresh_menu());
        if let Err(e) = outcome {
            error!(name = %self.state.actor.profile.name, error = %e, "command aborted");
            self.state = checkpoint;
            return Err(e);
        }
        let mut pushes = self.changed_topics()?;
        if !self.state.unsent.is_empty() {
            pushes.push(Envelope::new(
                TopicName::Message.as_str(),
                serde_json::to_value(&self.state.unsent)?,
            ));
            self.state.unsent.clear();
        }
        Ok(pushes)
    }

    fn scene(&self) -> Scene<'_> {
        Scene {
            registry: &self.registry,
            map: &self.map,
            store: &self.state.store,
            actor: &self.state.actor,
        }
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    fn dispatch(&mut self, command: &ActionCommand) -> Result<(), WorldError> {
        let offered = self.state.offered.iter().any(|entry| {
            entry.id == command.id && entry.item == command.item && entry.target == command.target
        });
        if !offered {
            debug!(action = %command.id, "command not in the latest menu");
            self.refuse(LocalizedText::new(
                "That choice is not available right now",
                "Ce choix n'est pas disponible pour le moment",
            ));
            return Ok(());
        }

        let id = command.id.as_str();
        if id == CANCEL {
            self.state.pending = Pending::Idle;
            return Ok(());
        }
        if let Some(direction) = Direction::from_action_id(id) {
            return self.walk(direction);
        }

        match (command.item.as_ref(), command.target.as_ref()) {
            (None, None) if id == REST => self.rest(),
            (None, Some(target)) if id == TAKE => self.take(target),
            (None, None) => match ItemVerb::parse(id) {
                Some(verb) => {
                    self.open_selection(verb);
                    Ok(())
                }
                None => {
                    self.refuse(unknown_action());
                    Ok(())
                }
            },
            (Some(item), None) => match ItemVerb::parse(id) {
                Some(verb) => self.choose_item(verb, item),
                None => self.perform(item, &command.id, None),
            },
            (Some(item), Some(target)) => self.perform(item, &command.id, Some(target)),
            (None, Some(target)) => self.perform(target, &command.id, None),
        }
    }

    fn open_selection(&mut self, verb: ItemVerb) {
        match self.scene().selection_blocker(verb) {
            Ok(None) => self.state.pending = Pending::SelectItem { verb },
            Ok(Some(reason)) => self.refuse(reason),
            Err(e) => {
                error!(verb = verb.as_str(), error = %e, "selection check failed");
                self.refuse(unknown_action());
            }
        }
    }

    fn choose_item(&mut self, verb: ItemVerb, item: &InstanceId) -> Result<(), WorldError> {
        let (blocker, mode) = {
            let scene = self.scene();
            let instance = self.state.store.get(item)?;
            (scene.verb_blocker(instance, verb)?, scene.verb_target(instance, verb)?)
        };
        if let Some(reason) = blocker {
            self.refuse(reason);
            return Ok(());
        }
        match mode {
            Some(TargetMode::Required) => {
                self.state.pending = Pending::SelectTarget {
                    verb,
                    item: item.clone(),
                };
                Ok(())
            }
            _ => self.perform(item, &ActionId::from(verb.as_str()), None),
        }
    }

    fn walk(&mut self, direction: Direction) -> Result<(), WorldError> {
        if let Some(reason) = self.scene().move_blocker(direction) {
            self.refuse(reason);
            return Ok(());
        }
        if let Some(to) = self.map.step(self.state.actor.position, direction) {
            self.state.actor.position = to;
        }
        self.spend_turn()
    }

    fn rest(&mut self) -> Result<(), WorldError> {
        if let Some(reason) = self.scene().rest_blocker() {
            self.refuse(reason);
            return Ok(());
        }
        self.narrate(
            LocalizedText::new("Rest", "Repos"),
            LocalizedText::new("You rest for a while.", "Vous vous reposez un moment."),
        );
        self.state.clock.advance(self.config.rest_minutes)?;
        self.state.actor.restore_energy(self.config.rest_recovery);
        Ok(())
    }

    fn take(&mut self, id: &InstanceId) -> Result<(), WorldError> {
        if let Some(reason) = self.scene().take_blocker(id)? {
            self.refuse(reason);
            return Ok(());
        }
        let name = self.scene().name_of(self.state.store.get(id)?)?;
        self.state.store.place(id, Placement::Carried)?;
        self.narrate(
            LocalizedText::new("Taken", "Ramassé"),
            LocalizedText::new("You pick up: ", "Vous ramassez : ").join("", &name),
        );
        self.spend_turn()
    }

    /// Run an entity action through the engine and apply its effects.
    fn perform(
        &mut self,
        subject: &InstanceId,
        action: &ActionId,
        target: Option<&InstanceId>,
    ) -> Result<(), WorldError> {
        self.state.pending = Pending::Idle;
        let mut working = self.state.store.get(subject)?.clone();
        let result = {
            let target = target.map(|id| self.state.store.get(id)).transpose()?;
            let view = ActorView::new(self.state.actor.id, &self.state.store);
            ActionEngine::new(&self.registry).perform(
                &mut working,
                &view,
                action,
                target.map(|t| TargetRef {
                    id: &t.id,
                    type_id: &t.type_id,
                }),
            )
        };

        let effects = match result {
            Ok(effects) => effects,
            Err(EntityError::ActionBlocked { reason, .. }) => {
                self.refuse(reason);
                return Ok(());
            }
            Err(EntityError::UnknownAction { .. }) => {
                self.refuse(unknown_action());
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        self.state.store.commit(working)?;
        self.apply(subject, effects)?;
        self.spend_turn()
    }

    fn apply(&mut self, subject: &InstanceId, effects: Vec<Effect>) -> Result<(), WorldError> {
        for effect in effects {
            match effect {
                Effect::Narrate { title, content } => self.narrate(title, content),
                Effect::Heal(points) => self.state.actor.heal(points),
                Effect::RestoreEnergy(points) => self.state.actor.restore_energy(points),
                Effect::Earn { currency, amount } => self.state.actor.earn(&currency, amount),
                Effect::Drop => {
                    let here = self.state.actor.position;
                    self.state.store.place(subject, Placement::Ground(here))?;
                }
                Effect::TransferTo(receiver) => {
                    if !self.state.store.contains(&receiver) {
                        return Err(WorldError::UnknownInstance(receiver));
                    }
                    self.state.store.place(subject, Placement::Held(receiver))?;
                }
                Effect::Consume => {
                    self.state.store.remove(subject)?;
                }
            }
        }
        Ok(())
    }

    /// Advance the clock and tire the actor after a successful command.
    ///
    /// Only commands taken with no energy left cost health; the command that
    /// spends the last point does not.
    fn spend_turn(&mut self) -> Result<(), WorldError> {
        self.state.clock.advance(self.config.minutes_per_action)?;
        let was_exhausted = self.state.actor.is_exhausted();
        self.state.actor.drain_energy(self.config.energy_per_action);
        if was_exhausted {
            self.state.actor.hurt(self.config.exhaustion_damage);
            self.narrate(
                LocalizedText::new("Exhausted", "Épuisé"),
                LocalizedText::new(
                    "You have no energy left and your body suffers. Rest.",
                    "Vous n'avez plus d'énergie et votre corps souffre. Reposez-vous.",
                ),
            );
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Messages
    // -----------------------------------------------------------------------

    fn narrate(&mut self, title: LocalizedText, content: LocalizedText) {
        let message = NarrativeMessage {
            title,
            content,
            time: self.state.clock.now(),
        };
        self.state.history.push_back(message.clone());
        while self.state.history.len() > self.config.message_history {
            self.state.history.pop_front();
        }
        self.state.unsent.push(message);
    }

    fn refuse(&mut self, reason: LocalizedText) {
        self.narrate(LocalizedText::new("Impossible", "Impossible"), reason);
    }

    // -----------------------------------------------------------------------
    // Projections
    // -----------------------------------------------------------------------

    /// Recompute the offered menu for the current step.
    fn refresh_menu(&mut self) -> Result<(), WorldError> {
        // A selection whose item left the inventory falls back to the base menu.
        let item_gone = match &self.state.pending {
            Pending::SelectTarget { item, .. } => {
                self.state.store.placement(item) != Some(&Placement::Carried)
            }
            _ => false,
        };
        if item_gone {
            self.state.pending = Pending::Idle;
        }

        let scene = self.scene();
        let (offered, context) = match &self.state.pending {
            Pending::Idle => (scene.base_menu()?, None),
            Pending::SelectItem { verb } => (
                scene.item_menu(*verb)?,
                Some(ActionContext {
                    verb: ActionId::from(verb.as_str()),
                    step: SelectionStep::Item,
                    item: None,
                    prompt: LocalizedText::new(
                        format!("Choose an item to {}", verb.as_str()),
                        format!("Choisissez un objet à {}", verb.label().fr.to_lowercase()),
                    ),
                }),
            ),
            Pending::SelectTarget { verb, item } => (
                scene.target_menu(*verb, item)?,
                Some(ActionContext {
                    verb: ActionId::from(verb.as_str()),
                    step: SelectionStep::Target,
                    item: Some(item.clone()),
                    prompt: LocalizedText::new("Choose the recipient", "Choisissez le destinataire"),
                }),
            ),
        };
        self.state.offered = offered;
        self.state.context = context;
        Ok(())
    }

    fn topic(&self, topic: TopicName) -> Result<Option<Envelope>, WorldError> {
        let actor = &self.state.actor;
        let data = match topic {
            TopicName::Profile => serde_json::to_value(&actor.profile)?,
            TopicName::Time => serde_json::to_value(self.state.clock.now())?,
            TopicName::Health => serde_json::to_value(actor.health)?,
            TopicName::Energy => serde_json::to_value(actor.energy)?,
            TopicName::Money => serde_json::to_value(&actor.wallet)?,
            TopicName::Map => serde_json::to_value(self.map.labels())?,
            TopicName::Position => serde_json::to_value(actor.position)?,
            TopicName::Inventory => serde_json::to_value(self.scene().inventory()?)?,
            TopicName::Actions => {
                let envelope = Envelope::new(topic.as_str(), serde_json::to_value(&self.state.offered)?);
                return Ok(Some(match &self.state.context {
                    Some(context) => envelope.with_context(serde_json::to_value(context)?),
                    None => envelope,
                }));
            }
            TopicName::Message => return Ok(None),
        };
        Ok(Some(Envelope::new(topic.as_str(), data)))
    }

    /// Topics whose value differs from the last push, recorded as pushed.
    fn changed_topics(&mut self) -> Result<Vec<Envelope>, WorldError> {
        let mut pushes = Vec::new();
        for topic in TopicName::ALL {
            let Some(envelope) = self.topic(topic)? else {
                continue;
            };
            if self.published.get(&topic) != Some(&envelope) {
                self.published.insert(topic, envelope.clone());
                pushes.push(envelope);
            }
        }
        Ok(pushes)
    }
}

fn unknown_action() -> LocalizedText {
    LocalizedText::new(
        "This action is not possible here",
        "Cette action n'est pas possible ici",
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use storymaker_entities::objects;
    use storymaker_types::Position;

    fn session() -> Session {
        Session::new(
            Arc::new(objects::registry().unwrap()),
            &GameConfig::default(),
            Profile {
                name: "Ada".to_owned(),
                seed: 7,
            },
        )
        .unwrap()
    }

    fn entry(session: &Session, id: &str, item: Option<&str>, target: Option<&str>) -> ActionEntry {
        session
            .offered()
            .iter()
            .find(|entry| {
                entry.id.as_str() == id
                    && entry.item.as_ref().map(InstanceId::as_str) == item
                    && entry.target.as_ref().map(InstanceId::as_str) == target
            })
            .cloned()
            .unwrap()
    }

    fn command(entry: &ActionEntry) -> ActionCommand {
        ActionCommand {
            id: entry.id.clone(),
            item: entry.item.clone(),
            target: entry.target.clone(),
        }
    }

    #[test]
    fn failed_command_leaves_the_session_untouched() {
        let mut session = session();
        session.ready().unwrap();
        session.state.clock = GameClock::from_minutes(u64::MAX);
        let door = InstanceId::from("door_front");
        let options = session.state.store.get(&door).unwrap().options.clone();
        let offered = session.state.offered.clone();
        let history = session.state.history.len();
        let actor = session.state.actor.clone();

        // The door changes before the clock overflows at the end of the turn.
        let open = command(&entry(&session, "open", None, Some("door_front")));
        let outcome = session.act(&open);
        assert!(matches!(outcome, Err(WorldError::ClockOverflow)));

        assert_eq!(session.state.store.get(&door).unwrap().options, options);
        assert_eq!(session.state.clock.minutes(), u64::MAX);
        assert_eq!(session.state.pending, Pending::Idle);
        assert_eq!(session.state.offered, offered);
        assert_eq!(session.state.history.len(), history);
        assert!(session.state.unsent.is_empty());
        assert_eq!(session.state.actor, actor);
    }

    #[test]
    fn unavailable_item_is_refused_without_advancing() {
        let mut session = session();
        session.ready().unwrap();
        let house = session.map().house();
        let elsewhere = if house.x == 0 {
            Position { x: 1, y: house.y }
        } else {
            Position { x: 0, y: house.y }
        };
        session
            .state
            .store
            .place(&InstanceId::from("reader_front"), Placement::Ground(elsewhere))
            .unwrap();
        session.refresh_menu().unwrap();

        session.act(&ActionCommand::bare("give")).unwrap();
        assert_eq!(session.state.pending, Pending::SelectItem { verb: ItemVerb::Give });
        let battery = entry(&session, "give", Some("battery_1"), None);
        assert!(!battery.available);

        let before = session.state.clock.minutes();
        session.act(&command(&battery)).unwrap();
        assert_eq!(session.state.pending, Pending::SelectItem { verb: ItemVerb::Give });
        assert_eq!(session.state.clock.minutes(), before);
        let refusal = session.state.history.back().unwrap();
        assert_eq!(refusal.content.en, "Nothing here accepts it");
    }
}
