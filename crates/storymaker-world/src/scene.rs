//! What the actor can see and do from where they stand.
//!
//! A [`Scene`] borrows the world for the duration of one projection. It
//! builds the three menus of the multi-step protocol (base, item selection,
//! target selection), the inventory affordance flags, and the blockers of
//! session-level actions. Nothing here mutates state.

use storymaker_entities::{
    ActionEngine, ActionOption, EntityInstance, EntityRegistry, TargetMode, TargetRef,
};
use storymaker_types::{
    ActionEntry, ActionId, InstanceId, InventoryItem, ItemVerb, LocalizedText,
};

use crate::actor::ActorState;
use crate::error::WorldError;
use crate::map::{Direction, WorldMap};
use crate::store::{ActorView, Placement, WorldStore};

/// Action id of the entry that aborts a pending selection.
pub const CANCEL: &str = "cancel";

/// Action id of resting.
pub const REST: &str = "rest";

/// Action id of picking up a ground item.
pub const TAKE: &str = "take";

/// Read-only view of one session's world.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Entity types.
    pub registry: &'a EntityRegistry,
    /// Terrain.
    pub map: &'a WorldMap,
    /// Live instances.
    pub store: &'a WorldStore,
    /// The acting player.
    pub actor: &'a ActorState,
}

impl<'a> Scene<'a> {
    const fn engine(&self) -> ActionEngine<'a> {
        ActionEngine::new(self.registry)
    }

    const fn view(&self) -> ActorView<'a> {
        ActorView::new(self.actor.id, self.store)
    }

    /// Display name of an instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance's type is not registered.
    pub fn name_of(&self, instance: &EntityInstance) -> Result<LocalizedText, WorldError> {
        Ok(self.registry.get(&instance.type_id)?.name().one)
    }

    /// Whether the instance is a portable item, i.e. declares an item verb.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance's type is not registered.
    pub fn is_item(&self, instance: &EntityInstance) -> Result<bool, WorldError> {
        Ok(self
            .registry
            .get(&instance.type_id)?
            .declarations()
            .iter()
            .any(|decl| ItemVerb::parse(decl.id).is_some()))
    }

    /// Whether the item's type declares the verb and needs a target for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the instance's type is not registered.
    pub fn verb_target(
        &self,
        item: &EntityInstance,
        verb: ItemVerb,
    ) -> Result<Option<TargetMode>, WorldError> {
        Ok(self
            .engine()
            .declaration(item, verb.as_str())?
            .map(|decl| decl.target))
    }

    /// Instances a targeted verb on `item` may be directed at.
    pub fn target_candidates(&self, item: &EntityInstance) -> Vec<&'a EntityInstance> {
        self.store
            .within_reach(self.actor.position)
            .into_iter()
            .filter(|candidate| candidate.id != item.id)
            .collect()
    }

    fn verb_option(
        &self,
        item: &EntityInstance,
        verb: ItemVerb,
        target: Option<&EntityInstance>,
    ) -> Result<Option<ActionOption>, WorldError> {
        let view = self.view();
        let target = target.map(|t| TargetRef {
            id: &t.id,
            type_id: &t.type_id,
        });
        let menu = self.engine().list_actions(item, &view, target)?;
        Ok(menu
            .into_iter()
            .find(|option| option.id.as_str() == verb.as_str()))
    }

    /// Whether the verb can currently be applied to the item, and if not why.
    ///
    /// Targeted verbs are available when at least one instance within reach
    /// satisfies the condition.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error from the entity layer.
    pub fn verb_blocker(
        &self,
        item: &EntityInstance,
        verb: ItemVerb,
    ) -> Result<Option<LocalizedText>, WorldError> {
        match self.verb_target(item, verb)? {
            None => Ok(Some(LocalizedText::new(
                "This cannot be done with it",
                "Ce n'est pas possible avec cet objet",
            ))),
            Some(TargetMode::None) => Ok(self
                .verb_option(item, verb, None)?
                .and_then(|option| option.reason)),
            Some(TargetMode::Required) => {
                for candidate in self.target_candidates(item) {
                    if self
                        .verb_option(item, verb, Some(candidate))?
                        .is_some_and(|option| option.available)
                    {
                        return Ok(None);
                    }
                }
                Ok(Some(LocalizedText::new(
                    "Nothing here accepts it",
                    "Rien ici ne l'accepte",
                )))
            }
        }
    }

    /// The `inventory` topic payload.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error from the entity layer.
    pub fn inventory(&self) -> Result<Vec<InventoryItem>, WorldError> {
        self.store
            .carried()
            .map(|item| -> Result<InventoryItem, WorldError> {
                let affords = |verb| -> Result<bool, WorldError> {
                    Ok(self.verb_blocker(item, verb)?.is_none())
                };
                Ok(InventoryItem {
                    id: item.id.clone(),
                    name: self.name_of(item)?,
                    usable: affords(ItemVerb::Use)?,
                    giveable: affords(ItemVerb::Give)?,
                    sellable: affords(ItemVerb::Sell)?,
                    throwable: affords(ItemVerb::Throw)?,
                })
            })
            .collect()
    }

    /// Why moving in a direction is impossible, if it is.
    pub fn move_blocker(&self, direction: Direction) -> Option<LocalizedText> {
        if self.actor.is_exhausted() {
            return Some(LocalizedText::new(
                "You are too exhausted to walk",
                "Vous êtes trop épuisé pour marcher",
            ));
        }
        match self
            .map
            .step(self.actor.position, direction)
            .and_then(|to| self.map.terrain(to))
        {
            None => Some(LocalizedText::new(
                "You are at the edge of the world",
                "Vous êtes au bord du monde",
            )),
            Some(terrain) if !terrain.is_walkable() => Some(LocalizedText::new(
                "You cannot swim",
                "Vous ne savez pas nager",
            )),
            Some(_) => None,
        }
    }

    /// Why resting is pointless, if it is.
    pub fn rest_blocker(&self) -> Option<LocalizedText> {
        (self.actor.energy >= self.actor.max_energy)
            .then(|| LocalizedText::new("You are not tired", "Vous n'êtes pas fatigué"))
    }

    /// Why an instance cannot be picked up, if it cannot.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error if the instance does not resolve.
    pub fn take_blocker(&self, id: &InstanceId) -> Result<Option<LocalizedText>, WorldError> {
        let instance = self.store.get(id)?;
        if self.store.placement(id) != Some(&Placement::Ground(self.actor.position)) {
            return Ok(Some(LocalizedText::new(
                "It is not within reach",
                "Ce n'est pas à portée de main",
            )));
        }
        if !self.is_item(instance)? {
            return Ok(Some(LocalizedText::new(
                "It cannot be carried",
                "Cela ne peut pas être porté",
            )));
        }
        Ok(None)
    }

    /// Why a verb's selection cannot be opened, if it cannot.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error from the entity layer.
    pub fn selection_blocker(&self, verb: ItemVerb) -> Result<Option<LocalizedText>, WorldError> {
        for item in self.store.carried() {
            if self.verb_blocker(item, verb)?.is_none() {
                return Ok(None);
            }
        }
        let label = verb.label();
        Ok(Some(LocalizedText::new(
            format!("You have nothing to {}", verb.as_str()),
            format!("Vous n'avez rien à {}", label.fr.to_lowercase()),
        )))
    }

    /// The base action menu.
    ///
    /// Order: moves, pick-ups on the actor's cell, the actions of instances
    /// within reach, rest, then the item verbs opening a selection.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error from the entity layer.
    pub fn base_menu(&self) -> Result<Vec<ActionEntry>, WorldError> {
        let mut entries = Vec::new();

        for direction in Direction::ALL {
            entries.push(entry(direction.action_id(), direction.label(), self.move_blocker(direction)));
        }

        for instance in self.store.on_ground(self.actor.position) {
            if self.is_item(instance)? {
                let label = LocalizedText::new("Take", "Prendre").join(" ", &self.name_of(instance)?);
                entries.push(ActionEntry {
                    target: Some(instance.id.clone()),
                    ..entry(TAKE, label, None)
                });
            }
        }

        let view = self.view();
        for instance in self.store.within_reach(self.actor.position) {
            let name = self.name_of(instance)?;
            for option in self.engine().list_actions(instance, &view, None)? {
                if ItemVerb::parse(option.id.as_str()).is_some() || option.target != TargetMode::None {
                    continue;
                }
                entries.push(ActionEntry {
                    id: option.id,
                    label: name.join(": ", &option.label),
                    available: option.available,
                    reason: option.reason,
                    item: None,
                    target: Some(instance.id.clone()),
                });
            }
        }

        entries.push(entry(
            REST,
            LocalizedText::new("Rest", "Se reposer"),
            self.rest_blocker(),
        ));

        for verb in ItemVerb::ALL {
            entries.push(entry(verb.as_str(), verb.label(), self.selection_blocker(verb)?));
        }
        Ok(entries)
    }

    /// Carried items the verb may apply to, then a cancel entry.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error from the entity layer.
    pub fn item_menu(&self, verb: ItemVerb) -> Result<Vec<ActionEntry>, WorldError> {
        let mut entries = Vec::new();
        for item in self.store.carried() {
            if self.verb_target(item, verb)?.is_none() {
                continue;
            }
            entries.push(ActionEntry {
                item: Some(item.id.clone()),
                ..entry(verb.as_str(), self.name_of(item)?, self.verb_blocker(item, verb)?)
            });
        }
        entries.push(cancel_entry());
        Ok(entries)
    }

    /// Instances within reach the item may be directed at, then a cancel entry.
    ///
    /// # Errors
    ///
    /// Returns a data-integrity error from the entity layer.
    pub fn target_menu(
        &self,
        verb: ItemVerb,
        item: &InstanceId,
    ) -> Result<Vec<ActionEntry>, WorldError> {
        let item = self.store.get(item)?;
        let mut entries = Vec::new();
        for candidate in self.target_candidates(item) {
            let reason = self
                .verb_option(item, verb, Some(candidate))?
                .and_then(|option| option.reason);
            entries.push(ActionEntry {
                item: Some(item.id.clone()),
                target: Some(candidate.id.clone()),
                ..entry(verb.as_str(), self.name_of(candidate)?, reason)
            });
        }
        entries.push(cancel_entry());
        Ok(entries)
    }
}

/// A menu entry without item or target.
fn entry(id: &str, label: LocalizedText, reason: Option<LocalizedText>) -> ActionEntry {
    ActionEntry {
        id: ActionId::from(id),
        label,
        available: reason.is_none(),
        reason,
        item: None,
        target: None,
    }
}

fn cancel_entry() -> ActionEntry {
    entry(CANCEL, LocalizedText::new("Cancel", "Annuler"), None)
}
