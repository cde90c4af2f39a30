//! Initial world content.
//!
//! Fixtures (the front door with its lock and key, a card reader, and a
//! generator) are placed at the house, a starter kit is carried, and loose
//! resources are scattered over walkable cells chosen by the session seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use storymaker_entities::{EntityInstance, EntityRegistry};
use storymaker_types::{ActorId, Position};
use tracing::debug;

use crate::error::WorldError;
use crate::map::WorldMap;
use crate::store::{Placement, WorldStore};

/// Loose resources scattered on the map, by type and count.
const SCATTERED: &[(&str, &str, u32)] = &[
    ("stone", "resources_stone", 3),
    ("wood", "resources_wood", 3),
    ("water", "resources_water", 2),
];

/// Carried at session start.
const STARTER_KIT: &[(&str, &str)] = &[
    ("bandage_1", "medical_bandage"),
    ("flask_1", "resources_water"),
    ("battery_1", "energy_battery"),
    ("gasoline_1", "chemicals_gasoline"),
];

/// Build the instance table for a new session.
///
/// # Errors
///
/// Returns an error if a seeded type is not registered or a reference does
/// not resolve.
pub fn populate(
    registry: &EntityRegistry,
    map: &WorldMap,
    owner: ActorId,
    seed: u64,
) -> Result<WorldStore, WorldError> {
    let mut store = WorldStore::new();
    let house = Placement::Ground(map.house());
    let none = serde_json::Value::Null;

    let door = EntityInstance::spawn(
        registry,
        "door_front",
        "house_door",
        owner,
        &json!({ "keys": ["key_brass"], "security": 1 }),
    )?
    .with_link("lock", "lock_front");
    store.insert(door, house.clone())?;
    for (id, type_id) in [
        ("lock_front", "house_locks_classic_lock"),
        ("key_brass", "house_locks_classic_key"),
        ("reader_front", "house_locks_electronic_reader"),
        ("generator_shed", "energy_generator"),
    ] {
        store.insert(EntityInstance::spawn(registry, id, type_id, owner, &none)?, house.clone())?;
    }

    for (id, type_id) in STARTER_KIT {
        store.insert(
            EntityInstance::spawn(registry, *id, *type_id, owner, &none)?,
            Placement::Carried,
        )?;
    }

    // Offset the stream so scattering does not mirror map generation.
    let mut rng = StdRng::seed_from_u64(seed.rotate_left(17));
    let spots: Vec<Position> = map
        .walkable()
        .into_iter()
        .filter(|position| *position != map.house())
        .collect();
    for (prefix, type_id, count) in SCATTERED {
        for n in 1..=*count {
            let Some(spot) = pick(&mut rng, &spots) else {
                break;
            };
            let id = format!("{prefix}_{n}");
            store.insert(
                EntityInstance::spawn(registry, id, *type_id, owner, &none)?,
                Placement::Ground(spot),
            )?;
        }
    }

    store.check_references(registry)?;
    debug!(instances = store.len(), seed, "world populated");
    Ok(store)
}

fn pick(rng: &mut StdRng, spots: &[Position]) -> Option<Position> {
    if spots.is_empty() {
        return None;
    }
    spots.get(rng.random_range(0..spots.len())).copied()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use storymaker_entities::objects;
    use storymaker_types::InstanceId;

    use super::*;
    use crate::config::MapConfig;

    #[test]
    fn fixtures_stand_at_the_house() {
        let registry = objects::registry().unwrap();
        let map = WorldMap::generate(5, &MapConfig::default()).unwrap();
        let store = populate(&registry, &map, ActorId::new(), 5).unwrap();

        let at_house: Vec<&str> = store.on_ground(map.house()).map(|i| i.id.as_str()).collect();
        assert_eq!(
            at_house,
            vec!["door_front", "generator_shed", "key_brass", "lock_front", "reader_front"]
        );
        assert_eq!(store.carried().count(), STARTER_KIT.len());
    }

    #[test]
    fn scattered_resources_follow_the_seed() {
        let registry = objects::registry().unwrap();
        let map = WorldMap::generate(9, &MapConfig::default()).unwrap();
        let a = populate(&registry, &map, ActorId::new(), 9).unwrap();
        let b = populate(&registry, &map, ActorId::new(), 9).unwrap();
        let stone = InstanceId::from("stone_1");
        assert!(a.contains(&stone));
        assert_eq!(a.placement(&stone), b.placement(&stone));
        assert!(matches!(a.placement(&stone), Some(Placement::Ground(p)) if *p != map.house()));
    }
}
