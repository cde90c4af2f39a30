//! Type-safe identifier wrappers.
//!
//! Actors are identified by UUID v7 values generated when a session starts.
//! World objects, their types, and their actions are identified by stable
//! human-readable keys (`house_door`, `key_brass`, `open`) because those keys
//! travel over the wire and are echoed back by the client verbatim.

use core::borrow::Borrow;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

/// Generates a newtype wrapper around a stable string key.
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub String);

        impl $name {
            /// Create a key from any string-like value.
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Borrow the key as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an actor (the person driving a session).
    ActorId
}

define_key! {
    /// Stable identifier of a registered entity type (e.g. `house_door`).
    EntityTypeId
}

define_key! {
    /// Identifier of one live entity instance in a world (e.g. `key_brass`).
    InstanceId
}

define_key! {
    /// Identifier of an action within a menu (e.g. `open`, `use`, `move_north`).
    ActionId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actor_ids_are_unique() {
        assert_ne!(ActorId::new(), ActorId::new());
        assert_ne!(ActorId::new().into_inner(), Uuid::nil());
    }

    #[test]
    fn keys_serialize_as_plain_strings() {
        let id = InstanceId::new("key_brass");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"key_brass\""));

        let restored: Result<InstanceId, _> = serde_json::from_str("\"door_front\"");
        assert_eq!(restored.ok(), Some(InstanceId::from("door_front")));
    }

    #[test]
    fn key_display_is_the_raw_key() {
        assert_eq!(ActionId::from("open").to_string(), "open");
        assert_eq!(EntityTypeId::new("house_door").as_str(), "house_door");
    }

    #[test]
    fn keys_can_be_looked_up_by_str() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(InstanceId::from("bandage_1"), 1_u32);
        assert_eq!(map.get("bandage_1"), Some(&1));
    }
}
