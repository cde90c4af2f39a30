//! Lock hardware: classic keys and locks, electronic cards and readers, keypads.

use storymaker_types::{LocalizedText, QuantityName};

use crate::definition::{ActionSpec, EntityKind};

use super::verbs;

/// The `house_locks_classic_key` entity type.
pub struct Key;

const KEY_ACTIONS: &[ActionSpec<()>] = &[verbs::throw()];

impl EntityKind for Key {
    const TYPE_ID: &'static str = "house_locks_classic_key";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Key", "Clé"),
            many: LocalizedText::new("Keys", "Clés"),
        }
    }

    fn init((): ()) {}

    fn actions() -> &'static [ActionSpec<()>] {
        KEY_ACTIONS
    }
}

/// The `house_locks_classic_lock` entity type.
pub struct ClassicLock;

impl EntityKind for ClassicLock {
    const TYPE_ID: &'static str = "house_locks_classic_lock";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Lock", "Serrure"),
            many: LocalizedText::new("Locks", "Serrures"),
        }
    }

    fn init((): ()) {}
}

/// The `house_locks_electronic_card` entity type.
pub struct Card;

const CARD_ACTIONS: &[ActionSpec<()>] = &[verbs::throw()];

impl EntityKind for Card {
    const TYPE_ID: &'static str = "house_locks_electronic_card";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Card", "Carte"),
            many: LocalizedText::new("Cards", "Cartes"),
        }
    }

    fn init((): ()) {}

    fn actions() -> &'static [ActionSpec<()>] {
        CARD_ACTIONS
    }
}

/// The `house_locks_electronic_reader` entity type.
pub struct Reader;

impl EntityKind for Reader {
    const TYPE_ID: &'static str = "house_locks_electronic_reader";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Reader", "Lecteur"),
            many: LocalizedText::new("Readers", "Lecteurs"),
        }
    }

    fn init((): ()) {}
}

/// The `house_locks_keypad` entity type.
pub struct Keypad;

impl EntityKind for Keypad {
    const TYPE_ID: &'static str = "house_locks_keypad";
    type Options = ();
    type Overrides = ();

    fn name() -> QuantityName {
        QuantityName {
            one: LocalizedText::new("Keypad", "Clavier à code"),
            many: LocalizedText::new("Keypads", "Claviers à code"),
        }
    }

    fn init((): ()) {}
}
