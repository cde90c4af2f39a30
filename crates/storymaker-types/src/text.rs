//! Two-locale display text.
//!
//! The engine never selects a locale itself. Every user-visible string is a
//! [`LocalizedText`] carrying both the English and French rendering, and the
//! client picks the one it displays.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A string available in both supported locales.
///
/// Both fields are always populated together; there is no partially
/// localized text.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct LocalizedText {
    /// English rendering (primary locale).
    pub en: String,
    /// French rendering (secondary locale).
    pub fr: String,
}

impl LocalizedText {
    /// Build a text from its two renderings.
    pub fn new(en: impl Into<String>, fr: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            fr: fr.into(),
        }
    }

    /// Join two texts locale by locale with a separator.
    ///
    /// `Door` joined with `Open` by `": "` yields `Door: Open` / `Porte: Ouvrir`.
    pub fn join(&self, separator: &str, other: &Self) -> Self {
        Self {
            en: format!("{}{separator}{}", self.en, other.en),
            fr: format!("{}{separator}{}", self.fr, other.fr),
        }
    }
}

impl core::fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} / {}", self.en, self.fr)
    }
}

/// Display name of an entity type by quantity.
///
/// Used only for display; never an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct QuantityName {
    /// Name for a single object ("Door").
    pub one: LocalizedText,
    /// Name for several objects ("Doors").
    pub many: LocalizedText,
}

impl QuantityName {
    /// Pick the singular or plural form for `count` objects.
    pub const fn for_count(&self, count: usize) -> &LocalizedText {
        if count == 1 { &self.one } else { &self.many }
    }
}
