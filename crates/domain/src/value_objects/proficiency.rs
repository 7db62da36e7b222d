//! Proficiency filtering for category options.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::entities::{expand_weapon_key, weapon_family_of, CatalogItem, CategoryKind};

/// Decides whether a character can use an item offered by a category entry.
pub trait ProficiencyCheck {
    /// `key` is the category entry's subtype key (`sim`, `simpleM`, `light`, ...).
    fn is_proficient(&self, kind: CategoryKind, key: Option<&str>, item: &CatalogItem) -> bool;
}

/// Accepts every item. Used when the wizard has no proficiency data.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeProficient;

impl ProficiencyCheck for AssumeProficient {
    fn is_proficient(&self, _: CategoryKind, _: Option<&str>, _: &CatalogItem) -> bool {
        true
    }
}

/// Trait keys a character is proficient with.
///
/// Entries may be family aliases (`sim`, `mar`, or the long forms `simple`,
/// `martial`), concrete subtypes (`simpleM`, `light`, `art`), item references
/// or lowercase item names. Concrete subtypes are matched against the
/// offered item's own subtype, so `simpleM` covers a dagger offered by a
/// `sim` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProficiencySet {
    #[serde(default)]
    pub weapons: BTreeSet<String>,
    #[serde(default)]
    pub armor: BTreeSet<String>,
    #[serde(default)]
    pub tools: BTreeSet<String>,
}

impl ProficiencySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weapon(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.weapons.insert(expand_weapon_key(&key).to_string());
        self
    }

    pub fn with_armor(mut self, key: impl Into<String>) -> Self {
        self.armor.insert(key.into());
        self
    }

    pub fn with_tool(mut self, key: impl Into<String>) -> Self {
        self.tools.insert(key.into());
        self
    }

    fn keys_for(&self, kind: CategoryKind) -> Option<&BTreeSet<String>> {
        match kind {
            CategoryKind::Weapon => Some(&self.weapons),
            CategoryKind::Armor => Some(&self.armor),
            CategoryKind::Tool => Some(&self.tools),
            CategoryKind::Focus => None,
        }
    }
}

impl ProficiencyCheck for ProficiencySet {
    fn is_proficient(&self, kind: CategoryKind, key: Option<&str>, item: &CatalogItem) -> bool {
        // Foci have no proficiency concept
        let Some(keys) = self.keys_for(kind) else {
            return true;
        };

        let covers = |subtype: &str| {
            let subtype = match kind {
                CategoryKind::Weapon => expand_weapon_key(subtype),
                _ => subtype,
            };
            keys.contains(subtype)
                || (kind == CategoryKind::Weapon
                    && weapon_family_of(subtype).is_some_and(|family| keys.contains(family)))
        };

        key.is_some_and(covers)
            || item.subtype.as_deref().is_some_and(covers)
            || keys.contains(item.uuid.as_str())
            || keys.contains(&item.name.to_lowercase())
    }
}
