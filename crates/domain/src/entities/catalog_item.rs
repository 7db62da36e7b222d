//! Catalog items and their classification into option buckets.
//!
//! Item sources expose a lightweight summary per item. A summary lands in at
//! most one `(CategoryKind, subtype)` bucket; magical items and natural
//! weapons never land anywhere.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::RawEntry;
use crate::error::DomainError;
use crate::ids::ItemRef;

/// Property tag marking an item as magical.
pub const MAGICAL_PROPERTY: &str = "mgc";

/// Weapon subtype used for innate attacks (claws, bites).
pub const NATURAL_WEAPON: &str = "natural";

/// Armor subtypes that put equipment into the armor bucket.
pub const ARMOR_SUBTYPES: [&str; 4] = ["light", "medium", "heavy", "shield"];

/// Index fields requested from item sources.
pub const SUMMARY_FIELDS: &[&str] = &[
    "system.type.value",
    "system.type.baseItem",
    "system.properties",
    "system.focus",
    "img",
];

/// Weapon-family aliases and the buckets they union.
pub static WEAPON_ALIASES: [(&str, [&str; 2]); 2] = [
    ("sim", ["simpleM", "simpleR"]),
    ("mar", ["martialM", "martialR"]),
];

/// Buckets an alias key stands for, if it is an alias.
pub fn weapon_alias(key: &str) -> Option<&'static [&'static str; 2]> {
    WEAPON_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, members)| members)
}

/// Normalize long-form weapon family names to the catalog's keys.
pub fn expand_weapon_key(key: &str) -> &str {
    match key {
        "simple" => "sim",
        "martial" => "mar",
        "simpleMelee" => "simpleM",
        "simpleRanged" => "simpleR",
        "martialMelee" => "martialM",
        "martialRanged" => "martialR",
        other => other,
    }
}

/// The family alias a concrete weapon subtype belongs to.
pub fn weapon_family_of(subtype: &str) -> Option<&'static str> {
    WEAPON_ALIASES
        .iter()
        .find(|(_, members)| members.contains(&subtype))
        .map(|(alias, _)| *alias)
}

/// Kind of interchangeable item a category entry offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CategoryKind {
    Weapon,
    Armor,
    Tool,
    Focus,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Tool => "tool",
            Self::Focus => "focus",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weapon" => Ok(Self::Weapon),
            "armor" => Ok(Self::Armor),
            "tool" => Ok(Self::Tool),
            "focus" => Ok(Self::Focus),
            _ => Err(DomainError::parse(format!("Unknown category kind: {}", s))),
        }
    }
}

/// An item as offered to the user. Referenced, never owned, by options.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogItem {
    pub uuid: ItemRef,
    pub name: String,
    pub img: String,
    /// Concrete subtype (`simpleM`, `light`, `music`), when the item has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
}

impl CatalogItem {
    pub fn new(uuid: impl Into<ItemRef>, name: impl Into<String>, img: impl Into<String>) -> Self {
        Self {
            uuid: uuid.into(),
            name: name.into(),
            img: img.into(),
            subtype: None,
        }
    }

    pub fn with_subtype(mut self, subtype: Option<String>) -> Self {
        self.subtype = subtype;
        self
    }
}

/// Stable sort by display name.
pub fn sort_by_name(items: &mut [CatalogItem]) {
    items.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Lightweight index record, read without loading full documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub uuid: ItemRef,
    pub name: String,
    #[serde(default)]
    pub img: String,
    /// Document type ("weapon", "equipment", "tool", ...)
    pub item_type: String,
    #[serde(default)]
    pub subtype: Option<String>,
    #[serde(default)]
    pub base_item: Option<String>,
    #[serde(default)]
    pub properties: BTreeSet<String>,
    /// Declared spellcasting focus type ("arcane", "druidic", "holy")
    #[serde(default)]
    pub focus: Option<String>,
}

impl ItemSummary {
    pub fn is_magical(&self) -> bool {
        self.properties.contains(MAGICAL_PROPERTY)
    }

    pub fn catalog_item(&self) -> CatalogItem {
        CatalogItem::new(self.uuid.clone(), self.name.clone(), self.img.clone())
            .with_subtype(self.subtype.clone())
    }

    /// Bucket this summary belongs to, if any.
    pub fn classify(&self, focus: &FocusAllowList) -> Option<(CategoryKind, String)> {
        if self.is_magical() {
            return None;
        }

        let subtype = self.subtype.as_deref().filter(|s| !s.is_empty());
        match self.item_type.as_str() {
            "weapon" => {
                let subtype = subtype?;
                // Only real base weapons are offered, never one-off variants
                self.base_item.as_deref().filter(|b| !b.is_empty())?;
                if subtype == NATURAL_WEAPON {
                    return None;
                }
                Some((CategoryKind::Weapon, subtype.to_string()))
            }
            "equipment" if subtype.is_some_and(|s| ARMOR_SUBTYPES.contains(&s)) => {
                subtype.map(|s| (CategoryKind::Armor, s.to_string()))
            }
            "tool" if subtype.is_some() => {
                subtype.map(|s| (CategoryKind::Tool, s.to_string()))
            }
            _ => self.classify_focus(focus),
        }
    }

    fn classify_focus(&self, focus: &FocusAllowList) -> Option<(CategoryKind, String)> {
        let ids = self.focus_ids();
        if let Some(declared) = self.focus.as_deref().filter(|f| !f.is_empty()) {
            if focus.restricts(declared) && !ids.iter().any(|id| focus.permits(declared, id)) {
                return None;
            }
            return Some((CategoryKind::Focus, declared.to_string()));
        }
        ids.iter()
            .find_map(|id| focus.focus_type_for(id))
            .map(|focus_type| (CategoryKind::Focus, focus_type.to_string()))
    }

    fn focus_ids(&self) -> Vec<&str> {
        let mut ids = vec![self.uuid.as_str()];
        if let Some(base) = self.base_item.as_deref() {
            ids.push(base);
        }
        ids
    }
}

/// Configured focus types and the item ids allowed to serve as each.
///
/// A focus type with no entry here accepts any item that declares it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusAllowList(BTreeMap<String, BTreeSet<String>>);

impl FocusAllowList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow(mut self, focus_type: impl Into<String>, item_id: impl Into<String>) -> Self {
        self.0
            .entry(focus_type.into())
            .or_default()
            .insert(item_id.into());
        self
    }

    pub fn restricts(&self, focus_type: &str) -> bool {
        self.0.get(focus_type).is_some_and(|ids| !ids.is_empty())
    }

    pub fn permits(&self, focus_type: &str, item_id: &str) -> bool {
        self.0
            .get(focus_type)
            .is_some_and(|ids| ids.contains(item_id))
    }

    pub fn focus_type_for(&self, item_id: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(_, ids)| ids.contains(item_id))
            .map(|(focus_type, _)| focus_type.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse `arcane=crystal,orb;holy=amulet,emblem`.
    pub fn parse(spec: &str) -> Result<Self, DomainError> {
        let mut list = Self::new();
        for group in spec.split(';').map(str::trim).filter(|g| !g.is_empty()) {
            let (focus_type, ids) = group.split_once('=').ok_or_else(|| {
                DomainError::parse(format!("Focus allow-list group '{}' lacks '='", group))
            })?;
            let focus_type = focus_type.trim();
            if focus_type.is_empty() {
                return Err(DomainError::parse("Focus allow-list group has no focus type"));
            }
            for id in ids.split(',').map(str::trim).filter(|id| !id.is_empty()) {
                list = list.allow(focus_type, id);
            }
        }
        Ok(list)
    }
}

/// A full item document as the host stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceItem {
    pub uuid: ItemRef,
    pub name: String,
    #[serde(default)]
    pub img: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default)]
    pub system: serde_json::Value,
}

impl SourceItem {
    pub fn catalog_item(&self) -> CatalogItem {
        CatalogItem::new(self.uuid.clone(), self.name.clone(), self.img.clone())
            .with_subtype(self.summarize().subtype)
    }

    /// Build the index record the same way a host index would.
    pub fn summarize(&self) -> ItemSummary {
        let text = |pointer: &str| {
            self.system
                .pointer(pointer)
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        // Properties are either a list of tags or a map of tag -> enabled
        let properties = match self.system.get("properties") {
            Some(serde_json::Value::Array(tags)) => tags
                .iter()
                .filter_map(|t| t.as_str().map(str::to_string))
                .collect(),
            Some(serde_json::Value::Object(flags)) => flags
                .iter()
                .filter(|(_, on)| on.as_bool().unwrap_or(false))
                .map(|(tag, _)| tag.clone())
                .collect(),
            _ => BTreeSet::new(),
        };

        ItemSummary {
            uuid: self.uuid.clone(),
            name: self.name.clone(),
            img: self.img.clone(),
            item_type: self.item_type.clone(),
            subtype: text("/type/value"),
            base_item: text("/type/baseItem"),
            properties,
            focus: text("/focus"),
        }
    }

    /// Starting-equipment records carried by class and background documents.
    pub fn starting_equipment(&self) -> Result<Vec<RawEntry>, DomainError> {
        match self.system.get("startingEquipment") {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| {
                DomainError::parse(format!(
                    "Invalid starting equipment on {}: {}",
                    self.uuid, e
                ))
            }),
        }
    }

    /// Starting-wealth dice formula, if the document offers one.
    pub fn wealth_formula(&self) -> Option<String> {
        self.system
            .get("wealth")
            .and_then(|v| match v {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
    }
}
