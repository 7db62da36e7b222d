//! Starting-equipment entries: the flat authoring records and the resolved tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::{CatalogItem, CategoryKind};
use crate::error::DomainError;
use crate::ids::{EntryId, ItemRef};
use crate::value_objects::SourceType;

/// Kind tag of a starting-equipment entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "linked")]
    Linked,
    #[serde(rename = "weapon")]
    Weapon,
    #[serde(rename = "armor")]
    Armor,
    #[serde(rename = "tool")]
    Tool,
    #[serde(rename = "focus")]
    Focus,
    #[serde(rename = "currency")]
    Currency,
}

impl EntryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Linked => "linked",
            Self::Weapon => "weapon",
            Self::Armor => "armor",
            Self::Tool => "tool",
            Self::Focus => "focus",
            Self::Currency => "currency",
        }
    }

    /// AND and OR combine child entries and grant nothing themselves.
    pub fn is_grouping(&self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    pub fn category(&self) -> Option<CategoryKind> {
        match self {
            Self::Weapon => Some(CategoryKind::Weapon),
            Self::Armor => Some(CategoryKind::Armor),
            Self::Tool => Some(CategoryKind::Tool),
            Self::Focus => Some(CategoryKind::Focus),
            _ => None,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AND" => Ok(Self::And),
            "OR" => Ok(Self::Or),
            "linked" => Ok(Self::Linked),
            "weapon" => Ok(Self::Weapon),
            "armor" => Ok(Self::Armor),
            "tool" => Ok(Self::Tool),
            "focus" => Ok(Self::Focus),
            "currency" => Ok(Self::Currency),
            _ => Err(DomainError::parse(format!("Unknown entry kind: {}", s))),
        }
    }
}

/// A starting-equipment record as authored in class/background documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEntry {
    #[serde(rename = "_id")]
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Id of the containing AND/OR entry
    #[serde(default)]
    pub group: Option<EntryId>,
    /// Item reference (linked), category subtype (weapon/armor/tool/focus)
    /// or denomination (currency)
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub requires_proficiency: bool,
    /// Curated item references restricting a category entry
    #[serde(default)]
    pub options: Option<Vec<ItemRef>>,
    /// Linked item offered behind a checkbox instead of always granted
    #[serde(default)]
    pub optional: bool,
    /// Default-selected branch inside an OR entry
    #[serde(default)]
    pub default: bool,
}

impl RawEntry {
    pub fn new(id: impl Into<EntryId>, kind: EntryKind) -> Self {
        Self {
            id: id.into(),
            kind,
            group: None,
            key: None,
            count: None,
            requires_proficiency: false,
            options: None,
            optional: false,
            default: false,
        }
    }

    pub fn in_group(mut self, group: impl Into<EntryId>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn requiring_proficiency(mut self) -> Self {
        self.requires_proficiency = true;
        self
    }

    pub fn with_options(mut self, options: Vec<ItemRef>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn as_default(mut self) -> Self {
        self.default = true;
        self
    }

    /// Authored count, with absent or zero counts normalized to one.
    pub fn normalized_count(&self) -> u32 {
        self.count.filter(|c| *c > 0).unwrap_or(1)
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref().filter(|k| !k.is_empty())
    }
}

/// The single fixed item a linked entry grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedItem {
    pub item: CatalogItem,
    /// Rendered as a checkbox the user may clear
    pub optional: bool,
}

/// Resolved options of a category entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum NodeOptions {
    /// Slice of the catalog index for `(kind, key)`
    Catalog { items: Vec<CatalogItem> },
    /// Explicit references authored on the entry
    Curated {
        keys: Vec<ItemRef>,
        items: Vec<CatalogItem>,
    },
}

impl NodeOptions {
    pub fn items(&self) -> &[CatalogItem] {
        match self {
            Self::Catalog { items } | Self::Curated { items, .. } => items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// A node of the resolved starting-equipment tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentEntryNode {
    pub id: EntryId,
    pub kind: EntryKind,
    /// Lookup-only back reference to the containing group
    pub parent_group_id: Option<EntryId>,
    pub count: u32,
    pub requires_proficiency: bool,
    pub key: Option<String>,
    pub default_selected: bool,
    pub children: Vec<EquipmentEntryNode>,
    /// `None` on a linked node means the reference did not resolve
    pub linked_item: Option<LinkedItem>,
    pub options: Option<NodeOptions>,
    pub label: String,
}

impl EquipmentEntryNode {
    /// Build a node with no resolved content from its authoring record.
    pub fn from_raw(raw: &RawEntry, label: impl Into<String>) -> Self {
        Self {
            id: raw.id.clone(),
            kind: raw.kind,
            parent_group_id: raw.group.clone(),
            count: raw.normalized_count(),
            requires_proficiency: raw.requires_proficiency,
            key: raw.key().map(str::to_string),
            default_selected: raw.default,
            children: Vec::new(),
            linked_item: None,
            options: None,
            label: label.into(),
        }
    }

    pub fn is_grouping(&self) -> bool {
        self.kind.is_grouping()
    }

    /// Whether the node has anything to show.
    ///
    /// Linked nodes whose item failed to resolve are kept in the data but
    /// omitted from rendering.
    pub fn is_renderable(&self) -> bool {
        !(self.kind == EntryKind::Linked && self.linked_item.is_none())
    }

    /// Depth-first search by id.
    pub fn find(&self, id: &EntryId) -> Option<&EquipmentEntryNode> {
        if &self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    /// Number of nodes in this subtree, including itself.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(|c| c.len()).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Roots as presented to the user.
///
/// A lone top-level AND with children is unwrapped so the user does not see
/// a redundant grouping header. The tree itself is left untouched.
pub fn presentation_roots(roots: &[EquipmentEntryNode]) -> &[EquipmentEntryNode] {
    match roots {
        [only] if only.kind == EntryKind::And && !only.children.is_empty() => &only.children,
        _ => roots,
    }
}

/// Parsed starting equipment of one source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceEquipment {
    pub nodes: Vec<EquipmentEntryNode>,
    pub wealth_formula: Option<String>,
}

impl SourceEquipment {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.wealth_formula.is_none()
    }
}

/// Everything the equipment section renders, per source type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentData {
    pub class: SourceEquipment,
    pub background: SourceEquipment,
}

impl EquipmentData {
    pub fn source(&self, source: SourceType) -> &SourceEquipment {
        match source {
            SourceType::Class => &self.class,
            SourceType::Background => &self.background,
        }
    }

    pub fn source_mut(&mut self, source: SourceType) -> &mut SourceEquipment {
        match source {
            SourceType::Class => &mut self.class,
            SourceType::Background => &mut self.background,
        }
    }
}
