//! Domain entities - catalog items and starting-equipment entries

mod catalog_item;
mod entry_forest;
mod equipment_entry;

pub use catalog_item::{
    expand_weapon_key, sort_by_name, weapon_alias, weapon_family_of, CatalogItem, CategoryKind,
    FocusAllowList, ItemSummary, SourceItem, ARMOR_SUBTYPES, MAGICAL_PROPERTY, NATURAL_WEAPON,
    SUMMARY_FIELDS, WEAPON_ALIASES,
};
pub use entry_forest::{EntryForest, EntryTree, ForestIssue};
pub use equipment_entry::{
    presentation_roots, EntryKind, EquipmentData, EquipmentEntryNode, LinkedItem, NodeOptions,
    RawEntry, SourceEquipment,
};
