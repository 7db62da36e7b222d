//! Outfitter domain: pure starting-equipment rules.
//!
//! Everything here is synchronous and free of I/O. Item lookups, dice and
//! text rendering live behind ports in `outfitter-engine`.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod ids;
pub mod value_objects;

pub use aggregates::{
    Control, ControlKind, EquipmentPick, FormEvent, OrGroupState, SelectionForm, SourcePanel,
    WealthRequest, WealthToggleState,
};

pub use entities::{
    expand_weapon_key, presentation_roots, sort_by_name, weapon_alias, weapon_family_of,
    CatalogItem, CategoryKind, EntryForest, EntryKind, EntryTree, EquipmentData,
    EquipmentEntryNode, FocusAllowList, ForestIssue, ItemSummary, LinkedItem, NodeOptions,
    RawEntry, SourceEquipment, SourceItem, SUMMARY_FIELDS,
};

pub use error::DomainError;

pub use ids::{EntryId, ItemRef, SourceId};

pub use value_objects::{
    AssumeProficient, CollectOptions, CurrencyGrant, DiceFormula, DiceParseError,
    DiceRollResult, ProficiencyCheck, ProficiencySet, SelectionContext, SelectionEntry,
    SelectionRef, SourceType, WealthSelection,
};
