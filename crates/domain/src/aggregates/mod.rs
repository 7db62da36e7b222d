//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Returns domain events from mutations

pub mod selection_form;

pub use selection_form::{
    Control, ControlKind, EquipmentPick, FormEvent, OrGroupState, SelectionForm, SourcePanel,
    WealthRequest, WealthToggleState,
};
