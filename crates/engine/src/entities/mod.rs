//! Entity modules - Domain capability encapsulation.
//!
//! Each module wraps operations over an item source port.
//! They provide the building blocks for use cases.

pub mod catalog;
pub mod inventory;

pub use catalog::CatalogIndex;
pub use inventory::Inventory;
