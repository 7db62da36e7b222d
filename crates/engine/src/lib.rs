//! Outfitter Engine library.
//!
//! Resolves starting equipment of the selected class and background into
//! selection controls, and collects the items and wealth to grant.
//!
//! ## Structure
//!
//! - `entities/` - Catalog index and item lookup over the item source port
//! - `use_cases/` - Fetching, parsing and collecting equipment
//! - `infrastructure/` - Port traits and built-in adapters
//! - `app` - Application composition

pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod use_cases;

/// Test fixtures module for integration testing.
#[cfg(test)]
pub mod test_fixtures;

pub use app::{App, EquipmentSection, Ports};
