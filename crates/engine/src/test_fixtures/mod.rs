//! Test fixtures for engine tests.
//!
//! - `item_source` - In-memory `ItemSourcePort` plus item document builders
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::test_fixtures::item_source::{standard_source, weapon};
//!
//! #[tokio::test]
//! async fn test_catalog() {
//!     let source = Arc::new(standard_source());
//!     let catalog = CatalogIndex::new(source, Vec::new(), FocusAllowList::new());
//!     catalog.initialize().await.unwrap();
//! }
//! ```

pub mod item_source;

pub use item_source::{
    acolyte_entries, armor, background_doc, class_doc, fighter_entries, focus, gear, magical,
    standard_source, tool, weapon, InMemoryItemSource,
};
