//! Equipment use cases.
//!
//! Fetching and parsing starting equipment, collecting the final selection
//! and handling starting wealth.

mod collect;
mod error;
mod fetch;
mod parser;
mod resolver;
mod wealth;

#[cfg(test)]
mod scenario_tests;

use std::sync::Arc;

pub use collect::CollectSelections;
pub use error::EquipmentError;
pub use fetch::FetchEquipmentData;
pub use parser::EntryParser;
pub use resolver::OptionResolver;
pub use wealth::{CollectWealth, RollWealth, WealthRoller, WealthSettings};

/// Container for equipment use cases.
pub struct EquipmentUseCases {
    pub fetch: Arc<FetchEquipmentData>,
    pub collect: Arc<CollectSelections>,
    pub collect_wealth: Arc<CollectWealth>,
    pub roll_wealth: Arc<RollWealth>,
}

impl EquipmentUseCases {
    pub fn new(
        fetch: Arc<FetchEquipmentData>,
        collect: Arc<CollectSelections>,
        collect_wealth: Arc<CollectWealth>,
        roll_wealth: Arc<RollWealth>,
    ) -> Self {
        Self {
            fetch,
            collect,
            collect_wealth,
            roll_wealth,
        }
    }
}
