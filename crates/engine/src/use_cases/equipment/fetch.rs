//! Fetch equipment data use case.
//!
//! Loads the selected class and background documents and parses their
//! starting equipment.

use std::sync::Arc;

use outfitter_domain::{
    AssumeProficient, EquipmentData, ProficiencyCheck, SelectionContext, SourceEquipment,
    SourceType,
};

use super::error::EquipmentError;
use super::parser::EntryParser;
use crate::entities::{CatalogIndex, Inventory};

/// Fetch equipment data use case.
///
/// Orchestrates: catalog build, source document lookup, entry parsing.
pub struct FetchEquipmentData {
    catalog: Arc<CatalogIndex>,
    inventory: Arc<Inventory>,
    parser: Arc<EntryParser>,
}

impl FetchEquipmentData {
    pub fn new(
        catalog: Arc<CatalogIndex>,
        inventory: Arc<Inventory>,
        parser: Arc<EntryParser>,
    ) -> Self {
        Self {
            catalog,
            inventory,
            parser,
        }
    }

    /// Execute the fetch equipment data use case.
    ///
    /// A source with no selection, or whose document cannot be found, yields
    /// empty equipment. Without a proficiency set every item counts as usable.
    ///
    /// # Returns
    /// * `Ok(EquipmentData)` - Parsed equipment for class and background
    /// * `Err(EquipmentError)` - Starting equipment is malformed
    pub async fn execute(&self, ctx: &SelectionContext) -> Result<EquipmentData, EquipmentError> {
        if let Err(e) = self.catalog.initialize().await {
            tracing::warn!(error = %e, "Catalog unavailable; category entries will offer nothing");
        }

        let proficiency: &(dyn ProficiencyCheck + Sync) = match &ctx.proficiencies {
            Some(set) => set,
            None => &AssumeProficient,
        };

        let mut data = EquipmentData::default();
        for source in SourceType::ALL {
            let Some(selection) = ctx.source(source) else {
                tracing::debug!(source = %source, "No selection for source");
                continue;
            };
            let Some(document) = self.inventory.resolve(&selection.uuid).await else {
                tracing::warn!(source = %source, uuid = %selection.uuid, "Selected document not found");
                continue;
            };

            let entries = document.starting_equipment()?;
            let nodes = self.parser.parse(&entries, proficiency).await?;
            tracing::debug!(
                source = %source,
                document = %document.name,
                entries = entries.len(),
                roots = nodes.len(),
                "Parsed starting equipment"
            );

            *data.source_mut(source) = SourceEquipment {
                nodes,
                wealth_formula: document.wealth_formula(),
            };
        }

        Ok(data)
    }
}
