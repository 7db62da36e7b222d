//! Collect selections use case.
//!
//! Reads the final form state and builds the items to grant.

use std::sync::Arc;

use outfitter_domain::{CollectOptions, SelectionEntry, SelectionForm};

use crate::entities::Inventory;

/// Collect selections use case.
///
/// Orchestrates: form read, full item lookup, grant assembly.
pub struct CollectSelections {
    inventory: Arc<Inventory>,
}

impl CollectSelections {
    pub fn new(inventory: Arc<Inventory>) -> Self {
        Self { inventory }
    }

    /// Execute the collect selections use case.
    ///
    /// Output follows declaration order: class before background, and per
    /// source pickers, then optional items, then linked items. Items whose
    /// full document cannot be found are dropped.
    pub async fn execute(
        &self,
        form: &SelectionForm,
        options: CollectOptions,
    ) -> Vec<SelectionEntry> {
        let picks = form.equipment_picks(options);
        let mut entries = Vec::with_capacity(picks.len());

        for pick in picks {
            let Some(document) = self.inventory.resolve(&pick.item.uuid).await else {
                tracing::warn!(
                    source = %pick.source,
                    entry = %pick.entry_id,
                    item = %pick.item.uuid,
                    "Dropping selection whose item did not resolve"
                );
                continue;
            };
            entries.push(SelectionEntry {
                uuid: document.uuid,
                name: document.name,
                img: document.img,
                kind: document.item_type,
                quantity: pick.quantity,
                system_data: document.system,
                favorite: pick.favorite.then_some(true),
                source: pick.source,
            });
        }

        tracing::debug!(count = entries.len(), "Collected equipment selections");
        entries
    }
}
