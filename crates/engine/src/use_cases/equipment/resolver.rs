//! Option resolution for category and linked entries.

use std::sync::Arc;

use outfitter_domain::{
    sort_by_name, CatalogItem, CategoryKind, ItemRef, LinkedItem, NodeOptions, ProficiencyCheck,
    RawEntry,
};

use crate::entities::{CatalogIndex, Inventory};

/// Turns category keys and authored references into concrete items.
pub struct OptionResolver {
    catalog: Arc<CatalogIndex>,
    inventory: Arc<Inventory>,
}

impl OptionResolver {
    pub fn new(catalog: Arc<CatalogIndex>, inventory: Arc<Inventory>) -> Self {
        Self { catalog, inventory }
    }

    /// Options of a category entry.
    ///
    /// Authored references win over the catalog; they are resolved in order,
    /// unresolved ones dropped, and the rest sorted by name. Entries that
    /// require proficiency keep only the items `proficiency` accepts.
    pub async fn options(
        &self,
        entry: &RawEntry,
        kind: CategoryKind,
        proficiency: &(dyn ProficiencyCheck + Sync),
    ) -> NodeOptions {
        let mut options = match entry.options.as_ref().filter(|keys| !keys.is_empty()) {
            Some(keys) => {
                let mut items: Vec<CatalogItem> = self
                    .inventory
                    .resolve_all(keys)
                    .await
                    .iter()
                    .map(|doc| doc.catalog_item())
                    .collect();
                sort_by_name(&mut items);
                NodeOptions::Curated {
                    keys: keys.clone(),
                    items,
                }
            }
            None => NodeOptions::Catalog {
                items: self.catalog.get_options(kind, entry.key()).await,
            },
        };

        if entry.requires_proficiency {
            let key = entry.key();
            let (NodeOptions::Catalog { items } | NodeOptions::Curated { items, .. }) = &mut options;
            items.retain(|item| proficiency.is_proficient(kind, key, item));
        }

        if options.is_empty() {
            tracing::debug!(entry = %entry.id, kind = %kind, key = ?entry.key(), "Category entry offers no items");
        }
        options
    }

    /// The item a linked entry grants, or `None` when it does not resolve.
    pub async fn linked_item(&self, entry: &RawEntry) -> Option<LinkedItem> {
        let Some(key) = entry.key() else {
            tracing::warn!(entry = %entry.id, "Linked entry has no item reference");
            return None;
        };
        let doc = self.inventory.resolve(&ItemRef::new(key)).await?;
        Some(LinkedItem {
            item: doc.catalog_item(),
            optional: entry.optional,
        })
    }
}
