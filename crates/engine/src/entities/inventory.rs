//! Inventory entity operations.

use std::sync::Arc;

use outfitter_domain::{ItemRef, SourceItem};

use crate::infrastructure::ports::ItemSourcePort;

/// Full item document lookup.
///
/// Resolves references authored in starting equipment and the items picked
/// in the form.
pub struct Inventory {
    source: Arc<dyn ItemSourcePort>,
}

impl Inventory {
    pub fn new(source: Arc<dyn ItemSourcePort>) -> Self {
        Self { source }
    }

    /// Full document behind `reference`; a failed or empty lookup is logged
    /// and gives `None`.
    pub async fn resolve(&self, reference: &ItemRef) -> Option<SourceItem> {
        match self.source.get_full_item(reference).await {
            Ok(Some(item)) => Some(item),
            Ok(None) => {
                tracing::warn!(reference = %reference, "Item reference did not resolve");
                None
            }
            Err(e) => {
                tracing::warn!(reference = %reference, error = %e, "Item lookup failed");
                None
            }
        }
    }

    /// Resolve references in order, dropping the ones that do not resolve.
    pub async fn resolve_all(&self, references: &[ItemRef]) -> Vec<SourceItem> {
        let mut items = Vec::with_capacity(references.len());
        for reference in references {
            if let Some(item) = self.resolve(reference).await {
                items.push(item);
            }
        }
        items
    }
}
