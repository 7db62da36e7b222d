//! External collaborator ports (item sources, dice, labels, chat).

use async_trait::async_trait;
use outfitter_domain::{EquipmentEntryNode, ItemRef, ItemSummary, SourceId, SourceItem};
use serde::{Deserialize, Serialize};

use super::error::{ChatError, EnrichError, RollError, SourceError};

// =============================================================================
// Item Sources
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemSourcePort: Send + Sync {
    /// Ids of every source the host knows about.
    async fn list_sources(&self) -> Result<Vec<SourceId>, SourceError>;

    /// Lightweight index of one source, limited to `fields`.
    async fn get_summary_index(
        &self,
        source: &SourceId,
        fields: &'static [&'static str],
    ) -> Result<Vec<ItemSummary>, SourceError>;

    /// Full document behind a reference; `None` when nothing matches.
    async fn get_full_item(&self, reference: &ItemRef) -> Result<Option<SourceItem>, SourceError>;
}

// =============================================================================
// Dice
// =============================================================================

/// Result of evaluating a dice formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub total: i64,
    /// Human-readable dice breakdown, e.g. `5d4[1, 2, 3, 4, 4] * 10 = 140`
    pub breakdown: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RollPort: Send + Sync {
    async fn roll(&self, formula: &str) -> Result<RollOutcome, RollError>;
}

// =============================================================================
// Labels
// =============================================================================

/// Produces the human-readable description of an entry.
///
/// Called once per node after its children, linked item and options are
/// resolved; the node's own `label` is still empty at that point.
#[cfg_attr(test, mockall::automock)]
pub trait LabelPort: Send + Sync {
    fn describe(&self, node: &EquipmentEntryNode) -> String;
}

/// Sanitizes and linkifies rich text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrichmentPort: Send + Sync {
    async fn enrich(&self, text: &str) -> Result<String, EnrichError>;
}

// =============================================================================
// Chat
// =============================================================================

/// Public chat, used for optional wealth roll announcements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatPort: Send + Sync {
    async fn broadcast(&self, speaker: &str, content: &str) -> Result<(), ChatError>;
}
