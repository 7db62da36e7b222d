//! Equipment operation errors.

use crate::infrastructure::ports::{RollError, SourceError};
use outfitter_domain::DomainError;

/// Errors that can occur while fetching or collecting equipment.
#[derive(Debug, thiserror::Error)]
pub enum EquipmentError {
    #[error("Equipment data error: {0}")]
    Domain(#[from] DomainError),
    #[error("Item source error: {0}")]
    Source(#[from] SourceError),
    #[error("Roll error: {0}")]
    Roll(#[from] RollError),
}

impl EquipmentError {
    /// Whether the failure comes from broken starting-equipment authoring
    /// rather than from an unavailable collaborator.
    pub fn is_authoring_error(&self) -> bool {
        match self {
            Self::Domain(e) => e.is_authoring_error() || matches!(e, DomainError::Parse(_)),
            Self::Source(SourceError::Malformed { .. }) => true,
            _ => false,
        }
    }
}
