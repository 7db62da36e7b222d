//! Unified error types for the domain layer
//!
//! Provides a common error type for the pure equipment rules: entry-tree
//! parsing, catalog classification and selection-form transitions.

use thiserror::Error;

use crate::value_objects::DiceParseError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid field values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Entity not found
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Authoring data groups entries in a way that cannot form a tree
    #[error("Malformed grouping at entry {entry_id}: {reason}")]
    MalformedGrouping { entry_id: String, reason: String },

    /// State transition not allowed
    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),
}

impl DomainError {
    /// Creates a validation error for business rule violations.
    ///
    /// # Example
    /// ```ignore
    /// if !picker.offers(&item) {
    ///     return Err(DomainError::validation("item is not one of the picker's options"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a malformed grouping error for the offending entry
    pub fn malformed_grouping(entry_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedGrouping {
            entry_id: entry_id.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid state transition error
    pub fn invalid_state_transition(msg: impl Into<String>) -> Self {
        Self::InvalidStateTransition(msg.into())
    }

    /// Check if this error means the content itself is unusable.
    pub fn is_authoring_error(&self) -> bool {
        matches!(self, Self::MalformedGrouping { .. })
    }
}

impl From<DiceParseError> for DomainError {
    fn from(err: DiceParseError) -> Self {
        Self::Parse(err.to_string())
    }
}
