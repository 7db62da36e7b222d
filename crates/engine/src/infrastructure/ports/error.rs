//! Error types for port operations.

/// Item source failures. Callers degrade to fewer options, never abort.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    /// The source could not be read at all.
    #[error("Item source {source_id} unavailable: {message}")]
    Unavailable { source_id: String, message: String },

    /// A document was found but could not be decoded.
    #[error("Malformed document {reference}: {message}")]
    Malformed { reference: String, message: String },
}

impl SourceError {
    pub fn unavailable(source_id: impl ToString, message: impl ToString) -> Self {
        Self::Unavailable {
            source_id: source_id.to_string(),
            message: message.to_string(),
        }
    }

    pub fn malformed(reference: impl ToString, message: impl ToString) -> Self {
        Self::Malformed {
            reference: reference.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum RollError {
    #[error("Invalid dice formula '{formula}': {message}")]
    InvalidFormula { formula: String, message: String },
    #[error("Roll failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum EnrichError {
    #[error("Enrichment failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ChatError {
    #[error("Chat unavailable: {0}")]
    Unavailable(String),
}
