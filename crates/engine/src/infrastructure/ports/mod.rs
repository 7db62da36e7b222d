//! Port traits for the host services the engine consumes.
//!
//! Entities and use cases are concrete types; only host collaborators sit
//! behind traits: item sources, dice, chat, labels and enrichment, and
//! randomness for the built-in roller.

mod error;
mod external;
mod testing;

pub use error::{ChatError, EnrichError, RollError, SourceError};

// =============================================================================
// External Service Ports
// =============================================================================
pub use external::{
    ChatPort, EnrichmentPort, ItemSourcePort, LabelPort, RollOutcome, RollPort,
};

// =============================================================================
// Test-Only Mocks (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use external::{
    MockChatPort, MockEnrichmentPort, MockItemSourcePort, MockLabelPort, MockRollPort,
};

#[cfg(test)]
pub use testing::MockRandomPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::RandomPort;
