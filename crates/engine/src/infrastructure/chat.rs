//! Chat adapter that writes public messages to the log.

use async_trait::async_trait;

use crate::infrastructure::ports::{ChatError, ChatPort};

/// Stand-in for a host chat log; messages become `info` events.
#[derive(Debug, Default)]
pub struct TracingChat;

#[async_trait]
impl ChatPort for TracingChat {
    async fn broadcast(&self, speaker: &str, content: &str) -> Result<(), ChatError> {
        tracing::info!(target: "outfitter::chat", speaker, "{}", content);
        Ok(())
    }
}
