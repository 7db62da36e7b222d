//! Item source over a directory of JSON pack files.
//!
//! Each `<pack>.json` holds `{ "items": [SourceItem, ...] }`;
//! the file stem is the source id. Files are read on demand so edits show up
//! after the next catalog rebuild.

use std::path::PathBuf;

use async_trait::async_trait;
use outfitter_domain::{ItemRef, ItemSummary, SourceId, SourceItem};
use serde::Deserialize;
use tokio::fs;

use crate::infrastructure::ports::{ItemSourcePort, SourceError};

#[derive(Debug, Deserialize)]
struct ItemPack {
    #[serde(default)]
    items: Vec<SourceItem>,
}

/// `ItemSourcePort` backed by JSON files on disk.
pub struct JsonItemSource {
    content_path: PathBuf,
}

impl JsonItemSource {
    pub fn new(content_path: impl Into<PathBuf>) -> Self {
        Self {
            content_path: content_path.into(),
        }
    }

    fn pack_path(&self, source: &SourceId) -> Result<PathBuf, SourceError> {
        let name = source.as_str();
        // Source ids come from configuration; never leave the content directory
        if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(SourceError::unavailable(name, "invalid source id"));
        }
        Ok(self.content_path.join(format!("{}.json", name)))
    }

    async fn read_pack(&self, source: &SourceId) -> Result<ItemPack, SourceError> {
        let path = self.pack_path(source)?;
        let content = fs::read_to_string(&path)
            .await
            .map_err(|e| SourceError::unavailable(source, e))?;
        serde_json::from_str(&content).map_err(|e| SourceError::unavailable(source, e))
    }
}

#[async_trait]
impl ItemSourcePort for JsonItemSource {
    async fn list_sources(&self) -> Result<Vec<SourceId>, SourceError> {
        let mut entries = fs::read_dir(&self.content_path)
            .await
            .map_err(|e| SourceError::unavailable(self.content_path.display(), e))?;

        let mut sources = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| SourceError::unavailable(self.content_path.display(), e))?
        {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sources.push(SourceId::new(stem));
            }
        }
        sources.sort();
        Ok(sources)
    }

    async fn get_summary_index(
        &self,
        source: &SourceId,
        _fields: &'static [&'static str],
    ) -> Result<Vec<ItemSummary>, SourceError> {
        let pack = self.read_pack(source).await?;
        Ok(pack.items.iter().map(SourceItem::summarize).collect())
    }

    async fn get_full_item(&self, reference: &ItemRef) -> Result<Option<SourceItem>, SourceError> {
        for source in self.list_sources().await? {
            let pack = match self.read_pack(&source).await {
                Ok(pack) => pack,
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "Skipping unreadable item pack");
                    continue;
                }
            };
            if let Some(item) = pack.items.into_iter().find(|i| &i.uuid == reference) {
                return Ok(Some(item));
            }
        }
        Ok(None)
    }
}
