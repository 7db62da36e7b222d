//! Catalog index entity.
//!
//! Buckets every usable item of the configured sources by
//! `(category kind, subtype key)`. The index is built privately and
//! published in one step; readers never observe a half-built index.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use outfitter_domain::{
    expand_weapon_key, sort_by_name, weapon_alias, CatalogItem, CategoryKind, FocusAllowList,
    SourceId, SUMMARY_FIELDS,
};
use tokio::sync::{Mutex, RwLock};

use crate::infrastructure::ports::{ItemSourcePort, SourceError};

type BucketKey = (CategoryKind, String);

/// One published build of the index.
///
/// Alias and whole-kind unions are memoized here, so a rebuild can never
/// serve unions computed from an older index.
#[derive(Debug, Default)]
struct CatalogSnapshot {
    buckets: BTreeMap<BucketKey, Vec<CatalogItem>>,
    /// Keyed by alias, or by the empty string for "every bucket of a kind"
    unions: DashMap<BucketKey, Arc<Vec<CatalogItem>>>,
}

impl CatalogSnapshot {
    fn options(&self, kind: CategoryKind, key: Option<&str>) -> Vec<CatalogItem> {
        match key.filter(|k| !k.is_empty()) {
            None => self.union(kind, "", |_| true),
            Some(key) => {
                let key = if kind == CategoryKind::Weapon {
                    expand_weapon_key(key)
                } else {
                    key
                };
                match weapon_alias(key).filter(|_| kind == CategoryKind::Weapon) {
                    Some(members) => self.union(kind, key, |subtype| members.contains(&subtype)),
                    None => self
                        .buckets
                        .get(&(kind, key.to_string()))
                        .cloned()
                        .unwrap_or_default(),
                }
            }
        }
    }

    fn union(
        &self,
        kind: CategoryKind,
        memo_key: &str,
        includes: impl Fn(&str) -> bool,
    ) -> Vec<CatalogItem> {
        let memo = self
            .unions
            .entry((kind, memo_key.to_string()))
            .or_insert_with(|| {
                let mut seen = HashSet::new();
                let mut items: Vec<CatalogItem> = self
                    .buckets
                    .iter()
                    .filter(|((k, subtype), _)| *k == kind && includes(subtype.as_str()))
                    .flat_map(|(_, items)| items.iter())
                    .filter(|item| seen.insert(item.uuid.clone()))
                    .cloned()
                    .collect();
                sort_by_name(&mut items);
                Arc::new(items)
            })
            .clone();
        memo.as_ref().clone()
    }
}

/// Shared, read-mostly index of catalog items.
pub struct CatalogIndex {
    source: Arc<dyn ItemSourcePort>,
    focus_items: FocusAllowList,
    /// Sources to index; empty means every source the provider lists
    sources: RwLock<Vec<SourceId>>,
    snapshot: RwLock<Option<Arc<CatalogSnapshot>>>,
    /// Bumped whenever the index is dropped; a build started under an older
    /// generation is never published
    generation: AtomicU64,
    build_lock: Mutex<()>,
}

impl CatalogIndex {
    pub fn new(
        source: Arc<dyn ItemSourcePort>,
        sources: Vec<SourceId>,
        focus_items: FocusAllowList,
    ) -> Self {
        Self {
            source,
            focus_items,
            sources: RwLock::new(sources),
            snapshot: RwLock::new(None),
            generation: AtomicU64::new(0),
            build_lock: Mutex::new(()),
        }
    }

    pub async fn is_initialized(&self) -> bool {
        self.snapshot.read().await.is_some()
    }

    /// Build the index if it is not built yet.
    ///
    /// Concurrent callers wait for the first build and then return. A source
    /// whose index cannot be read is skipped; only failing to list sources
    /// is an error, and nothing is published in that case. If the index is
    /// cleared or reconfigured while a build is running, that build is
    /// discarded and redone from the current source list.
    pub async fn initialize(&self) -> Result<(), SourceError> {
        if self.is_initialized().await {
            return Ok(());
        }
        let _build = self.build_lock.lock().await;

        loop {
            if self.is_initialized().await {
                return Ok(());
            }

            let generation = self.generation.load(Ordering::Acquire);
            let built = self.build().await?;

            let mut snapshot = self.snapshot.write().await;
            if self.generation.load(Ordering::Acquire) == generation {
                *snapshot = Some(Arc::new(built));
                return Ok(());
            }
            tracing::debug!("Catalog changed during build, rebuilding");
        }
    }

    async fn build(&self) -> Result<CatalogSnapshot, SourceError> {
        let sources = self.sources_to_index().await?;
        let mut buckets: BTreeMap<BucketKey, Vec<CatalogItem>> = BTreeMap::new();
        let mut indexed = 0usize;

        for source in &sources {
            let summaries = match self.source.get_summary_index(source, SUMMARY_FIELDS).await {
                Ok(summaries) => summaries,
                Err(e) => {
                    tracing::warn!(source = %source, error = %e, "Skipping item source");
                    continue;
                }
            };

            for summary in &summaries {
                let Some(bucket) = summary.classify(&self.focus_items) else {
                    continue;
                };
                let items = buckets.entry(bucket).or_default();
                if !items.iter().any(|i| i.uuid == summary.uuid) {
                    items.push(summary.catalog_item());
                    indexed += 1;
                }
            }
        }

        for items in buckets.values_mut() {
            sort_by_name(items);
        }

        tracing::info!(
            sources = sources.len(),
            buckets = buckets.len(),
            items = indexed,
            "Catalog index built"
        );

        Ok(CatalogSnapshot {
            buckets,
            unions: DashMap::new(),
        })
    }

    async fn sources_to_index(&self) -> Result<Vec<SourceId>, SourceError> {
        let configured = self.sources.read().await.clone();
        if !configured.is_empty() {
            return Ok(configured);
        }
        self.source.list_sources().await
    }

    /// Items offered for a category entry.
    ///
    /// A key picks its bucket; the weapon aliases `sim` and `mar` union their
    /// melee and ranged buckets; no key unions every bucket of the kind. An
    /// unknown key, or an index that is not built, gives nothing.
    pub async fn get_options(&self, kind: CategoryKind, key: Option<&str>) -> Vec<CatalogItem> {
        let snapshot = self.snapshot.read().await.clone();
        match snapshot {
            Some(snapshot) => snapshot.options(kind, key),
            None => {
                tracing::debug!(kind = %kind, "Catalog options requested before initialization");
                Vec::new()
            }
        }
    }

    /// Drop memoized unions, and the whole index when `include_index` is set.
    pub async fn clear(&self, include_index: bool) {
        let mut snapshot = self.snapshot.write().await;
        if include_index {
            self.generation.fetch_add(1, Ordering::AcqRel);
            *snapshot = None;
        } else if let Some(current) = snapshot.as_ref() {
            current.unions.clear();
        }
    }

    /// Index a different set of sources from the next `initialize()` on.
    pub async fn reconfigure(&self, sources: Vec<SourceId>) {
        *self.sources.write().await = sources;
        self.clear(true).await;
    }

    #[cfg(test)]
    async fn memoized_unions(&self) -> usize {
        self.snapshot
            .read()
            .await
            .as_ref()
            .map_or(0, |s| s.unions.len())
    }
}
