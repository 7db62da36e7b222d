//! In-memory item source for tests.
//!
//! Holds item documents per source id and can mark sources as failing, so
//! catalog and resolver tests run without a host or a content directory.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use outfitter_domain::{EntryKind, ItemRef, ItemSummary, RawEntry, SourceId, SourceItem};
use serde_json::json;

use crate::infrastructure::ports::{ItemSourcePort, SourceError};

/// `ItemSourcePort` over documents kept in memory.
#[derive(Debug, Default)]
pub struct InMemoryItemSource {
    packs: BTreeMap<SourceId, Vec<SourceItem>>,
    failing: BTreeSet<SourceId>,
    index_reads: AtomicUsize,
}

impl InMemoryItemSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, source: &str, item: SourceItem) -> Self {
        self.packs.entry(SourceId::new(source)).or_default().push(item);
        self
    }

    /// A listed source whose index cannot be read.
    pub fn with_failing_source(mut self, source: &str) -> Self {
        self.failing.insert(SourceId::new(source));
        self
    }

    pub fn find(&self, reference: &ItemRef) -> Option<SourceItem> {
        self.packs
            .values()
            .flatten()
            .find(|item| &item.uuid == reference)
            .cloned()
    }

    /// How many summary indexes have been read so far.
    pub fn index_reads(&self) -> usize {
        self.index_reads.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ItemSourcePort for InMemoryItemSource {
    async fn list_sources(&self) -> Result<Vec<SourceId>, SourceError> {
        let listed: BTreeSet<SourceId> = self
            .packs
            .keys()
            .chain(self.failing.iter())
            .cloned()
            .collect();
        Ok(listed.into_iter().collect())
    }

    async fn get_summary_index(
        &self,
        source: &SourceId,
        _fields: &'static [&'static str],
    ) -> Result<Vec<ItemSummary>, SourceError> {
        self.index_reads.fetch_add(1, Ordering::Relaxed);
        if self.failing.contains(source) {
            return Err(SourceError::unavailable(source, "pack is locked"));
        }
        let items = self
            .packs
            .get(source)
            .ok_or_else(|| SourceError::unavailable(source, "no such pack"))?;
        Ok(items.iter().map(SourceItem::summarize).collect())
    }

    async fn get_full_item(&self, reference: &ItemRef) -> Result<Option<SourceItem>, SourceError> {
        Ok(self.find(reference))
    }
}

// =============================================================================
// Document builders
// =============================================================================

fn document(uuid: &str, name: &str, item_type: &str, system: serde_json::Value) -> SourceItem {
    SourceItem {
        uuid: ItemRef::new(uuid),
        name: name.to_string(),
        img: format!("icons/{}.webp", name.to_lowercase().replace(' ', "-")),
        item_type: item_type.to_string(),
        system,
    }
}

pub fn weapon(uuid: &str, name: &str, subtype: &str, base_item: &str) -> SourceItem {
    document(
        uuid,
        name,
        "weapon",
        json!({"type": {"value": subtype, "baseItem": base_item}, "quantity": 1}),
    )
}

pub fn armor(uuid: &str, name: &str, subtype: &str) -> SourceItem {
    document(uuid, name, "equipment", json!({"type": {"value": subtype}}))
}

pub fn tool(uuid: &str, name: &str, subtype: &str) -> SourceItem {
    document(uuid, name, "tool", json!({"type": {"value": subtype}}))
}

pub fn focus(uuid: &str, name: &str, focus_type: &str) -> SourceItem {
    document(
        uuid,
        name,
        "equipment",
        json!({"type": {"value": "trinket"}, "focus": focus_type}),
    )
}

pub fn gear(uuid: &str, name: &str) -> SourceItem {
    document(uuid, name, "loot", json!({"quantity": 1}))
}

/// Mark a document as magical.
pub fn magical(mut item: SourceItem) -> SourceItem {
    if let Some(system) = item.system.as_object_mut() {
        system.insert("properties".to_string(), json!(["mgc"]));
    }
    item
}

pub fn class_doc(uuid: &str, name: &str, entries: &[RawEntry], wealth: Option<&str>) -> SourceItem {
    document(
        uuid,
        name,
        "class",
        json!({"startingEquipment": entries, "wealth": wealth}),
    )
}

pub fn background_doc(
    uuid: &str,
    name: &str,
    entries: &[RawEntry],
    wealth: Option<&str>,
) -> SourceItem {
    document(
        uuid,
        name,
        "background",
        json!({"startingEquipment": entries, "wealth": wealth}),
    )
}

/// Fighter starting equipment:
///
/// ```text
/// A  AND
/// ├─ B  OR
/// │  ├─ C  linked Chain Mail (default)
/// │  └─ D  AND
/// │     ├─ D1 linked Leather Armor
/// │     └─ D2 linked Longbow
/// ├─ E  weapon "mar"
/// ├─ F  linked Torch ×5
/// └─ G  currency 10 gp
/// ```
pub fn fighter_entries() -> Vec<RawEntry> {
    vec![
        RawEntry::new("A", EntryKind::And),
        RawEntry::new("B", EntryKind::Or).in_group("A"),
        RawEntry::new("C", EntryKind::Linked)
            .in_group("B")
            .with_key("Compendium.armor.chain-mail")
            .as_default(),
        RawEntry::new("D", EntryKind::And).in_group("B"),
        RawEntry::new("D1", EntryKind::Linked)
            .in_group("D")
            .with_key("Compendium.armor.leather"),
        RawEntry::new("D2", EntryKind::Linked)
            .in_group("D")
            .with_key("Compendium.weapons.longbow"),
        RawEntry::new("E", EntryKind::Weapon).in_group("A").with_key("mar"),
        RawEntry::new("F", EntryKind::Linked)
            .in_group("A")
            .with_key("Compendium.gear.torch")
            .with_count(5),
        RawEntry::new("G", EntryKind::Currency)
            .in_group("A")
            .with_key("gp")
            .with_count(10),
    ]
}

/// Acolyte starting equipment: an optional rope, a curated musical
/// instrument and 15 gp.
pub fn acolyte_entries() -> Vec<RawEntry> {
    vec![
        RawEntry::new("H", EntryKind::Linked)
            .with_key("Compendium.gear.rope")
            .optional(),
        RawEntry::new("I", EntryKind::Tool)
            .with_key("music")
            .with_options(vec![
                ItemRef::new("Compendium.tools.lute"),
                ItemRef::new("Compendium.tools.missing-drum"),
            ]),
        RawEntry::new("J", EntryKind::Currency)
            .with_key("GP")
            .with_count(15),
    ]
}

/// A realistic mix of sources: every category kind, a magical copy, a
/// natural weapon, a variant without a base weapon, and the Fighter and
/// Acolyte documents.
pub fn standard_source() -> InMemoryItemSource {
    InMemoryItemSource::new()
        .with_item("weapons", weapon("Compendium.weapons.dagger", "Dagger", "simpleM", "dagger"))
        .with_item("weapons", weapon("Compendium.weapons.club", "Club", "simpleM", "club"))
        .with_item(
            "weapons",
            weapon("Compendium.weapons.shortbow", "Shortbow", "simpleR", "shortbow"),
        )
        .with_item(
            "weapons",
            weapon("Compendium.weapons.light-crossbow", "Light Crossbow", "simpleR", "lightcrossbow"),
        )
        .with_item(
            "weapons",
            weapon("Compendium.weapons.longsword", "Longsword", "martialM", "longsword"),
        )
        .with_item(
            "weapons",
            weapon("Compendium.weapons.longbow", "Longbow", "martialR", "longbow"),
        )
        .with_item(
            "weapons",
            magical(weapon("Compendium.weapons.dagger-1", "Dagger +1", "simpleM", "dagger")),
        )
        .with_item("weapons", weapon("Compendium.weapons.claw", "Claw", "natural", "claw"))
        .with_item(
            "weapons",
            weapon("Compendium.weapons.ornate-dagger", "Ornate Dagger", "simpleM", ""),
        )
        .with_item("armor", armor("Compendium.armor.leather", "Leather Armor", "light"))
        .with_item("armor", armor("Compendium.armor.chain-mail", "Chain Mail", "heavy"))
        .with_item("armor", armor("Compendium.armor.shield", "Shield", "shield"))
        .with_item("tools", tool("Compendium.tools.lute", "Lute", "music"))
        .with_item("tools", tool("Compendium.tools.smith", "Smith's Tools", "art"))
        .with_item("gear", gear("Compendium.gear.rope", "Rope"))
        .with_item("gear", gear("Compendium.gear.torch", "Torch"))
        .with_item("gear", focus("Compendium.gear.crystal", "Crystal", "arcane"))
        .with_item("gear", focus("Compendium.gear.amulet", "Amulet", "holy"))
        .with_item(
            "classes",
            class_doc(
                "Compendium.classes.fighter",
                "Fighter",
                &fighter_entries(),
                Some("5d4*10"),
            ),
        )
        .with_item(
            "backgrounds",
            background_doc(
                "Compendium.backgrounds.acolyte",
                "Acolyte",
                &acolyte_entries(),
                Some("50"),
            ),
        )
}
