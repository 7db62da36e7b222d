//! Engine configuration from environment variables.

use std::path::PathBuf;

use anyhow::Context;
use outfitter_domain::{FocusAllowList, ItemRef, SourceId};

const DEFAULT_CONTENT_PATH: &str = "./content";
const DEFAULT_BASE_CURRENCY: &str = "gp";

/// Settings the host would otherwise store for the plugin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Directory of JSON item packs
    pub content_path: PathBuf,
    /// Sources to index; empty means every source the provider lists
    pub item_sources: Vec<SourceId>,
    pub focus_items: FocusAllowList,
    pub base_currency: String,
    /// Post wealth rolls to public chat
    pub broadcast_wealth_rolls: bool,
    pub class_uuid: Option<ItemRef>,
    pub background_uuid: Option<ItemRef>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            content_path: PathBuf::from(DEFAULT_CONTENT_PATH),
            item_sources: Vec::new(),
            focus_items: FocusAllowList::new(),
            base_currency: DEFAULT_BASE_CURRENCY.to_string(),
            broadcast_wealth_rolls: false,
            class_uuid: None,
            background_uuid: None,
        }
    }
}

impl EngineConfig {
    /// Load from `OUTFITTER_*` environment variables, falling back to defaults.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let content_path = var("OUTFITTER_CONTENT_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONTENT_PATH));

        let item_sources = var("OUTFITTER_ITEM_SOURCES")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(SourceId::new)
                    .collect()
            })
            .unwrap_or_default();

        let focus_items = match var("OUTFITTER_FOCUS_ITEMS") {
            Some(spec) => FocusAllowList::parse(&spec).context("Invalid OUTFITTER_FOCUS_ITEMS")?,
            None => FocusAllowList::new(),
        };

        let base_currency = var("OUTFITTER_BASE_CURRENCY")
            .map(|c| c.to_lowercase())
            .unwrap_or_else(|| DEFAULT_BASE_CURRENCY.to_string());

        let broadcast_wealth_rolls = match var("OUTFITTER_BROADCAST_WEALTH_ROLLS") {
            Some(flag) => parse_flag(&flag)
                .with_context(|| format!("Invalid OUTFITTER_BROADCAST_WEALTH_ROLLS: {}", flag))?,
            None => false,
        };

        Ok(Self {
            content_path,
            item_sources,
            focus_items,
            base_currency,
            broadcast_wealth_rolls,
            class_uuid: var("OUTFITTER_CLASS_UUID").map(ItemRef::new),
            background_uuid: var("OUTFITTER_BACKGROUND_UUID").map(ItemRef::new),
        })
    }
}

fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("expected a boolean, got '{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> anyhow::Result<EngineConfig> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EngineConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_gives_defaults() {
        assert_eq!(config_from(&[]).unwrap(), EngineConfig::default());
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("OUTFITTER_CONTENT_PATH", "/srv/packs"),
            ("OUTFITTER_ITEM_SOURCES", "weapons, armor,,tools"),
            ("OUTFITTER_FOCUS_ITEMS", "arcane=crystal,orb;holy=amulet"),
            ("OUTFITTER_BASE_CURRENCY", "GP"),
            ("OUTFITTER_BROADCAST_WEALTH_ROLLS", "yes"),
            ("OUTFITTER_CLASS_UUID", "Compendium.classes.fighter"),
        ])
        .unwrap();

        assert_eq!(config.content_path, PathBuf::from("/srv/packs"));
        assert_eq!(
            config.item_sources,
            vec![
                SourceId::new("weapons"),
                SourceId::new("armor"),
                SourceId::new("tools")
            ]
        );
        assert!(config.focus_items.permits("arcane", "orb"));
        assert_eq!(config.base_currency, "gp");
        assert!(config.broadcast_wealth_rolls);
        assert_eq!(
            config.class_uuid,
            Some(ItemRef::new("Compendium.classes.fighter"))
        );
        assert_eq!(config.background_uuid, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config_from(&[("OUTFITTER_BROADCAST_WEALTH_ROLLS", "maybe")]).is_err());
        assert!(config_from(&[("OUTFITTER_FOCUS_ITEMS", "arcane")]).is_err());
    }
}
