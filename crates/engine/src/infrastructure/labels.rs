//! Built-in label generation and rich-text enrichment.

use std::sync::LazyLock;

use async_trait::async_trait;
use outfitter_domain::{EntryKind, EquipmentEntryNode, NodeOptions};
use regex_lite::{Captures, Regex};

use crate::infrastructure::ports::{EnrichError, EnrichmentPort, LabelPort};

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(?:script|style)\b[^>]*>.*?</(?:script|style)\s*>").expect("valid regex")
});
static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid regex")
});
static CONTENT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@UUID\[([^\]]+)\](?:\{([^}]*)\})?").expect("valid regex")
});

/// English labels in the style of the host's starting-equipment sheet.
///
/// Linked items are written as `@UUID[ref]{name}` so enrichment turns them
/// into content links.
#[derive(Debug, Default)]
pub struct StandardLabeler;

impl StandardLabeler {
    fn category_phrase(node: &EquipmentEntryNode) -> String {
        if let Some(NodeOptions::Curated { items, .. }) = &node.options {
            let names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
            if !names.is_empty() {
                return join_list(&names, "or");
            }
        }

        let key = node.key.as_deref().unwrap_or_default();
        let noun = match node.kind {
            EntryKind::Weapon => "weapon",
            EntryKind::Armor if key == "shield" => return "any shield".to_string(),
            EntryKind::Armor => "armor",
            EntryKind::Tool => "tool",
            _ => "focus",
        };
        match describe_subtype(key) {
            Some(subtype) => format!("any {} {}", subtype, noun),
            None => format!("any {}", noun),
        }
    }
}

impl LabelPort for StandardLabeler {
    fn describe(&self, node: &EquipmentEntryNode) -> String {
        let label = match node.kind {
            EntryKind::And | EntryKind::Or => {
                let parts: Vec<String> = node
                    .children
                    .iter()
                    .filter(|c| c.is_renderable())
                    .map(|c| c.label.clone())
                    .collect();
                let conjunction = if node.kind == EntryKind::And { "and" } else { "or" };
                return join_list(&parts, conjunction);
            }
            EntryKind::Linked => match &node.linked_item {
                Some(linked) => format!("@UUID[{}]{{{}}}", linked.item.uuid, linked.item.name),
                None => node.key.clone().unwrap_or_default(),
            },
            EntryKind::Currency => {
                let denomination = node.key.as_deref().unwrap_or_default().to_uppercase();
                return format!("{} {}", node.count, denomination);
            }
            _ => Self::category_phrase(node),
        };

        let mut label = if node.count > 1 {
            format!("{}× {}", node.count, label)
        } else {
            label
        };
        if node.requires_proficiency {
            label.push_str(" (if proficient)");
        }
        label
    }
}

fn describe_subtype(key: &str) -> Option<&str> {
    let phrase = match key {
        "" => return None,
        "sim" => "simple",
        "mar" => "martial",
        "simpleM" => "simple melee",
        "simpleR" => "simple ranged",
        "martialM" => "martial melee",
        "martialR" => "martial ranged",
        "art" => "artisan's",
        "music" => "musical",
        "game" => "gaming",
        other => other,
    };
    Some(phrase)
}

/// `a`, `a or b`, `a, b, or c`.
fn join_list(parts: &[String], conjunction: &str) -> String {
    match parts {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{} {} {}", first, conjunction, second),
        [rest @ .., last] => format!("{}, {} {}", rest.join(", "), conjunction, last),
    }
}

/// Strips active content and links `@UUID[...]` references.
#[derive(Debug, Default)]
pub struct StandardEnricher;

impl StandardEnricher {
    pub fn enrich_sync(&self, text: &str) -> String {
        let cleaned = SCRIPT_BLOCK.replace_all(text, "");
        let cleaned = EVENT_HANDLER.replace_all(&cleaned, "");
        CONTENT_LINK
            .replace_all(&cleaned, |caps: &Captures| {
                let reference = &caps[1];
                let label = caps.get(2).map_or(reference, |m| m.as_str());
                format!(
                    r#"<a class="content-link" data-uuid="{}">{}</a>"#,
                    reference, label
                )
            })
            .into_owned()
    }
}

#[async_trait]
impl EnrichmentPort for StandardEnricher {
    async fn enrich(&self, text: &str) -> Result<String, EnrichError> {
        Ok(self.enrich_sync(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outfitter_domain::{CatalogItem, LinkedItem, RawEntry};

    fn node(kind: EntryKind, key: Option<&str>) -> EquipmentEntryNode {
        let mut raw = RawEntry::new("x", kind);
        raw.key = key.map(str::to_string);
        EquipmentEntryNode::from_raw(&raw, "")
    }

    #[test]
    fn weapon_category_labels() {
        let labeler = StandardLabeler;
        assert_eq!(
            labeler.describe(&node(EntryKind::Weapon, Some("sim"))),
            "any simple weapon"
        );
        assert_eq!(
            labeler.describe(&node(EntryKind::Weapon, Some("martialR"))),
            "any martial ranged weapon"
        );
        assert_eq!(labeler.describe(&node(EntryKind::Weapon, None)), "any weapon");
    }

    #[test]
    fn armor_tool_and_currency_labels() {
        let labeler = StandardLabeler;
        assert_eq!(
            labeler.describe(&node(EntryKind::Armor, Some("shield"))),
            "any shield"
        );
        assert_eq!(
            labeler.describe(&node(EntryKind::Tool, Some("music"))),
            "any musical tool"
        );

        let mut gold = node(EntryKind::Currency, Some("gp"));
        gold.count = 10;
        assert_eq!(labeler.describe(&gold), "10 GP");
    }

    #[test]
    fn count_and_proficiency_decorate_the_label() {
        let mut n = node(EntryKind::Weapon, Some("mar"));
        n.count = 2;
        n.requires_proficiency = true;
        assert_eq!(
            StandardLabeler.describe(&n),
            "2× any martial weapon (if proficient)"
        );
    }

    #[test]
    fn grouping_labels_join_children() {
        let mut a = node(EntryKind::Linked, Some("item-1"));
        a.linked_item = Some(LinkedItem {
            item: CatalogItem::new("item-1", "Rope", ""),
            optional: false,
        });
        a.label = "Rope".to_string();
        let mut b = node(EntryKind::Weapon, Some("sim"));
        b.label = "any simple weapon".to_string();
        let mut c = node(EntryKind::Armor, Some("light"));
        c.label = "any light armor".to_string();

        let mut or = node(EntryKind::Or, None);
        or.children = vec![a, b, c];
        assert_eq!(
            StandardLabeler.describe(&or),
            "Rope, any simple weapon, or any light armor"
        );
    }

    #[test]
    fn linked_items_render_as_references() {
        let mut n = node(EntryKind::Linked, Some("Compendium.items.rope"));
        n.linked_item = Some(LinkedItem {
            item: CatalogItem::new("Compendium.items.rope", "Rope", ""),
            optional: false,
        });
        assert_eq!(
            StandardLabeler.describe(&n),
            "@UUID[Compendium.items.rope]{Rope}"
        );
    }

    #[test]
    fn enrichment_links_references() {
        let html = StandardEnricher.enrich_sync("Take @UUID[Compendium.items.rope]{Rope} and @UUID[abc]");
        assert_eq!(
            html,
            r#"Take <a class="content-link" data-uuid="Compendium.items.rope">Rope</a> and <a class="content-link" data-uuid="abc">abc</a>"#
        );
    }

    #[test]
    fn enrichment_strips_active_content() {
        let html = StandardEnricher.enrich_sync(
            r#"<b onclick="steal()">Rope</b><script>alert(1)</script><STYLE>b{}</STYLE>"#,
        );
        assert_eq!(html, "<b>Rope</b>");
    }
}
