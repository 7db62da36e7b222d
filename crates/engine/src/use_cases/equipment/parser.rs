//! Starting-equipment tree parser.
//!
//! Groups flat records into trees, resolves every entry's items, then
//! labels the nodes bottom-up so group labels can be built from their
//! children.

use std::collections::HashMap;
use std::sync::Arc;

use outfitter_domain::{
    DomainError, EntryForest, EntryId, EntryKind, EntryTree, EquipmentEntryNode, ForestIssue,
    LinkedItem, NodeOptions, ProficiencyCheck, RawEntry,
};

use super::resolver::OptionResolver;
use crate::infrastructure::ports::{EnrichmentPort, LabelPort};

#[derive(Debug, Default)]
struct Resolved {
    linked_item: Option<LinkedItem>,
    options: Option<NodeOptions>,
}

/// Parses authored starting equipment into labeled entry trees.
pub struct EntryParser {
    resolver: Arc<OptionResolver>,
    labels: Arc<dyn LabelPort>,
    enrichment: Arc<dyn EnrichmentPort>,
}

impl EntryParser {
    pub fn new(
        resolver: Arc<OptionResolver>,
        labels: Arc<dyn LabelPort>,
        enrichment: Arc<dyn EnrichmentPort>,
    ) -> Self {
        Self {
            resolver,
            labels,
            enrichment,
        }
    }

    /// Parse flat records into root nodes, children in source order.
    ///
    /// # Errors
    /// `DomainError::MalformedGrouping` for duplicate ids, self references
    /// and group cycles. Every other problem degrades to a warning.
    pub async fn parse(
        &self,
        entries: &[RawEntry],
        proficiency: &(dyn ProficiencyCheck + Sync),
    ) -> Result<Vec<EquipmentEntryNode>, DomainError> {
        let forest = EntryForest::build(entries)?;
        for issue in &forest.issues {
            match issue {
                ForestIssue::UnknownGroup { entry, group } => {
                    tracing::warn!(entry = %entry, group = %group, "Entry names an unknown group; treating it as a root");
                }
                ForestIssue::NonGroupingParent { entry, group } => {
                    tracing::warn!(entry = %entry, group = %group, "Entry's group is not an AND/OR entry; treating it as a root");
                }
                ForestIssue::ZeroCount { entry } => {
                    tracing::warn!(entry = %entry, "Entry has a zero count; using 1");
                }
            }
        }

        let mut resolved: HashMap<EntryId, Resolved> = HashMap::with_capacity(entries.len());
        for entry in entries {
            let content = self.resolve(entry, proficiency).await;
            resolved.insert(entry.id.clone(), content);
        }

        let mut roots: Vec<EquipmentEntryNode> = forest
            .roots
            .iter()
            .map(|tree| self.assemble(tree, &mut resolved))
            .collect();

        // Preorder so a parent's markup is enriched before its children's
        let mut stack: Vec<&mut EquipmentEntryNode> = roots.iter_mut().rev().collect();
        while let Some(node) = stack.pop() {
            node.label = self.enrich(&node.id, &node.label).await;
            stack.extend(node.children.iter_mut().rev());
        }

        Ok(roots)
    }

    async fn resolve(
        &self,
        entry: &RawEntry,
        proficiency: &(dyn ProficiencyCheck + Sync),
    ) -> Resolved {
        match entry.kind {
            EntryKind::Linked => Resolved {
                linked_item: self.resolver.linked_item(entry).await,
                options: None,
            },
            kind => match kind.category() {
                Some(category) => Resolved {
                    linked_item: None,
                    options: Some(self.resolver.options(entry, category, proficiency).await),
                },
                None => Resolved::default(),
            },
        }
    }

    fn assemble(
        &self,
        tree: &EntryTree<'_>,
        resolved: &mut HashMap<EntryId, Resolved>,
    ) -> EquipmentEntryNode {
        let mut node = EquipmentEntryNode::from_raw(tree.entry, "");
        node.children = tree
            .children
            .iter()
            .map(|child| self.assemble(child, resolved))
            .collect();
        if let Some(content) = resolved.remove(&tree.entry.id) {
            node.linked_item = content.linked_item;
            node.options = content.options;
        }
        node.label = self.labels.describe(&node);
        node
    }

    async fn enrich(&self, entry: &EntryId, label: &str) -> String {
        match self.enrichment.enrich(label).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(entry = %entry, error = %e, "Label enrichment failed; using plain label");
                label.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use outfitter_domain::{AssumeProficient, FocusAllowList, ItemRef};

    use crate::entities::{CatalogIndex, Inventory};
    use crate::infrastructure::labels::{StandardEnricher, StandardLabeler};
    use crate::infrastructure::ports::{EnrichError, MockEnrichmentPort, MockLabelPort};
    use crate::test_fixtures::{fighter_entries, standard_source};

    async fn resolver() -> Arc<OptionResolver> {
        let source = Arc::new(standard_source());
        let catalog = Arc::new(CatalogIndex::new(
            source.clone(),
            Vec::new(),
            FocusAllowList::new(),
        ));
        catalog.initialize().await.unwrap();
        Arc::new(OptionResolver::new(catalog, Arc::new(Inventory::new(source))))
    }

    async fn standard_parser() -> EntryParser {
        EntryParser::new(
            resolver().await,
            Arc::new(StandardLabeler),
            Arc::new(StandardEnricher),
        )
    }

    fn ids(nodes: &[EquipmentEntryNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.id.as_str()).collect()
    }

    #[tokio::test]
    async fn when_entries_are_grouped_returns_tree_in_source_order() {
        let parser = standard_parser().await;

        let roots = parser
            .parse(&fighter_entries(), &AssumeProficient)
            .await
            .unwrap();

        assert_eq!(ids(&roots), vec!["A"]);
        assert_eq!(ids(&roots[0].children), vec!["B", "E", "F", "G"]);
        assert_eq!(ids(&roots[0].children[0].children), vec!["C", "D"]);
        assert_eq!(roots[0].len(), 9);
        assert_eq!(
            roots[0].find(&EntryId::new("D2")).map(|n| n.parent_group_id.clone()),
            Some(Some(EntryId::new("D")))
        );
    }

    #[tokio::test]
    async fn when_entries_resolve_nodes_carry_items_and_options() {
        let parser = standard_parser().await;

        let roots = parser
            .parse(&fighter_entries(), &AssumeProficient)
            .await
            .unwrap();
        let root = &roots[0];

        let chain = root.find(&EntryId::new("C")).unwrap();
        assert_eq!(
            chain.linked_item.as_ref().map(|l| l.item.name.as_str()),
            Some("Chain Mail")
        );
        assert!(chain.default_selected);

        let martial = root.find(&EntryId::new("E")).unwrap();
        let names: Vec<&str> = martial
            .options
            .as_ref()
            .unwrap()
            .items()
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Longbow", "Longsword"]);

        let torches = root.find(&EntryId::new("F")).unwrap();
        assert_eq!(torches.count, 5);
    }

    #[tokio::test]
    async fn when_labels_are_generated_they_are_enriched() {
        let parser = standard_parser().await;

        let roots = parser
            .parse(&fighter_entries(), &AssumeProficient)
            .await
            .unwrap();
        let root = &roots[0];

        assert_eq!(
            root.find(&EntryId::new("E")).unwrap().label,
            "any martial weapon"
        );
        assert_eq!(
            root.find(&EntryId::new("F")).unwrap().label,
            r#"5× <a class="content-link" data-uuid="Compendium.gear.torch">Torch</a>"#
        );
        assert_eq!(root.find(&EntryId::new("G")).unwrap().label, "10 GP");
        assert!(root
            .find(&EntryId::new("B"))
            .unwrap()
            .label
            .contains(" or "));
    }

    #[tokio::test]
    async fn when_linked_item_is_missing_node_is_kept_without_item() {
        let parser = standard_parser().await;
        let entries = vec![
            RawEntry::new("A", EntryKind::And),
            RawEntry::new("B", EntryKind::Linked)
                .in_group("A")
                .with_key("Compendium.gear.anvil"),
            RawEntry::new("C", EntryKind::Linked)
                .in_group("A")
                .with_key("Compendium.gear.rope"),
        ];

        let roots = parser.parse(&entries, &AssumeProficient).await.unwrap();

        let missing = roots[0].find(&EntryId::new("B")).unwrap();
        assert!(missing.linked_item.is_none());
        assert!(!missing.is_renderable());
        // Group label skips the unrenderable child
        assert_eq!(
            roots[0].label,
            r#"<a class="content-link" data-uuid="Compendium.gear.rope">Rope</a>"#
        );
    }

    #[tokio::test]
    async fn when_group_forms_a_cycle_returns_malformed_grouping() {
        let parser = standard_parser().await;
        let entries = vec![
            RawEntry::new("A", EntryKind::And).in_group("B"),
            RawEntry::new("B", EntryKind::Or).in_group("A"),
        ];

        let err = parser.parse(&entries, &AssumeProficient).await.unwrap_err();

        assert!(matches!(err, DomainError::MalformedGrouping { .. }));
    }

    #[tokio::test]
    async fn when_group_is_unknown_entry_becomes_root() {
        let parser = standard_parser().await;
        let entries = vec![RawEntry::new("A", EntryKind::Linked)
            .in_group("ghost")
            .with_key("Compendium.gear.rope")];

        let roots = parser.parse(&entries, &AssumeProficient).await.unwrap();

        assert_eq!(ids(&roots), vec!["A"]);
    }

    #[tokio::test]
    async fn when_label_port_is_called_children_are_already_labeled() {
        let mut labels = MockLabelPort::new();
        labels.expect_describe().returning(|node| {
            if node.children.is_empty() {
                format!("leaf {}", node.id)
            } else {
                node.children
                    .iter()
                    .map(|c| c.label.clone())
                    .collect::<Vec<_>>()
                    .join(" + ")
            }
        });
        let mut enrichment = MockEnrichmentPort::new();
        enrichment
            .expect_enrich()
            .returning(|text| Ok(text.to_uppercase()));
        let parser = EntryParser::new(resolver().await, Arc::new(labels), Arc::new(enrichment));
        let entries = vec![
            RawEntry::new("A", EntryKind::And),
            RawEntry::new("x", EntryKind::Currency).in_group("A").with_key("gp"),
            RawEntry::new("y", EntryKind::Currency).in_group("A").with_key("sp"),
        ];

        let roots = parser.parse(&entries, &AssumeProficient).await.unwrap();

        assert_eq!(roots[0].label, "LEAF X + LEAF Y");
        assert_eq!(roots[0].children[1].label, "LEAF Y");
    }

    #[tokio::test]
    async fn when_enrichment_fails_falls_back_to_plain_label() {
        let mut enrichment = MockEnrichmentPort::new();
        enrichment
            .expect_enrich()
            .returning(|_| Err(EnrichError::Failed("renderer offline".into())));
        let parser = EntryParser::new(
            resolver().await,
            Arc::new(StandardLabeler),
            Arc::new(enrichment),
        );
        let entries = vec![RawEntry::new("A", EntryKind::Linked).with_key("Compendium.gear.rope")];

        let roots = parser.parse(&entries, &AssumeProficient).await.unwrap();

        assert_eq!(roots[0].label, "@UUID[Compendium.gear.rope]{Rope}");
    }

    #[tokio::test]
    async fn when_curated_options_are_authored_they_are_resolved() {
        let parser = standard_parser().await;
        let entries = vec![RawEntry::new("T", EntryKind::Tool)
            .with_key("music")
            .with_options(vec![ItemRef::new("Compendium.tools.lute")])];

        let roots = parser.parse(&entries, &AssumeProficient).await.unwrap();

        assert_eq!(roots[0].label, "Lute");
        assert!(matches!(
            roots[0].options,
            Some(NodeOptions::Curated { .. })
        ));
    }
}
