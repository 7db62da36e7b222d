//! Application state and composition.

use std::sync::Arc;

use outfitter_domain::{
    CatalogItem, CategoryKind, CollectOptions, CurrencyGrant, EquipmentData, SelectionContext,
    SelectionEntry, SelectionForm, SourceId, SourceType, WealthSelection,
};

use crate::entities::{CatalogIndex, Inventory};
use crate::infrastructure::{
    chat::TracingChat,
    config::EngineConfig,
    dice_roller::DiceRoller,
    labels::{StandardEnricher, StandardLabeler},
    ports::{ChatPort, EnrichmentPort, ItemSourcePort, LabelPort, RollOutcome, RollPort},
    random::SystemRandom,
};
use crate::use_cases::equipment::{
    CollectSelections, CollectWealth, EntryParser, EquipmentError, EquipmentUseCases,
    FetchEquipmentData, OptionResolver, RollWealth, WealthRoller, WealthSettings,
};

/// Localization key of the panel shown when starting equipment is broken.
pub const ERROR_MALFORMED_KEY: &str = "outfitter.equipment.error.malformed";
/// Localization key of the panel shown when equipment could not be loaded.
pub const ERROR_UNAVAILABLE_KEY: &str = "outfitter.equipment.error.unavailable";

/// Host collaborators the engine consumes.
pub struct Ports {
    pub item_source: Arc<dyn ItemSourcePort>,
    pub roller: Arc<dyn RollPort>,
    pub labels: Arc<dyn LabelPort>,
    pub enrichment: Arc<dyn EnrichmentPort>,
    pub chat: Arc<dyn ChatPort>,
}

impl Ports {
    /// Built-in adapters around a host item source.
    pub fn standard(item_source: Arc<dyn ItemSourcePort>) -> Self {
        Self {
            item_source,
            roller: Arc::new(DiceRoller::new(Arc::new(SystemRandom::new()))),
            labels: Arc::new(StandardLabeler),
            enrichment: Arc::new(StandardEnricher),
            chat: Arc::new(TracingChat),
        }
    }
}

/// What the equipment section of the wizard shows.
#[derive(Debug)]
pub enum EquipmentSection {
    Ready {
        data: EquipmentData,
        form: SelectionForm,
    },
    /// Error panel; `message_key` is a localization key
    Failed {
        message_key: &'static str,
        error: EquipmentError,
    },
}

/// Main application state.
///
/// Holds the shared catalog and all use cases.
pub struct App {
    pub catalog: Arc<CatalogIndex>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub equipment: EquipmentUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(ports: Ports, config: &EngineConfig) -> Self {
        let catalog = Arc::new(CatalogIndex::new(
            ports.item_source.clone(),
            config.item_sources.clone(),
            config.focus_items.clone(),
        ));
        let inventory = Arc::new(Inventory::new(ports.item_source));

        let resolver = Arc::new(OptionResolver::new(catalog.clone(), inventory.clone()));
        let parser = Arc::new(EntryParser::new(resolver, ports.labels, ports.enrichment));
        let wealth = Arc::new(WealthRoller::new(
            ports.roller,
            ports.chat,
            WealthSettings {
                base_currency: config.base_currency.clone(),
                broadcast: config.broadcast_wealth_rolls,
            },
        ));

        let equipment = EquipmentUseCases::new(
            Arc::new(FetchEquipmentData::new(
                catalog.clone(),
                inventory.clone(),
                parser,
            )),
            Arc::new(CollectSelections::new(inventory)),
            Arc::new(CollectWealth::new(wealth.clone())),
            Arc::new(RollWealth::new(wealth)),
        );

        Self {
            catalog,
            use_cases: UseCases { equipment },
        }
    }

    // =========================================================================
    // Equipment section
    // =========================================================================

    pub async fn fetch_equipment_data(
        &self,
        ctx: &SelectionContext,
    ) -> Result<EquipmentData, EquipmentError> {
        self.use_cases.equipment.fetch.execute(ctx).await
    }

    pub fn build_form(&self, data: &EquipmentData) -> SelectionForm {
        SelectionForm::new(data)
    }

    /// Fetch and build the section, turning failures into an error panel.
    pub async fn render_equipment_section(&self, ctx: &SelectionContext) -> EquipmentSection {
        match self.fetch_equipment_data(ctx).await {
            Ok(data) => {
                let form = self.build_form(&data);
                EquipmentSection::Ready { data, form }
            }
            Err(error) => {
                tracing::error!(error = %error, "Failed to build equipment section");
                let message_key = if error.is_authoring_error() {
                    ERROR_MALFORMED_KEY
                } else {
                    ERROR_UNAVAILABLE_KEY
                };
                EquipmentSection::Failed { message_key, error }
            }
        }
    }

    // =========================================================================
    // Collection
    // =========================================================================

    pub async fn collect_selections(
        &self,
        form: &SelectionForm,
        options: CollectOptions,
    ) -> Vec<SelectionEntry> {
        self.use_cases.equipment.collect.execute(form, options).await
    }

    pub async fn collect_wealth(&self, form: &SelectionForm) -> Vec<WealthSelection> {
        self.use_cases.equipment.collect_wealth.execute(form).await
    }

    pub fn collect_currency(
        &self,
        form: &SelectionForm,
        options: CollectOptions,
    ) -> Vec<CurrencyGrant> {
        form.currency_grants(options)
    }

    pub async fn roll_wealth(
        &self,
        form: &mut SelectionForm,
        source: SourceType,
    ) -> Result<RollOutcome, EquipmentError> {
        self.use_cases.equipment.roll_wealth.execute(form, source).await
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// Items a category entry with `key` would offer, building the catalog
    /// first if needed. An unreachable item source gives fewer (or no)
    /// options, never an error.
    pub async fn get_category_options(
        &self,
        kind: CategoryKind,
        key: Option<&str>,
    ) -> Vec<CatalogItem> {
        if let Err(e) = self.catalog.initialize().await {
            tracing::warn!(error = %e, kind = %kind, "Catalog unavailable, offering no options");
        }
        self.catalog.get_options(kind, key).await
    }

    pub async fn clear_catalog(&self, include_index: bool) {
        self.catalog.clear(include_index).await;
    }

    pub async fn reconfigure_sources(&self, sources: Vec<SourceId>) {
        tracing::info!(sources = sources.len(), "Reconfiguring item sources");
        self.catalog.reconfigure(sources).await;
    }
}
