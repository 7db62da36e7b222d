//! Starting wealth use cases.
//!
//! A source whose wealth toggle is on grants currency instead of items. The
//! amount is the user's recorded roll or, failing that, a roll made at
//! collection time.

use std::sync::Arc;

use outfitter_domain::{DomainError, SelectionForm, SourceType, WealthSelection};

use super::error::EquipmentError;
use crate::infrastructure::ports::{ChatPort, RollError, RollOutcome, RollPort};

const CHAT_SPEAKER: &str = "Outfitter";

/// How wealth grants are denominated and announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WealthSettings {
    pub base_currency: String,
    /// Post each roll to public chat
    pub broadcast: bool,
}

impl Default for WealthSettings {
    fn default() -> Self {
        Self {
            base_currency: "gp".to_string(),
            broadcast: false,
        }
    }
}

/// Rolls wealth formulas and optionally announces the result.
pub struct WealthRoller {
    roller: Arc<dyn RollPort>,
    chat: Arc<dyn ChatPort>,
    settings: WealthSettings,
}

impl WealthRoller {
    pub fn new(roller: Arc<dyn RollPort>, chat: Arc<dyn ChatPort>, settings: WealthSettings) -> Self {
        Self {
            roller,
            chat,
            settings,
        }
    }

    pub fn settings(&self) -> &WealthSettings {
        &self.settings
    }

    pub async fn roll(&self, source: SourceType, formula: &str) -> Result<RollOutcome, RollError> {
        let outcome = self.roller.roll(formula).await?;
        if self.settings.broadcast {
            let message = format!(
                "Starting wealth ({}): {} {}",
                source,
                outcome.breakdown,
                self.settings.base_currency
            );
            if let Err(e) = self.chat.broadcast(CHAT_SPEAKER, &message).await {
                tracing::warn!(source = %source, error = %e, "Could not announce wealth roll");
            }
        }
        Ok(outcome)
    }
}

/// Collect wealth use case.
pub struct CollectWealth {
    roller: Arc<WealthRoller>,
}

impl CollectWealth {
    pub fn new(roller: Arc<WealthRoller>) -> Self {
        Self { roller }
    }

    /// One grant per wealth-active source, class first.
    ///
    /// A source without a recorded roll is rolled now; if that roll fails
    /// the source grants nothing.
    pub async fn execute(&self, form: &SelectionForm) -> Vec<WealthSelection> {
        let mut selections = Vec::new();
        for request in form.wealth_requests() {
            let total = match request.rolled_total {
                Some(total) => total,
                None => match self.roller.roll(request.source, &request.formula).await {
                    Ok(outcome) => outcome.total,
                    Err(e) => {
                        tracing::warn!(
                            source = %request.source,
                            formula = %request.formula,
                            error = %e,
                            "Wealth roll failed; source grants no wealth"
                        );
                        continue;
                    }
                },
            };
            selections.push(WealthSelection {
                source_type: request.source,
                currency_kind: self.roller.settings().base_currency.clone(),
                amount: total,
                formula: request.formula,
                roll_total: total,
            });
        }
        selections
    }
}

/// Roll wealth use case.
///
/// The user pressed the roll button of a wealth-active source.
pub struct RollWealth {
    roller: Arc<WealthRoller>,
}

impl RollWealth {
    pub fn new(roller: Arc<WealthRoller>) -> Self {
        Self { roller }
    }

    /// Roll the source's formula and record the total in the form.
    ///
    /// # Errors
    /// * `EquipmentError::Domain` - wealth is not active for `source`
    /// * `EquipmentError::Roll` - the formula could not be rolled
    pub async fn execute(
        &self,
        form: &mut SelectionForm,
        source: SourceType,
    ) -> Result<RollOutcome, EquipmentError> {
        let panel = form.panel(source);
        let formula = match (panel.wealth().is_wealth(), panel.wealth_formula()) {
            (true, Some(formula)) => formula.to_string(),
            _ => {
                return Err(DomainError::invalid_state_transition(format!(
                    "{} is not using starting wealth",
                    source
                ))
                .into())
            }
        };

        let outcome = self.roller.roll(source, &formula).await?;
        form.record_wealth_roll(source, outcome.total)?;
        Ok(outcome)
    }
}
