//! Built-in dice evaluator over the domain formula parser.

use std::sync::Arc;

use async_trait::async_trait;
use outfitter_domain::DiceFormula;

use crate::infrastructure::ports::{RandomPort, RollError, RollOutcome, RollPort};

/// Rolls `XdY±Z*M` formulas with an injected random source.
pub struct DiceRoller {
    random: Arc<dyn RandomPort>,
}

impl DiceRoller {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }
}

#[async_trait]
impl RollPort for DiceRoller {
    async fn roll(&self, formula: &str) -> Result<RollOutcome, RollError> {
        let parsed = DiceFormula::parse(formula).map_err(|e| RollError::InvalidFormula {
            formula: formula.to_string(),
            message: e.to_string(),
        })?;

        let result = parsed.roll_with(|min, max| self.random.gen_range(min, max));
        tracing::debug!(formula, total = result.total, "Rolled dice");

        Ok(RollOutcome {
            total: i64::from(result.total),
            breakdown: result.breakdown(),
        })
    }
}
