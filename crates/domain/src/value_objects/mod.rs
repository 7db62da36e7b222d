//! Value objects - Immutable objects defined by their attributes

mod dice;
mod proficiency;
mod selection;

pub use dice::{DiceFormula, DiceParseError, DiceRollResult};
pub use proficiency::{AssumeProficient, ProficiencyCheck, ProficiencySet};
pub use selection::{
    CollectOptions, CurrencyGrant, SelectionContext, SelectionEntry, SelectionRef, SourceType,
    WealthSelection,
};
