//! Selection value objects: who the character is, and what they end up with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::ItemRef;
use crate::value_objects::ProficiencySet;

/// One of the two independent pools of starting-equipment rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SourceType {
    Class,
    Background,
}

impl SourceType {
    pub const ALL: [SourceType; 2] = [SourceType::Class, SourceType::Background];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Background => "background",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "class" => Ok(Self::Class),
            "background" => Ok(Self::Background),
            _ => Err(DomainError::parse(format!("Unknown source type: {}", s))),
        }
    }
}

/// The host's reference to a chosen class, race or background.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRef {
    /// Value of the wizard's select control (usually the document id)
    pub value: String,
    pub id: String,
    pub uuid: ItemRef,
}

impl SelectionRef {
    pub fn new(value: impl Into<String>, id: impl Into<String>, uuid: impl Into<ItemRef>) -> Self {
        Self {
            value: value.into(),
            id: id.into(),
            uuid: uuid.into(),
        }
    }
}

/// The wizard's current choices, passed explicitly into resolution.
///
/// Replaces the host's global "currently selected" slots so that each
/// resolution or collection pass works against an isolated context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionContext {
    pub class: Option<SelectionRef>,
    pub race: Option<SelectionRef>,
    pub background: Option<SelectionRef>,
    /// `None` means every category option is considered usable.
    pub proficiencies: Option<ProficiencySet>,
}

impl SelectionContext {
    pub fn with_class(mut self, class: SelectionRef) -> Self {
        self.class = Some(class);
        self
    }

    pub fn with_race(mut self, race: SelectionRef) -> Self {
        self.race = Some(race);
        self
    }

    pub fn with_background(mut self, background: SelectionRef) -> Self {
        self.background = Some(background);
        self
    }

    pub fn with_proficiencies(mut self, proficiencies: ProficiencySet) -> Self {
        self.proficiencies = Some(proficiencies);
        self
    }

    /// The document that supplies starting equipment for a source type.
    pub fn source(&self, source: SourceType) -> Option<&SelectionRef> {
        match source {
            SourceType::Class => self.class.as_ref(),
            SourceType::Background => self.background.as_ref(),
        }
    }
}

/// Which sources a collection pass reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectOptions {
    pub include_class: bool,
    pub include_background: bool,
}

impl CollectOptions {
    pub fn includes(&self, source: SourceType) -> bool {
        match source {
            SourceType::Class => self.include_class,
            SourceType::Background => self.include_background,
        }
    }
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            include_class: true,
            include_background: true,
        }
    }
}

/// One item to grant, built fresh for every collection pass.
///
/// A count greater than one is carried as `quantity` on a single entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEntry {
    pub uuid: ItemRef,
    pub name: String,
    pub img: String,
    /// Item type tag of the granted document ("weapon", "equipment", ...)
    pub kind: String,
    pub quantity: u32,
    /// Deep copy of the source document's system data
    pub system_data: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    pub source: SourceType,
}

/// Currency granted in place of itemized equipment for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WealthSelection {
    pub source_type: SourceType,
    /// The setting's base currency denomination
    pub currency_kind: String,
    pub amount: i64,
    pub formula: String,
    pub roll_total: i64,
}

/// Currency entries that are part of itemized equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyGrant {
    pub denomination: String,
    pub amount: u32,
}
