//! SelectionForm aggregate - the live state of the equipment section
//!
//! # Rustic DDD Design
//!
//! The form is the single source of truth for what the user has chosen:
//! - **Explicit states**: `WealthToggleState` and `OrGroupState` are tagged
//!   values; `disabled` / `hidden` flags are a projection of them
//! - **Ownership**: transitions take `&mut self` and finish before any read
//! - **Events**: every accepted transition returns a `FormEvent`
//!
//! Collection walks (`equipment_picks`, `currency_grants`, `wealth_requests`)
//! are pure reads. A control contributes only when it and every ancestor is
//! enabled and visible, whatever its own value says.

use serde::{Deserialize, Serialize};

use crate::entities::{
    presentation_roots, CatalogItem, EntryKind, EquipmentData, EquipmentEntryNode,
};
use crate::error::DomainError;
use crate::ids::{EntryId, ItemRef};
use crate::value_objects::{CollectOptions, CurrencyGrant, SourceType};

/// Wealth-versus-equipment toggle of one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum WealthToggleState {
    EquipmentActive,
    WealthActive {
        /// Total of a roll the user already triggered
        rolled_total: Option<i64>,
    },
}

impl WealthToggleState {
    pub fn is_wealth(&self) -> bool {
        matches!(self, Self::WealthActive { .. })
    }
}

/// Selected branch of an OR group. `None` only for an empty group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrGroupState {
    pub selected: Option<EntryId>,
}

/// What a control offers and what the user did with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "control", rename_all = "camelCase")]
pub enum ControlKind {
    /// AND group: every child applies
    AllOf { children: Vec<Control> },
    /// OR group: exactly the selected child applies
    OneOf {
        state: OrGroupState,
        children: Vec<Control>,
    },
    /// Category picker; single select
    Picker {
        options: Vec<CatalogItem>,
        selected: Option<ItemRef>,
        quantity: u32,
    },
    /// Linked item behind a checkbox
    Optional {
        item: CatalogItem,
        checked: bool,
        quantity: u32,
    },
    /// Linked item that is always granted
    Linked { item: CatalogItem, quantity: u32 },
    Currency { denomination: String, amount: u32 },
}

/// One rendered control of the equipment section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    entry_id: EntryId,
    label: String,
    kind: ControlKind,
    disabled: bool,
    hidden: bool,
    favorite: bool,
}

impl Control {
    /// Build the control for a node, or nothing when the node has nothing
    /// to show (unresolved linked item, currency without denomination).
    fn from_node(node: &EquipmentEntryNode) -> Option<Self> {
        if !node.is_renderable() {
            return None;
        }

        let kind = match node.kind {
            EntryKind::And => ControlKind::AllOf {
                children: build_controls(&node.children),
            },
            EntryKind::Or => {
                let children = build_controls(&node.children);
                let selected = node
                    .children
                    .iter()
                    .filter(|child| child.default_selected)
                    .map(|child| &child.id)
                    .find(|id| children.iter().any(|c| &c.entry_id == *id))
                    .or_else(|| children.first().map(|c| &c.entry_id))
                    .cloned();
                ControlKind::OneOf {
                    state: OrGroupState { selected },
                    children,
                }
            }
            EntryKind::Linked => {
                let linked = node.linked_item.as_ref()?;
                if linked.optional {
                    ControlKind::Optional {
                        item: linked.item.clone(),
                        checked: true,
                        quantity: node.count,
                    }
                } else {
                    ControlKind::Linked {
                        item: linked.item.clone(),
                        quantity: node.count,
                    }
                }
            }
            EntryKind::Weapon | EntryKind::Armor | EntryKind::Tool | EntryKind::Focus => {
                ControlKind::Picker {
                    options: node
                        .options
                        .as_ref()
                        .map(|o| o.items().to_vec())
                        .unwrap_or_default(),
                    selected: None,
                    quantity: node.count,
                }
            }
            EntryKind::Currency => ControlKind::Currency {
                denomination: node.key.clone()?.to_lowercase(),
                amount: node.count,
            },
        };

        Some(Self {
            entry_id: node.id.clone(),
            label: node.label.clone(),
            kind,
            disabled: false,
            hidden: false,
            favorite: false,
        })
    }

    #[inline]
    pub fn entry_id(&self) -> &EntryId {
        &self.entry_id
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn kind(&self) -> &ControlKind {
        &self.kind
    }

    #[inline]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    #[inline]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    #[inline]
    pub fn is_favorite(&self) -> bool {
        self.favorite
    }

    /// Whether this control can currently be acted on.
    pub fn is_active(&self) -> bool {
        !self.disabled && !self.hidden
    }

    pub fn children(&self) -> &[Control] {
        match &self.kind {
            ControlKind::AllOf { children } | ControlKind::OneOf { children, .. } => children,
            _ => &[],
        }
    }

    fn children_mut(&mut self) -> &mut [Control] {
        match &mut self.kind {
            ControlKind::AllOf { children } | ControlKind::OneOf { children, .. } => children,
            _ => &mut [],
        }
    }

    /// Push inherited flags down the subtree; unselected OR branches are
    /// disabled and hidden.
    fn project(&mut self, disabled: bool, hidden: bool) {
        self.disabled = disabled;
        self.hidden = hidden;
        match &mut self.kind {
            ControlKind::AllOf { children } => {
                for child in children {
                    child.project(disabled, hidden);
                }
            }
            ControlKind::OneOf { state, children } => {
                for child in children {
                    let chosen = state.selected.as_ref() == Some(&child.entry_id);
                    child.project(disabled || !chosen, hidden || !chosen);
                }
            }
            _ => {}
        }
    }
}

fn build_controls(nodes: &[EquipmentEntryNode]) -> Vec<Control> {
    nodes.iter().filter_map(Control::from_node).collect()
}

fn find_control_mut<'a>(controls: &'a mut [Control], id: &EntryId) -> Option<&'a mut Control> {
    for control in controls {
        if &control.entry_id == id {
            return Some(control);
        }
        if let Some(found) = find_control_mut(control.children_mut(), id) {
            return Some(found);
        }
    }
    None
}

fn find_control<'a>(controls: &'a [Control], id: &EntryId) -> Option<&'a Control> {
    controls.iter().find_map(|control| {
        if &control.entry_id == id {
            Some(control)
        } else {
            find_control(control.children(), id)
        }
    })
}

/// An item the collector should grant, read off an active control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipmentPick {
    pub source: SourceType,
    pub entry_id: EntryId,
    pub item: CatalogItem,
    pub quantity: u32,
    pub favorite: bool,
}

/// A wealth grant to produce for a wealth-active source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WealthRequest {
    pub source: SourceType,
    pub formula: String,
    pub rolled_total: Option<i64>,
}

/// Observable outcome of an accepted transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    WealthToggled {
        source: SourceType,
        active: bool,
    },
    BranchSelected {
        source: SourceType,
        group: EntryId,
        child: EntryId,
    },
    OptionChosen {
        source: SourceType,
        entry: EntryId,
        item: Option<ItemRef>,
    },
    OptionalToggled {
        source: SourceType,
        entry: EntryId,
        checked: bool,
    },
    FavoriteToggled {
        source: SourceType,
        entry: EntryId,
        favorite: bool,
    },
    WealthRolled {
        source: SourceType,
        total: i64,
    },
}

/// Equipment section state for one source type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePanel {
    source: SourceType,
    wealth_formula: Option<String>,
    wealth: WealthToggleState,
    /// Text of the wealth amount field
    wealth_display: Option<String>,
    controls: Vec<Control>,
}

impl SourcePanel {
    fn new(source: SourceType, nodes: &[EquipmentEntryNode], wealth_formula: Option<String>) -> Self {
        let mut panel = Self {
            source,
            wealth_formula,
            wealth: WealthToggleState::EquipmentActive,
            wealth_display: None,
            controls: build_controls(presentation_roots(nodes)),
        };
        panel.project();
        panel
    }

    #[inline]
    pub fn source(&self) -> SourceType {
        self.source
    }

    #[inline]
    pub fn wealth_formula(&self) -> Option<&str> {
        self.wealth_formula.as_deref()
    }

    #[inline]
    pub fn wealth(&self) -> WealthToggleState {
        self.wealth
    }

    #[inline]
    pub fn wealth_display(&self) -> Option<&str> {
        self.wealth_display.as_deref()
    }

    #[inline]
    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn find(&self, id: &EntryId) -> Option<&Control> {
        find_control(&self.controls, id)
    }

    fn project(&mut self) {
        let disabled = self.wealth.is_wealth();
        for control in &mut self.controls {
            control.project(disabled, false);
        }
    }

    /// Look up a control the user can interact with right now.
    fn active_control_mut(&mut self, id: &EntryId) -> Result<&mut Control, DomainError> {
        let control = find_control_mut(&mut self.controls, id)
            .ok_or_else(|| DomainError::not_found("Control", id.as_str()))?;
        if !control.is_active() {
            return Err(DomainError::invalid_state_transition(format!(
                "control {} is disabled",
                id
            )));
        }
        Ok(control)
    }

    /// Controls that contribute, in walk order, with their ancestors' state
    /// taken into account.
    fn active_leaves(&self) -> Vec<&Control> {
        fn walk<'a>(controls: &'a [Control], out: &mut Vec<&'a Control>) {
            for control in controls {
                if !control.is_active() {
                    continue;
                }
                match &control.kind {
                    ControlKind::AllOf { children } => walk(children, out),
                    ControlKind::OneOf { state, children } => {
                        let chosen = children
                            .iter()
                            .filter(|c| state.selected.as_ref() == Some(&c.entry_id));
                        for child in chosen {
                            walk(std::slice::from_ref(child), out);
                        }
                    }
                    _ => out.push(control),
                }
            }
        }

        let mut out = Vec::new();
        if !self.wealth.is_wealth() {
            walk(&self.controls, &mut out);
        }
        out
    }

    fn picks(&self) -> Vec<EquipmentPick> {
        let leaves = self.active_leaves();
        let pick = |control: &Control, item: &CatalogItem, quantity: u32| EquipmentPick {
            source: self.source,
            entry_id: control.entry_id.clone(),
            item: item.clone(),
            quantity,
            favorite: control.favorite,
        };

        let mut picks = Vec::new();
        for &control in &leaves {
            if let ControlKind::Picker {
                options,
                selected: Some(selected),
                quantity,
            } = &control.kind
            {
                if let Some(item) = options.iter().find(|o| &o.uuid == selected) {
                    picks.push(pick(control, item, *quantity));
                }
            }
        }
        for &control in &leaves {
            if let ControlKind::Optional {
                item,
                checked: true,
                quantity,
            } = &control.kind
            {
                picks.push(pick(control, item, *quantity));
            }
        }
        for &control in &leaves {
            if let ControlKind::Linked { item, quantity } = &control.kind {
                picks.push(pick(control, item, *quantity));
            }
        }
        picks
    }
}

/// The equipment section of the character-creation form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionForm {
    class: SourcePanel,
    background: SourcePanel,
}

impl SelectionForm {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Build the initial form: equipment active everywhere, OR groups on
    /// their default (or first) branch, pickers unselected.
    pub fn new(data: &EquipmentData) -> Self {
        Self {
            class: SourcePanel::new(
                SourceType::Class,
                &data.class.nodes,
                data.class.wealth_formula.clone(),
            ),
            background: SourcePanel::new(
                SourceType::Background,
                &data.background.nodes,
                data.background.wealth_formula.clone(),
            ),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn panel(&self, source: SourceType) -> &SourcePanel {
        match source {
            SourceType::Class => &self.class,
            SourceType::Background => &self.background,
        }
    }

    fn panel_mut(&mut self, source: SourceType) -> &mut SourcePanel {
        match source {
            SourceType::Class => &mut self.class,
            SourceType::Background => &mut self.background,
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Switch a source between itemized equipment and starting wealth.
    pub fn set_wealth_active(
        &mut self,
        source: SourceType,
        active: bool,
    ) -> Result<FormEvent, DomainError> {
        let panel = self.panel_mut(source);
        if active {
            let formula = panel.wealth_formula.clone().ok_or_else(|| {
                DomainError::invalid_state_transition(format!(
                    "{} has no starting wealth formula",
                    source
                ))
            })?;
            if !panel.wealth.is_wealth() {
                panel.wealth = WealthToggleState::WealthActive { rolled_total: None };
                panel.wealth_display = Some(formula);
            }
        } else {
            panel.wealth = WealthToggleState::EquipmentActive;
            panel.wealth_display = None;
        }
        panel.project();
        Ok(FormEvent::WealthToggled { source, active })
    }

    /// Remember the total of a user-triggered wealth roll.
    pub fn record_wealth_roll(
        &mut self,
        source: SourceType,
        total: i64,
    ) -> Result<FormEvent, DomainError> {
        let panel = self.panel_mut(source);
        if !panel.wealth.is_wealth() {
            return Err(DomainError::invalid_state_transition(format!(
                "{} is not using starting wealth",
                source
            )));
        }
        panel.wealth = WealthToggleState::WealthActive {
            rolled_total: Some(total),
        };
        panel.wealth_display = Some(total.to_string());
        Ok(FormEvent::WealthRolled { source, total })
    }

    /// Select one branch of an OR group, disabling its siblings.
    pub fn select_branch(
        &mut self,
        source: SourceType,
        group: &EntryId,
        child: &EntryId,
    ) -> Result<FormEvent, DomainError> {
        let panel = self.panel_mut(source);
        let control = panel.active_control_mut(group)?;
        let ControlKind::OneOf { state, children } = &mut control.kind else {
            return Err(DomainError::validation(format!("{} is not an OR group", group)));
        };
        if !children.iter().any(|c| &c.entry_id == child) {
            return Err(DomainError::validation(format!(
                "{} is not a branch of {}",
                child, group
            )));
        }
        state.selected = Some(child.clone());
        panel.project();
        Ok(FormEvent::BranchSelected {
            source,
            group: group.clone(),
            child: child.clone(),
        })
    }

    /// Choose (or clear) the item of a category picker.
    pub fn choose_option(
        &mut self,
        source: SourceType,
        entry: &EntryId,
        item: Option<ItemRef>,
    ) -> Result<FormEvent, DomainError> {
        let control = self.panel_mut(source).active_control_mut(entry)?;
        let ControlKind::Picker {
            options, selected, ..
        } = &mut control.kind
        else {
            return Err(DomainError::validation(format!("{} is not a picker", entry)));
        };
        if let Some(item) = &item {
            if !options.iter().any(|o| &o.uuid == item) {
                return Err(DomainError::validation(format!(
                    "{} is not one of the options of {}",
                    item, entry
                )));
            }
        }
        selected.clone_from(&item);
        Ok(FormEvent::OptionChosen {
            source,
            entry: entry.clone(),
            item,
        })
    }

    /// Check or clear an optional item.
    pub fn set_checked(
        &mut self,
        source: SourceType,
        entry: &EntryId,
        checked: bool,
    ) -> Result<FormEvent, DomainError> {
        let control = self.panel_mut(source).active_control_mut(entry)?;
        let ControlKind::Optional { checked: state, .. } = &mut control.kind else {
            return Err(DomainError::validation(format!(
                "{} is not an optional item",
                entry
            )));
        };
        *state = checked;
        Ok(FormEvent::OptionalToggled {
            source,
            entry: entry.clone(),
            checked,
        })
    }

    /// Mark the item a control grants as a favorite on the new character.
    pub fn set_favorite(
        &mut self,
        source: SourceType,
        entry: &EntryId,
        favorite: bool,
    ) -> Result<FormEvent, DomainError> {
        let control = self.panel_mut(source).active_control_mut(entry)?;
        if !matches!(
            control.kind,
            ControlKind::Picker { .. } | ControlKind::Optional { .. } | ControlKind::Linked { .. }
        ) {
            return Err(DomainError::validation(format!(
                "{} does not grant an item",
                entry
            )));
        }
        control.favorite = favorite;
        Ok(FormEvent::FavoriteToggled {
            source,
            entry: entry.clone(),
            favorite,
        })
    }

    // =========================================================================
    // Collection walks
    // =========================================================================

    /// Items to grant: per included source, pickers then optional items then
    /// linked items, each in declaration order. Wealth-active sources give
    /// nothing.
    pub fn equipment_picks(&self, options: CollectOptions) -> Vec<EquipmentPick> {
        SourceType::ALL
            .into_iter()
            .filter(|source| options.includes(*source))
            .flat_map(|source| self.panel(source).picks())
            .collect()
    }

    /// Currency entries of active equipment, merged per denomination in
    /// first-seen order.
    pub fn currency_grants(&self, options: CollectOptions) -> Vec<CurrencyGrant> {
        let mut grants: Vec<CurrencyGrant> = Vec::new();
        for source in SourceType::ALL.into_iter().filter(|s| options.includes(*s)) {
            for control in self.panel(source).active_leaves() {
                let ControlKind::Currency {
                    denomination,
                    amount,
                } = &control.kind
                else {
                    continue;
                };
                match grants.iter_mut().find(|g| &g.denomination == denomination) {
                    Some(grant) => grant.amount = grant.amount.saturating_add(*amount),
                    None => grants.push(CurrencyGrant {
                        denomination: denomination.clone(),
                        amount: *amount,
                    }),
                }
            }
        }
        grants
    }

    /// Wealth grants to produce, one per wealth-active source.
    pub fn wealth_requests(&self) -> Vec<WealthRequest> {
        SourceType::ALL
            .into_iter()
            .filter_map(|source| {
                let panel = self.panel(source);
                let WealthToggleState::WealthActive { rolled_total } = panel.wealth else {
                    return None;
                };
                Some(WealthRequest {
                    source,
                    formula: panel.wealth_formula.clone()?,
                    rolled_total,
                })
            })
            .collect()
    }
}
