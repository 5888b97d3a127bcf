//! Selection model: the user's chosen regions, mastery levels and relics.
//!
//! A `Selection` is an immutable value. Every toggle is a pure function that
//! returns the next selection; the caller decides where to commit it.
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::catalog::{Catalog, CombatStyle, Region, Relic};
use crate::constants::{MASTERY_BUDGET, REGION_SLOTS};
use crate::names::clean_name;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedRegion {
    pub name: String,
    pub code: Option<String>,
    /// Priority slot 1..=3, `None` for default regions.
    pub slot: Option<u8>,
    pub is_default: bool,
}

impl SelectedRegion {
    #[must_use]
    pub fn slotted(region: &Region, slot: u8) -> Self {
        Self {
            name: region.name.clone(),
            code: region.code.clone(),
            slot: Some(slot),
            is_default: false,
        }
    }

    #[must_use]
    pub fn default_of(region: &Region) -> Self {
        Self {
            name: region.name.clone(),
            code: region.code.clone(),
            slot: None,
            is_default: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedMastery {
    pub style: CombatStyle,
    pub level: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedRelic {
    pub name: String,
    pub code: String,
    pub order: u8,
}

impl From<&Relic> for SelectedRelic {
    fn from(relic: &Relic) -> Self {
        Self {
            name: relic.name.clone(),
            code: relic.code.clone(),
            order: relic.order,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Selection {
    pub regions: Vec<SelectedRegion>,
    pub masteries: Vec<SelectedMastery>,
    pub relics: Vec<SelectedRelic>,
}

impl Selection {
    /// Empty selection holding only the catalog's default regions.
    #[must_use]
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            regions: catalog
                .default_regions()
                .map(SelectedRegion::default_of)
                .collect(),
            masteries: Vec::new(),
            relics: Vec::new(),
        }
    }

    #[must_use]
    pub fn has_region(&self, name: &str) -> bool {
        self.regions.iter().any(|r| r.name == name)
    }

    #[must_use]
    pub fn has_relic(&self, code: &str) -> bool {
        self.relics.iter().any(|r| r.code == code)
    }

    #[must_use]
    pub fn region_in_slot(&self, slot: u8) -> Option<&SelectedRegion> {
        self.regions.iter().find(|r| r.slot == Some(slot))
    }

    #[must_use]
    pub fn non_default_region_count(&self) -> usize {
        self.regions.iter().filter(|r| !r.is_default).count()
    }

    /// Highest occupied priority slot, 0 when no slot is taken.
    #[must_use]
    pub fn highest_slot(&self) -> u8 {
        self.regions.iter().filter_map(|r| r.slot).max().unwrap_or(0)
    }

    #[must_use]
    pub fn mastery_level(&self, style: CombatStyle) -> u8 {
        self.masteries
            .iter()
            .find(|m| m.style == style)
            .map_or(0, |m| m.level)
    }

    #[must_use]
    pub fn mastery_total(&self) -> u8 {
        self.masteries
            .iter()
            .fold(0u8, |acc, m| acc.saturating_add(m.level))
    }

    /// Whether the user picked anything beyond the default regions.
    #[must_use]
    pub fn has_selections(&self) -> bool {
        self.non_default_region_count() > 0
            || self.masteries.iter().any(|m| m.level > 0)
            || !self.relics.is_empty()
    }

    /// Normalized names of every selected region.
    #[must_use]
    pub fn region_keys(&self) -> HashSet<String> {
        self.regions.iter().map(|r| clean_name(&r.name)).collect()
    }

    /// Normalized names of every selected relic.
    #[must_use]
    pub fn relic_keys(&self) -> HashSet<String> {
        self.relics.iter().map(|r| clean_name(&r.name)).collect()
    }

    /// Order-insensitive comparison of what is selected.
    ///
    /// Zero-level mastery records count as unselected.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.fingerprint() == other.fingerprint()
    }

    fn fingerprint(&self) -> Fingerprint {
        Fingerprint {
            regions: self
                .regions
                .iter()
                .map(|r| (r.name.clone(), r.slot))
                .collect(),
            masteries: self
                .masteries
                .iter()
                .filter(|m| m.level > 0)
                .map(|m| (m.style, m.level))
                .collect(),
            relics: self.relics.iter().map(|r| r.code.clone()).collect(),
        }
    }
}

#[derive(PartialEq, Eq)]
struct Fingerprint {
    regions: BTreeSet<(String, Option<u8>)>,
    masteries: BTreeMap<CombatStyle, u8>,
    relics: BTreeSet<String>,
}

/// Select or deselect a region by code.
///
/// A newly selected region takes the lowest free priority slot. Once three
/// non-default regions are selected further additions are ignored. Default,
/// hidden and unknown regions cannot be toggled.
#[must_use]
pub fn toggle_region(catalog: &Catalog, selection: &Selection, code: &str) -> Selection {
    let Some(region) = catalog.region_by_code(code) else {
        debug!("ignoring toggle for unknown region code {code:?}");
        return selection.clone();
    };
    if !region.is_selectable() {
        debug!("region {} is not selectable", region.name);
        return selection.clone();
    }

    let mut next = selection.clone();
    if selection.has_region(&region.name) {
        next.regions.retain(|r| r.name != region.name);
        return next;
    }
    if selection.non_default_region_count() >= usize::from(REGION_SLOTS) {
        return next;
    }

    let slot = (1..=REGION_SLOTS)
        .find(|slot| selection.region_in_slot(*slot).is_none())
        .unwrap_or(1);
    next.regions.push(SelectedRegion::slotted(region, slot));
    next
}

/// Click a mastery rank.
///
/// Clicking a rank above the current level selects it; clicking the current
/// level or below drops to one rank beneath the clicked one. The result is
/// clamped so that all styles together stay within the shared budget, and a
/// style that reaches level 0 is removed from the selection.
#[must_use]
pub fn toggle_mastery(
    catalog: &Catalog,
    selection: &Selection,
    style: CombatStyle,
    level: u8,
) -> Selection {
    if catalog.mastery(style, level).is_none() {
        debug!("ignoring toggle for unknown mastery {style} {level}");
        return selection.clone();
    }

    let current = selection.mastery_level(style);
    let other_total = selection
        .masteries
        .iter()
        .filter(|m| m.style != style)
        .fold(0u8, |acc, m| acc.saturating_add(m.level));
    let max_level = MASTERY_BUDGET.saturating_sub(other_total);
    let wanted = if level <= current {
        level.saturating_sub(1)
    } else {
        level
    };
    let new_level = wanted.min(max_level);

    let mut next = selection.clone();
    next.masteries.retain(|m| m.style != style);
    if new_level > 0 {
        next.masteries.push(SelectedMastery {
            style,
            level: new_level,
        });
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::bundled().unwrap()
    }

    fn with_regions(catalog: &Catalog, codes: &[&str]) -> Selection {
        codes.iter().fold(Selection::new(catalog), |sel, code| {
            toggle_region(catalog, &sel, code)
        })
    }

    #[test]
    fn new_selection_contains_only_defaults() {
        let catalog = catalog();
        let selection = Selection::new(&catalog);
        assert_eq!(selection.regions.len(), 1);
        assert!(selection.regions[0].is_default);
        assert_eq!(selection.regions[0].slot, None);
        assert!(!selection.has_selections());
    }

    #[test]
    fn regions_take_lowest_free_slot() {
        let catalog = catalog();
        let selection = with_regions(&catalog, &["MI", "KA", "AS"]);
        assert_eq!(selection.region_in_slot(1).unwrap().name, "Misthalin");
        assert_eq!(selection.region_in_slot(2).unwrap().name, "Karamja");
        assert_eq!(selection.region_in_slot(3).unwrap().name, "Asgarnia");

        let removed = toggle_region(&catalog, &selection, "KA");
        assert!(removed.region_in_slot(2).is_none());
        let refilled = toggle_region(&catalog, &removed, "MO");
        assert_eq!(refilled.region_in_slot(2).unwrap().name, "Morytania");
    }

    #[test]
    fn region_cap_is_enforced() {
        let catalog = catalog();
        let full = with_regions(&catalog, &["MI", "KA", "AS"]);
        let attempted = toggle_region(&catalog, &full, "WI");
        assert_eq!(attempted, full);
        assert_eq!(attempted.non_default_region_count(), 3);
    }

    #[test]
    fn default_hidden_and_unknown_regions_are_ignored() {
        let catalog = catalog();
        let selection = Selection::new(&catalog);
        assert_eq!(toggle_region(&catalog, &selection, "VA"), selection);
        assert_eq!(toggle_region(&catalog, &selection, "KO"), selection);
        assert_eq!(toggle_region(&catalog, &selection, "ZZ"), selection);
    }

    #[test]
    fn mastery_upgrade_then_downgrade() {
        let catalog = catalog();
        let selection = Selection::new(&catalog);
        let melee4 = toggle_mastery(&catalog, &selection, CombatStyle::Melee, 4);
        assert_eq!(melee4.mastery_level(CombatStyle::Melee), 4);

        let clicked_again = toggle_mastery(&catalog, &melee4, CombatStyle::Melee, 4);
        assert_eq!(clicked_again.mastery_level(CombatStyle::Melee), 3);

        let lower_click = toggle_mastery(&catalog, &melee4, CombatStyle::Melee, 2);
        assert_eq!(lower_click.mastery_level(CombatStyle::Melee), 1);
    }

    #[test]
    fn mastery_to_zero_removes_record() {
        let catalog = catalog();
        let selection = toggle_mastery(&catalog, &Selection::new(&catalog), CombatStyle::Magic, 1);
        let cleared = toggle_mastery(&catalog, &selection, CombatStyle::Magic, 1);
        assert!(cleared.masteries.is_empty());
        assert!(!cleared.has_selections());
    }

    #[test]
    fn mastery_budget_clamps_levels() {
        let catalog = catalog();
        let mut selection = Selection::new(&catalog);
        selection = toggle_mastery(&catalog, &selection, CombatStyle::Melee, 6);
        selection = toggle_mastery(&catalog, &selection, CombatStyle::Ranged, 6);
        assert_eq!(selection.mastery_level(CombatStyle::Ranged), 4);
        selection = toggle_mastery(&catalog, &selection, CombatStyle::Magic, 3);
        assert_eq!(selection.mastery_level(CombatStyle::Magic), 0);
        assert_eq!(selection.mastery_total(), 10);
    }

    #[test]
    fn unknown_mastery_level_is_ignored() {
        let catalog = catalog();
        let selection = Selection::new(&catalog);
        assert_eq!(
            toggle_mastery(&catalog, &selection, CombatStyle::Melee, 9),
            selection
        );
        assert_eq!(
            toggle_mastery(&catalog, &selection, CombatStyle::Melee, 0),
            selection
        );
    }

    #[test]
    fn equivalence_ignores_order_and_zero_levels() {
        let catalog = catalog();
        let a = with_regions(&catalog, &["MI", "KA"]);
        let mut b = a.clone();
        b.regions.reverse();
        b.masteries.push(SelectedMastery {
            style: CombatStyle::Ranged,
            level: 0,
        });
        assert!(a.is_equivalent(&b));

        let c = toggle_region(&catalog, &a, "AS");
        assert!(!a.is_equivalent(&c));
    }
}
