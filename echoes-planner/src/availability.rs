//! Content unlocked by a selection.
//!
//! [`PlannerReport`] gathers everything a front end shows for the current
//! selection in one serializable value.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::catalog::{Activity, Catalog, CombatStyle, GearSlot, GearTier, Teleport};
use crate::names::clean_name;
use crate::scoring::{MethodNote, SkillRating, is_available, matching_notes, score};
use crate::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillReport {
    pub name: String,
    pub points: u32,
    pub rating: SkillRating,
    pub notes: Vec<MethodNote>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredItem {
    pub name: String,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportStop {
    pub location: String,
    pub relic: String,
    pub code: Option<String>,
    pub distance: Option<String>,
}

/// Unlocked teleports sharing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportGroup {
    pub category: String,
    pub stops: Vec<TeleportStop>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearEntry {
    pub name: String,
    pub spec: bool,
}

/// Obtainable gear for one slot, style and progression tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GearCell {
    pub slot: GearSlot,
    pub style: CombatStyle,
    pub tier: GearTier,
    pub items: Vec<GearEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerReport {
    pub skills: Vec<SkillReport>,
    pub spellbooks: Vec<ScoredItem>,
    pub prayers: Vec<ScoredItem>,
    pub runes: Vec<ScoredItem>,
    pub bosses: Vec<String>,
    pub slayer_masters: Vec<String>,
    pub minigames: Vec<String>,
    pub teleports: Vec<TeleportGroup>,
    pub gear: Vec<GearCell>,
    pub masteries_total: u8,
    pub has_selections: bool,
}

impl PlannerReport {
    #[must_use]
    pub fn build(catalog: &Catalog, selection: &Selection) -> Self {
        let skills = catalog
            .skills()
            .iter()
            .map(|skill| {
                let points = score(skill, selection);
                SkillReport {
                    name: skill.name.clone(),
                    points,
                    rating: SkillRating::from_points(points),
                    notes: matching_notes(skill, selection),
                }
            })
            .collect();

        Self {
            skills,
            spellbooks: scored(catalog.spellbooks(), selection),
            prayers: scored(catalog.prayers(), selection),
            runes: scored(catalog.runes(), selection),
            bosses: available_names(catalog.bosses(), selection),
            slayer_masters: available_names(catalog.slayer_masters(), selection),
            minigames: available_names(catalog.minigames(), selection),
            teleports: teleport_groups(catalog.teleports(), selection),
            gear: gear_cells(catalog, selection),
            masteries_total: selection.mastery_total(),
            has_selections: selection.has_selections(),
        }
    }

    /// Number of unlocked teleport destinations across all categories.
    #[must_use]
    pub fn teleport_count(&self) -> usize {
        self.teleports.iter().map(|g| g.stops.len()).sum()
    }
}

fn scored(items: &[Activity], selection: &Selection) -> Vec<ScoredItem> {
    items
        .iter()
        .map(|item| ScoredItem {
            name: item.name.clone(),
            points: score(item, selection),
        })
        .collect()
}

/// Unlocked item names, de-duplicated and sorted.
fn available_names(items: &[Activity], selection: &Selection) -> Vec<String> {
    items
        .iter()
        .filter(|item| is_available(*item, selection))
        .map(|item| item.name.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn teleport_unlocked(
    teleport: &Teleport,
    regions: &HashSet<String>,
    relics: &HashSet<String>,
) -> bool {
    relics.contains(&clean_name(&teleport.relic))
        && teleport
            .regions
            .iter()
            .all(|region| regions.contains(&clean_name(region)))
}

fn teleport_groups(teleports: &[Teleport], selection: &Selection) -> Vec<TeleportGroup> {
    let regions = selection.region_keys();
    let relics = selection.relic_keys();

    let mut groups: Vec<TeleportGroup> = Vec::new();
    for teleport in teleports
        .iter()
        .filter(|t| teleport_unlocked(t, &regions, &relics))
    {
        let stop = TeleportStop {
            location: teleport.location.clone(),
            relic: teleport.relic.clone(),
            code: teleport.code.clone(),
            distance: teleport.distance.clone(),
        };
        match groups.iter_mut().find(|g| g.category == teleport.category) {
            Some(group) => group.stops.push(stop),
            None => groups.push(TeleportGroup {
                category: teleport.category.clone(),
                stops: vec![stop],
            }),
        }
    }
    groups
}

fn gear_cells(catalog: &Catalog, selection: &Selection) -> Vec<GearCell> {
    let regions = selection.region_keys();
    let mut cells =
        Vec::with_capacity(GearSlot::ALL.len() * CombatStyle::ALL.len() * GearTier::ALL.len());

    for slot in GearSlot::ALL {
        for style in CombatStyle::ALL {
            for tier in GearTier::ALL {
                let mut seen = HashSet::new();
                let items = catalog
                    .gear()
                    .iter()
                    .filter(|g| g.fits(slot, tier, style))
                    .filter(|g| regions.contains(&clean_name(&g.region)))
                    .filter(|g| seen.insert(g.name.clone()))
                    .map(|g| GearEntry {
                        name: g.name.clone(),
                        spec: g.spec,
                    })
                    .collect();
                cells.push(GearCell {
                    slot,
                    style,
                    tier,
                    items,
                });
            }
        }
    }
    cells
}
