//! Eligibility and scoring
//!
//! An activity's score is the single best point value among the selected
//! regions and relics that unlock it. Bonuses never stack.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::catalog::{Activity, NotedCell};
use crate::names::clean_name;
use crate::selection::Selection;

/// A point cell stored in an activity's region or relic map.
pub trait Points {
    fn points(&self) -> u32;
}

impl Points for u32 {
    fn points(&self) -> u32 {
        *self
    }
}

impl Points for NotedCell {
    fn points(&self) -> u32 {
        self.value
    }
}

fn best_match<'a, P: Points + 'a>(
    entries: impl IntoIterator<Item = (&'a String, &'a P)>,
    keys: &HashSet<String>,
) -> u32 {
    entries
        .into_iter()
        .filter(|(name, _)| keys.contains(&clean_name(name)))
        .map(|(_, cell)| cell.points())
        .max()
        .unwrap_or(0)
}

/// Best point value any selected region or relic grants the activity.
#[must_use]
pub fn score<P: Points>(activity: &Activity<P>, selection: &Selection) -> u32 {
    let by_region = best_match(&activity.regions, &selection.region_keys());
    let by_relic = best_match(&activity.relics, &selection.relic_keys());
    by_region.max(by_relic)
}

#[must_use]
pub fn is_available<P: Points>(activity: &Activity<P>, selection: &Selection) -> bool {
    score(activity, selection) > 0
}

/// A selected unlock that explains how an activity is trained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodNote {
    pub source: String,
    pub value: u32,
    pub note: String,
}

/// Notes of the selected regions and relics that unlock a noted activity,
/// best value first.
#[must_use]
pub fn matching_notes(activity: &Activity<NotedCell>, selection: &Selection) -> Vec<MethodNote> {
    let regions = selection.region_keys();
    let relics = selection.relic_keys();
    let region_notes = activity
        .regions
        .iter()
        .filter(|(name, _)| regions.contains(&clean_name(name)));
    let relic_notes = activity
        .relics
        .iter()
        .filter(|(name, _)| relics.contains(&clean_name(name)));

    let mut notes: Vec<MethodNote> = region_notes
        .chain(relic_notes)
        .filter_map(|(name, cell)| {
            let note = cell.note.as_deref().filter(|n| !n.is_empty())?;
            Some(MethodNote {
                source: name.clone(),
                value: cell.value,
                note: note.to_string(),
            })
        })
        .collect();
    notes.sort_by(|a, b| b.value.cmp(&a.value));
    notes
}

/// How well a skill can be trained under the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillRating {
    Locked,
    Limited,
    Viable,
    Strong,
}

impl SkillRating {
    #[must_use]
    pub const fn from_points(points: u32) -> Self {
        match points {
            0 => Self::Locked,
            1 => Self::Limited,
            2 => Self::Viable,
            _ => Self::Strong,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Limited => "limited",
            Self::Viable => "viable",
            Self::Strong => "strong",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::relics::toggle_relic;
    use crate::selection::toggle_region;
    use std::collections::BTreeMap;

    fn activity(regions: &[(&str, u32)], relics: &[(&str, u32)]) -> Activity {
        Activity {
            name: "Test".to_string(),
            regions: regions
                .iter()
                .map(|(k, v)| ((*k).to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
            relics: relics
                .iter()
                .map(|(k, v)| ((*k).to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        }
    }

    fn selection(catalog: &Catalog, regions: &[&str], relics: &[&str]) -> Selection {
        let sel = regions.iter().fold(Selection::new(catalog), |sel, code| {
            toggle_region(catalog, &sel, code)
        });
        relics
            .iter()
            .fold(sel, |sel, code| toggle_relic(catalog, &sel, code))
    }

    #[test]
    fn score_takes_maximum_not_sum() {
        let catalog = Catalog::bundled().unwrap();
        let sel = selection(&catalog, &["AS", "KN"], &["PM"]);
        let item = activity(&[("Asgarnia", 1), ("Kandarin", 2)], &[("Power Miner", 3)]);
        assert_eq!(score(&item, &sel), 3);

        let no_relic = selection(&catalog, &["AS", "KN"], &[]);
        assert_eq!(score(&item, &no_relic), 2);
    }

    #[test]
    fn score_is_zero_without_matches() {
        let catalog = Catalog::bundled().unwrap();
        let sel = selection(&catalog, &["MO"], &[]);
        let item = activity(&[("Asgarnia", 1)], &[("Power Miner", 3)]);
        assert_eq!(score(&item, &sel), 0);
        assert!(!is_available(&item, &sel));
    }

    #[test]
    fn names_are_normalized_before_matching() {
        let catalog = Catalog::bundled().unwrap();
        let sel = selection(&catalog, &[], &["FaFl"]);
        let item = activity(&[("varlamore'", 1)], &[("FAIRYS FLIGHT", 2)]);
        assert_eq!(score(&item, &sel), 2);
    }

    #[test]
    fn relic_keys_do_not_match_region_entries() {
        let catalog = Catalog::bundled().unwrap();
        let sel = selection(&catalog, &[], &["PM"]);
        let item = activity(&[("Power Miner", 3)], &[]);
        assert_eq!(score(&item, &sel), 0);
    }

    #[test]
    fn notes_are_sorted_by_value_and_skip_empty() {
        let catalog = Catalog::bundled().unwrap();
        let sel = selection(&catalog, &["AS", "FR"], &["PM"]);
        let mining = catalog
            .skills()
            .iter()
            .find(|s| s.name == "Mining")
            .unwrap();
        let notes = matching_notes(mining, &sel);
        let values: Vec<u32> = notes.iter().map(|n| n.value).collect();
        assert_eq!(values, vec![3, 3, 2, 1]);
        assert!(notes.iter().any(|n| n.source == "Power Miner"));
        assert!(notes.iter().all(|n| !n.note.is_empty()));
        assert_eq!(score(mining, &sel), 3);
    }

    #[test]
    fn ratings_band_points() {
        assert_eq!(SkillRating::from_points(0), SkillRating::Locked);
        assert_eq!(SkillRating::from_points(1), SkillRating::Limited);
        assert_eq!(SkillRating::from_points(2), SkillRating::Viable);
        assert_eq!(SkillRating::from_points(7), SkillRating::Strong);
        assert!(SkillRating::Strong > SkillRating::Locked);
    }
}
